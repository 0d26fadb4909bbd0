//! Single-message status line.

use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub severity: Severity,
    pub text: String,
}

/// Holds at most one message; each new one replaces the last.
#[derive(Debug, Default)]
pub struct StatusLine {
    current: Option<StatusMessage>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, severity: Severity, text: impl Into<String>) {
        let text = text.into();
        match severity {
            Severity::Error => error!(status = %text, "Status"),
            Severity::Success | Severity::Info => info!(status = %text, ?severity, "Status"),
        }
        self.current = Some(StatusMessage { severity, text });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.set(Severity::Error, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.set(Severity::Success, text);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.set(Severity::Info, text);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }

    /// Current text, empty when cleared.
    pub fn text(&self) -> &str {
        self.current.as_ref().map_or("", |m| m.text.as_str())
    }
}
