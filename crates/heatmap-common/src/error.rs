//! Error types for the heatmap crates.

use thiserror::Error;

/// Result type alias using HeatmapError.
pub type HeatmapResult<T> = Result<T, HeatmapError>;

/// Primary error type for heatmap operations.
#[derive(Debug, Error)]
pub enum HeatmapError {
    // === Collaborator Errors ===
    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Invalid boundary dataset: {0}")]
    InvalidDataset(String),

    // === Export Errors ===
    #[error("An export is already in progress")]
    ExportInProgress,

    #[error("Raster capture failed: {0}")]
    CaptureFailed(String),

    #[error("Image encoding failed: {0}")]
    EncodeFailed(String),

    #[error("Font error: {0}")]
    Font(String),

    // === Infrastructure Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),
}

impl HeatmapError {
    /// Message shown on the status line when this error aborts an export.
    pub fn export_status_message(&self) -> String {
        match self {
            HeatmapError::CollaboratorUnavailable(_) => {
                "Export library failed to load. Ensure the capture utility is available.".to_string()
            }
            HeatmapError::ElementNotFound(what) => format!("Export failed: {} was not found.", what),
            HeatmapError::ExportInProgress => "An export is already running.".to_string(),
            _ => "PNG export failed. Please try again.".to_string(),
        }
    }
}

impl From<std::io::Error> for HeatmapError {
    fn from(err: std::io::Error) -> Self {
        HeatmapError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HeatmapError {
    fn from(err: serde_json::Error) -> Self {
        HeatmapError::Json(err.to_string())
    }
}
