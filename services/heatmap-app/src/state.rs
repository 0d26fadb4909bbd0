//! The single in-memory view state.

use chrono::{DateTime, Local, Utc};

use heatmap_common::time::display_timestamp;
use heatmap_common::ViewConfig;

type ChangeHook = Box<dyn FnMut(&ViewConfig) + Send>;

/// Owns the [`ViewConfig`]. Every mutation goes through [`ViewState::update`],
/// which fires the change hook once.
pub struct ViewState {
    config: ViewConfig,
    last_applied_at: Option<DateTime<Utc>>,
    on_change: Option<ChangeHook>,
}

impl ViewState {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            config,
            last_applied_at: None,
            on_change: None,
        }
    }

    /// Defaults, overridden by whatever a link validly specifies.
    pub fn from_link(link: &str) -> Self {
        Self::new(view_state::decode(link).to_config())
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Install the hook, replacing any previous one.
    pub fn on_change(&mut self, hook: impl FnMut(&ViewConfig) + Send + 'static) {
        self.on_change = Some(Box::new(hook));
    }

    pub fn update(&mut self, mutate: impl FnOnce(&mut ViewConfig)) {
        mutate(&mut self.config);
        if let Some(hook) = self.on_change.as_mut() {
            hook(&self.config);
        }
    }

    pub fn mark_applied(&mut self, at: DateTime<Utc>) {
        self.last_applied_at = Some(at);
    }

    pub fn last_applied_at(&self) -> Option<DateTime<Utc>> {
        self.last_applied_at
    }

    /// `Last updated: <local time>`, using now if nothing was applied yet.
    pub fn last_updated_label(&self) -> String {
        let at = self.last_applied_at.unwrap_or_else(Utc::now);
        format!(
            "Last updated: {}",
            display_timestamp(&at.with_timezone(&Local))
        )
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

impl std::fmt::Debug for ViewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewState")
            .field("config", &self.config)
            .field("last_applied_at", &self.last_applied_at)
            .finish_non_exhaustive()
    }
}
