//! Typed UI events and their effects on the view.
//!
//! Every state change runs the same synchronous refresh: recolor all regions,
//! rebuild the legend, tooltips and labels, then re-encode the share link.
//! The refresh finishes before the next event is handled.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, instrument};

use heatmap_common::{
    BoundaryDataset, ExportPreset, HeatmapError, HeatmapResult, LabelMode, Palette, Region,
};
use renderer::labels::{compose_labels, tooltip_for};
use renderer::{fill_colors, Legend};

use crate::export::{ExportPipeline, COMPLETED_MESSAGE};
use crate::state::ViewState;
use crate::status::StatusLine;
use crate::surface::{Clipboard, Control, RenderingSurface};

pub const DATASET_MISSING_MESSAGE: &str =
    "Syria boundary data failed to load. Ensure the boundary dataset is available.";
pub const LINK_COPIED_MESSAGE: &str = "Share link copied to clipboard.";
pub const LINK_COPY_FAILED_MESSAGE: &str =
    "Could not copy link. Please copy the URL from your browser.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    ShowNames,
    ShowValues,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewEvent {
    ValueChanged { region: Region, value: f64 },
    ToggleChanged { toggle: Toggle, on: bool },
    PaletteChanged(Palette),
    LabelModeChanged(LabelMode),
    ExportPresetChanged(ExportPreset),
    /// Set every value back to 0.
    Reset,
    Apply,
    ShareLinkRequested,
    ExportRequested,
}

pub struct Dispatcher {
    state: ViewState,
    surface: Arc<dyn RenderingSurface>,
    dataset: Option<BoundaryDataset>,
    clipboard: Option<Arc<dyn Clipboard>>,
    export: ExportPipeline,
    status: StatusLine,
    base_url: String,
    share_link: String,
}

impl Dispatcher {
    pub fn new(
        state: ViewState,
        surface: Arc<dyn RenderingSurface>,
        dataset: Option<BoundaryDataset>,
        export: ExportPipeline,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            state,
            surface,
            dataset,
            clipboard: None,
            export,
            status: StatusLine::new(),
            base_url: base_url.into(),
            share_link: String::new(),
        }
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    /// First render. Reports a missing boundary dataset on the status line;
    /// colors, legend and link still work without it.
    pub fn initialize(&mut self) {
        match &self.dataset {
            Some(dataset) if !dataset.is_empty() => self.status.clear(),
            _ => self.status.error(DATASET_MISSING_MESSAGE),
        }
        self.refresh();
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn dispatch(&mut self, event: ViewEvent) -> HeatmapResult<()> {
        match event {
            ViewEvent::ValueChanged { region, value } => {
                self.state.update(|c| c.values.set(region, value));
            }
            ViewEvent::ToggleChanged { toggle, on } => self.state.update(|c| match toggle {
                Toggle::ShowNames => c.show_names = on,
                Toggle::ShowValues => c.show_values = on,
            }),
            ViewEvent::PaletteChanged(palette) => self.state.update(|c| c.palette = palette),
            ViewEvent::LabelModeChanged(mode) => self.state.update(|c| c.label_mode = mode),
            ViewEvent::ExportPresetChanged(preset) => {
                self.state.update(|c| c.export_preset = preset)
            }
            ViewEvent::Reset => self.state.update(|c| c.values.reset()),
            ViewEvent::Apply => {}
            ViewEvent::ShareLinkRequested => {
                self.refresh();
                self.copy_share_link().await;
                return Ok(());
            }
            ViewEvent::ExportRequested => return self.export().await,
        }
        self.refresh();
        Ok(())
    }

    fn refresh(&mut self) {
        let config = self.state.config().clone();

        for (region, fill) in fill_colors(&config.values, config.palette) {
            self.surface.restyle(region, fill);
            self.surface
                .set_tooltip(region, &tooltip_for(region, &config.values));
        }
        self.surface
            .show_legend(&Legend::build(&config.values, config.palette));

        let labels = match &self.dataset {
            Some(dataset) => compose_labels(dataset, &config),
            None => Vec::new(),
        };
        self.surface.show_labels(&labels);

        let enabled = config.label_controls_enabled();
        for control in [Control::LabelMode, Control::ShowValues] {
            let mut state = self.surface.control_state(control);
            state.disabled = !enabled;
            self.surface.set_control_state(control, state);
        }

        self.share_link = view_state::share_link(&self.base_url, &config);
        self.surface.show_share_link(&self.share_link);
        self.state.mark_applied(Utc::now());
        debug!(labels = labels.len(), link = %self.share_link, "View refreshed");
    }

    async fn copy_share_link(&mut self) {
        let copied = match &self.clipboard {
            Some(clipboard) => clipboard.write_text(&self.share_link).await,
            None => Err(HeatmapError::CollaboratorUnavailable(
                "clipboard".to_string(),
            )),
        };
        match copied {
            Ok(()) => self.status.success(LINK_COPIED_MESSAGE),
            Err(e) => {
                debug!(error = %e, "Clipboard write failed");
                self.status.info(LINK_COPY_FAILED_MESSAGE);
            }
        }
    }

    async fn export(&mut self) -> HeatmapResult<()> {
        let preset = self.state.config().export_preset;
        match self
            .export
            .run(self.surface.as_ref(), preset, &mut self.status)
            .await
        {
            Ok(_) => {
                self.status.success(COMPLETED_MESSAGE);
                Ok(())
            }
            Err(e) => {
                self.status.error(e.export_status_message());
                Err(e)
            }
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn share_link(&self) -> &str {
        &self.share_link
    }

    pub fn export_pipeline(&self) -> &ExportPipeline {
        &self.export
    }
}
