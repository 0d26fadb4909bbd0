//! The export pipeline: capture, crop, optional banner, emission.
//!
//! ```text
//! Idle -> Capturing -> Cropping -> (Annotating) -> Emitting -> Idle
//!              \____________\______________\___________\-> Failed -> Idle
//! ```
//!
//! Presentation overrides and the export control lock are RAII guards, so the
//! view is restored on every exit path including errors raised mid-capture.

use chrono::{Local, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use heatmap_common::{ExportPreset, HeatmapError, HeatmapResult};
use renderer::export::{
    annotate, crop_bounds, crop_capture, export_filename, export_scale, pixel_crop,
};
use renderer::png::encode_png;
use renderer::text::BannerFont;
use renderer::Color;

use crate::status::StatusLine;
use crate::surface::{
    CaptureOptions, Control, ControlState, DownloadSink, Element, RasterCapture, RenderingSurface,
    DISPLAY_PROPERTY,
};

pub const EXPORTING_LABEL: &str = "Exporting...";
pub const PREPARING_MESSAGE: &str = "Preparing high-quality PNG export...";
pub const COMPLETED_MESSAGE: &str = "PNG export completed.";

/// Wrapper gap used when the legend is left out and no gap was set inline.
const DEFAULT_PANEL_GAP: &str = "12px";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportPhase {
    Idle,
    Capturing,
    Cropping,
    Annotating,
    Emitting,
    Failed,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportArtifact {
    pub run_id: Uuid,
    pub filename: String,
    pub location: String,
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
}

/// Temporary inline style changes, undone in reverse order on drop.
pub struct StyleOverrides<'a> {
    surface: &'a dyn RenderingSurface,
    saved: Vec<(Element, &'static str, String)>,
}

impl<'a> StyleOverrides<'a> {
    pub fn new(surface: &'a dyn RenderingSurface) -> Self {
        Self {
            surface,
            saved: Vec::new(),
        }
    }

    /// Override one property, remembering its previous value. Absent elements
    /// are skipped.
    pub fn set(&mut self, element: Element, property: &'static str, value: &str) {
        if let Some(previous) = self.surface.style_property(element, property) {
            self.saved.push((element, property, previous));
            self.surface.set_style_property(element, property, value);
        }
    }

    /// Hide the interactive map controls until the guard drops.
    pub fn hide_controls(&mut self) {
        if let Some(previous) = self
            .surface
            .style_property(Element::MapControls, DISPLAY_PROPERTY)
        {
            self.saved
                .push((Element::MapControls, DISPLAY_PROPERTY, previous));
            self.surface.set_controls_visible(false);
        }
    }

    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }
}

impl Drop for StyleOverrides<'_> {
    fn drop(&mut self) {
        for (element, property, value) in self.saved.drain(..).rev() {
            self.surface.set_style_property(element, property, &value);
        }
    }
}

/// Disables a control for the lifetime of the guard.
pub struct ControlLock<'a> {
    surface: &'a dyn RenderingSurface,
    control: Control,
    previous: ControlState,
}

impl<'a> ControlLock<'a> {
    /// Fails with [`HeatmapError::ExportInProgress`] if the control is
    /// already disabled.
    pub fn acquire(
        surface: &'a dyn RenderingSurface,
        control: Control,
        busy_label: &str,
    ) -> HeatmapResult<Self> {
        let previous = surface.control_state(control);
        if previous.disabled {
            return Err(HeatmapError::ExportInProgress);
        }
        surface.set_control_state(
            control,
            ControlState {
                disabled: true,
                label: busy_label.to_string(),
            },
        );
        Ok(Self {
            surface,
            control,
            previous,
        })
    }
}

impl Drop for ControlLock<'_> {
    fn drop(&mut self) {
        self.surface
            .set_control_state(self.control, self.previous.clone());
    }
}

/// Apply the overrides that make the capture clean: white background, no
/// borders or shadows, no interactive overlays.
pub fn apply_export_overrides(overrides: &mut StyleOverrides<'_>, include_legend: bool) {
    let surface = overrides.surface;

    overrides.set(Element::Wrapper, "background", "#ffffff");
    let gap = if include_legend {
        "0px".to_string()
    } else {
        surface
            .style_property(Element::Wrapper, "gap")
            .filter(|gap| !gap.is_empty())
            .unwrap_or_else(|| DEFAULT_PANEL_GAP.to_string())
    };
    overrides.set(Element::Wrapper, "gap", &gap);
    overrides.set(Element::Map, "border", "0");
    overrides.set(Element::Map, "border-radius", "0");

    if include_legend {
        overrides.set(Element::Legend, "border", "0");
        overrides.set(Element::Legend, "border-radius", "0");
        overrides.set(Element::Legend, "box-shadow", "none");
        overrides.set(Element::Legend, "margin", "0");
    } else {
        overrides.set(Element::Legend, DISPLAY_PROPERTY, "none");
    }

    overrides.hide_controls();
}

/// Runs exports one at a time against a rendering surface.
pub struct ExportPipeline {
    capture: Option<Arc<dyn RasterCapture>>,
    sink: Arc<dyn DownloadSink>,
    font: Option<Arc<BannerFont>>,
    device_pixel_ratio: f64,
    phase: ExportPhase,
    trail: Vec<ExportPhase>,
    last_artifact: Option<ExportArtifact>,
}

impl ExportPipeline {
    pub fn new(
        capture: Option<Arc<dyn RasterCapture>>,
        sink: Arc<dyn DownloadSink>,
        device_pixel_ratio: f64,
    ) -> Self {
        Self {
            capture,
            sink,
            font: None,
            device_pixel_ratio,
            phase: ExportPhase::Idle,
            trail: Vec::new(),
            last_artifact: None,
        }
    }

    pub fn with_font(mut self, font: Option<Arc<BannerFont>>) -> Self {
        self.font = font;
        self
    }

    pub fn phase(&self) -> ExportPhase {
        self.phase
    }

    /// Phases entered during the most recent run, in order.
    pub fn trail(&self) -> &[ExportPhase] {
        &self.trail
    }

    pub fn last_artifact(&self) -> Option<&ExportArtifact> {
        self.last_artifact.as_ref()
    }

    pub fn scale(&self) -> f64 {
        export_scale(self.device_pixel_ratio)
    }

    /// Export the current view. Status messages for progress are posted to
    /// `status`; the final outcome is left to the caller.
    pub async fn run(
        &mut self,
        surface: &dyn RenderingSurface,
        preset: ExportPreset,
        status: &mut StatusLine,
    ) -> HeatmapResult<ExportArtifact> {
        self.trail.clear();

        let capture = self.capture.clone().ok_or_else(|| {
            HeatmapError::CollaboratorUnavailable("raster capture".to_string())
        })?;
        if surface.element_rect(Element::Map).is_none() {
            return Err(HeatmapError::ElementNotFound("map area".to_string()));
        }
        if surface.element_rect(Element::Wrapper).is_none() {
            return Err(HeatmapError::ElementNotFound("map wrapper".to_string()));
        }

        let lock = ControlLock::acquire(surface, Control::Export, EXPORTING_LABEL)?;
        status.info(PREPARING_MESSAGE);

        let run_id = Uuid::new_v4();
        info!(%run_id, %preset, scale = self.scale(), "Starting PNG export");

        let result = self.compose(surface, capture.as_ref(), preset, run_id).await;
        drop(lock);

        match &result {
            Ok(artifact) => {
                info!(
                    %run_id,
                    filename = %artifact.filename,
                    width = artifact.width,
                    height = artifact.height,
                    "PNG export completed"
                );
                self.last_artifact = Some(artifact.clone());
            }
            Err(e) => {
                self.transition(run_id, ExportPhase::Failed);
                warn!(%run_id, error = %e, "PNG export failed");
            }
        }
        self.transition(run_id, ExportPhase::Idle);
        result
    }

    async fn compose(
        &mut self,
        surface: &dyn RenderingSurface,
        capture: &dyn RasterCapture,
        preset: ExportPreset,
        run_id: Uuid,
    ) -> HeatmapResult<ExportArtifact> {
        let include_legend =
            preset.includes_legend() && surface.element_rect(Element::Legend).is_some();

        let mut overrides = StyleOverrides::new(surface);
        apply_export_overrides(&mut overrides, include_legend);
        debug!(%run_id, overrides = overrides.len(), include_legend, "Applied export overrides");

        let wrapper = surface
            .element_rect(Element::Wrapper)
            .ok_or_else(|| HeatmapError::ElementNotFound("map wrapper".to_string()))?;
        let map = surface
            .element_rect(Element::Map)
            .ok_or_else(|| HeatmapError::ElementNotFound("map area".to_string()))?;
        let legend = if include_legend {
            surface.element_rect(Element::Legend)
        } else {
            None
        };
        let bounds = crop_bounds(map, legend, preset);
        let scale = self.scale();

        self.transition(run_id, ExportPhase::Capturing);
        let options = CaptureOptions {
            scale,
            background: Color::white(),
        };
        let raw = capture.capture(surface, Element::Wrapper, options).await?;

        self.transition(run_id, ExportPhase::Cropping);
        let crop = pixel_crop(wrapper, bounds, scale);
        debug!(%run_id, ?crop, "Cropping capture");
        let cropped = crop_capture(&raw, crop);

        let now = Utc::now();
        let image = if preset.includes_banner() {
            self.transition(run_id, ExportPhase::Annotating);
            annotate(
                &cropped,
                scale,
                &now.with_timezone(&Local),
                self.font.as_deref(),
            )
        } else {
            cropped
        };

        self.transition(run_id, ExportPhase::Emitting);
        let png = encode_png(&image)?;
        let filename = export_filename(&now);
        let location = self.sink.offer(&filename, &png)?;

        Ok(ExportArtifact {
            run_id,
            filename,
            location,
            width: image.width(),
            height: image.height(),
            bytes: png.len(),
        })
    }

    fn transition(&mut self, run_id: Uuid, phase: ExportPhase) {
        debug!(%run_id, ?phase, "Export phase");
        self.phase = phase;
        self.trail.push(phase);
    }
}
