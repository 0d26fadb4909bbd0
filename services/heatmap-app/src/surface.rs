//! Collaborator interfaces: the rendering surface, raster capture, clipboard
//! and download sink.
//!
//! The surface is shared by reference while an export holds scoped overrides
//! on it, so its methods take `&self` and implementations use interior
//! mutability.

use async_trait::async_trait;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use heatmap_common::{HeatmapResult, Rect, Region};
use renderer::{Color, Legend, PlacedLabel};

/// Addressable parts of the rendered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    /// Container holding the map and the legend; the capture target.
    Wrapper,
    Map,
    Legend,
    /// Interactive overlays drawn over the map (zoom buttons and similar).
    MapControls,
}

/// User controls whose enabled state the app drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Export,
    LabelMode,
    ShowValues,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlState {
    pub disabled: bool,
    pub label: String,
}

pub const DISPLAY_PROPERTY: &str = "display";

pub trait RenderingSurface: Send + Sync {
    /// Set the fill of one region's feature.
    fn restyle(&self, region: Region, fill: Color);

    fn set_tooltip(&self, region: Region, text: &str);

    /// Replace every label marker with `labels`.
    fn show_labels(&self, labels: &[PlacedLabel]);

    fn show_legend(&self, legend: &Legend);

    fn show_share_link(&self, link: &str);

    /// Document-space bounds, `None` when the element is absent or hidden.
    fn element_rect(&self, element: Element) -> Option<Rect>;

    /// Inline style value (empty when unset), `None` when the element is absent.
    fn style_property(&self, element: Element, property: &str) -> Option<String>;

    /// No-op when the element is absent.
    fn set_style_property(&self, element: Element, property: &str, value: &str);

    fn control_state(&self, control: Control) -> ControlState;

    fn set_control_state(&self, control: Control, state: ControlState);

    fn controls_visible(&self) -> bool {
        self.style_property(Element::MapControls, DISPLAY_PROPERTY)
            .map_or(false, |display| display != "none")
    }

    fn set_controls_visible(&self, visible: bool) {
        let display = if visible { "" } else { "none" };
        self.set_style_property(Element::MapControls, DISPLAY_PROPERTY, display);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    pub scale: f64,
    pub background: Color,
}

/// Rasterizes an element of the surface at a given scale.
#[async_trait]
pub trait RasterCapture: Send + Sync {
    async fn capture(
        &self,
        surface: &dyn RenderingSurface,
        element: Element,
        options: CaptureOptions,
    ) -> HeatmapResult<RgbaImage>;
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> HeatmapResult<()>;
}

/// Receives finished files. Returns where the file ended up.
pub trait DownloadSink: Send + Sync {
    fn offer(&self, filename: &str, bytes: &[u8]) -> HeatmapResult<String>;
}
