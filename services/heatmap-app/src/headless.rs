//! In-process collaborators for running without a browser.
//!
//! The surface is described by a JSON layout file giving the document-space
//! bounds of each element, and the capture is a pre-rendered PNG of the
//! wrapper element.

use async_trait::async_trait;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use heatmap_common::{HeatmapError, HeatmapResult, Rect, Region};
use renderer::{Color, Legend, PlacedLabel};

use crate::surface::{
    CaptureOptions, Clipboard, Control, ControlState, DownloadSink, Element, RasterCapture,
    RenderingSurface, DISPLAY_PROPERTY,
};

/// Element bounds as laid out on the page. Missing entries are absent elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceLayout {
    pub wrapper: Option<Rect>,
    pub map: Option<Rect>,
    pub legend: Option<Rect>,
    /// Whether interactive overlays are drawn over the map.
    #[serde(default = "default_true")]
    pub controls: bool,
}

fn default_true() -> bool {
    true
}

impl SurfaceLayout {
    pub fn from_file(path: impl AsRef<Path>) -> HeatmapResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn rect(&self, element: Element) -> Option<Rect> {
        match element {
            Element::Wrapper => self.wrapper,
            Element::Map => self.map,
            Element::Legend => self.legend,
            Element::MapControls if self.controls => self.map,
            Element::MapControls => None,
        }
    }
}

#[derive(Debug, Default)]
struct SurfaceState {
    fills: BTreeMap<Region, Color>,
    tooltips: BTreeMap<Region, String>,
    labels: Vec<PlacedLabel>,
    legend: Option<Legend>,
    share_link: String,
    styles: HashMap<(Element, String), String>,
    controls: HashMap<Control, ControlState>,
}

/// A rendering surface that only records what it is asked to show.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    layout: SurfaceLayout,
    state: Mutex<SurfaceState>,
}

impl HeadlessSurface {
    pub fn new(layout: SurfaceLayout) -> Self {
        Self {
            layout,
            state: Mutex::new(SurfaceState::default()),
        }
    }

    pub fn layout(&self) -> &SurfaceLayout {
        &self.layout
    }

    fn state(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn fill(&self, region: Region) -> Option<Color> {
        self.state().fills.get(&region).copied()
    }

    pub fn tooltip(&self, region: Region) -> Option<String> {
        self.state().tooltips.get(&region).cloned()
    }

    pub fn labels(&self) -> Vec<PlacedLabel> {
        self.state().labels.clone()
    }

    pub fn legend(&self) -> Option<Legend> {
        self.state().legend.clone()
    }

    pub fn share_link(&self) -> String {
        self.state().share_link.clone()
    }

    /// Every inline style currently set, sorted for comparison.
    pub fn styles(&self) -> Vec<(Element, String, String)> {
        let mut styles: Vec<_> = self
            .state()
            .styles
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|((element, property), value)| (*element, property.clone(), value.clone()))
            .collect();
        styles.sort();
        styles
    }
}

impl RenderingSurface for HeadlessSurface {
    fn restyle(&self, region: Region, fill: Color) {
        self.state().fills.insert(region, fill);
    }

    fn set_tooltip(&self, region: Region, text: &str) {
        self.state().tooltips.insert(region, text.to_string());
    }

    fn show_labels(&self, labels: &[PlacedLabel]) {
        self.state().labels = labels.to_vec();
    }

    fn show_legend(&self, legend: &Legend) {
        self.state().legend = Some(legend.clone());
    }

    fn show_share_link(&self, link: &str) {
        self.state().share_link = link.to_string();
    }

    fn element_rect(&self, element: Element) -> Option<Rect> {
        let hidden = self
            .state()
            .styles
            .get(&(element, DISPLAY_PROPERTY.to_string()))
            .map_or(false, |display| display == "none");
        if hidden {
            return None;
        }
        self.layout.rect(element)
    }

    fn style_property(&self, element: Element, property: &str) -> Option<String> {
        self.layout.rect(element)?;
        let value = self
            .state()
            .styles
            .get(&(element, property.to_string()))
            .cloned()
            .unwrap_or_default();
        Some(value)
    }

    fn set_style_property(&self, element: Element, property: &str, value: &str) {
        if self.layout.rect(element).is_none() {
            return;
        }
        self.state()
            .styles
            .insert((element, property.to_string()), value.to_string());
    }

    fn control_state(&self, control: Control) -> ControlState {
        self.state()
            .controls
            .get(&control)
            .cloned()
            .unwrap_or_else(|| ControlState {
                disabled: false,
                label: default_control_label(control).to_string(),
            })
    }

    fn set_control_state(&self, control: Control, state: ControlState) {
        self.state().controls.insert(control, state);
    }
}

fn default_control_label(control: Control) -> &'static str {
    match control {
        Control::Export => "Export PNG",
        Control::LabelMode => "Label language",
        Control::ShowValues => "Show values",
    }
}

/// Serves a pre-rendered PNG of the wrapper as the capture.
///
/// The image is resized to the wrapper's bounds at the requested scale and
/// flattened onto the background color.
#[derive(Debug, Clone)]
pub struct ImageFileCapture {
    path: PathBuf,
}

impl ImageFileCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RasterCapture for ImageFileCapture {
    async fn capture(
        &self,
        surface: &dyn RenderingSurface,
        element: Element,
        options: CaptureOptions,
    ) -> HeatmapResult<RgbaImage> {
        let bounds = surface
            .element_rect(element)
            .ok_or_else(|| HeatmapError::CaptureFailed(format!("{:?} is not rendered", element)))?;

        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| HeatmapError::CaptureFailed(format!("{}: {}", self.path.display(), e)))?;
        let source = image::load_from_memory(&bytes)
            .map_err(|e| HeatmapError::CaptureFailed(e.to_string()))?
            .to_rgba8();

        let width = (bounds.width() * options.scale).round().max(1.0) as u32;
        let height = (bounds.height() * options.scale).round().max(1.0) as u32;
        let source = if source.dimensions() == (width, height) {
            source
        } else {
            debug!(
                from = ?source.dimensions(),
                to = ?(width, height),
                "Resizing capture to export scale"
            );
            imageops::resize(&source, width, height, FilterType::Triangle)
        };

        let background: Rgba<u8> = options.background.to_rgba();
        let mut out = RgbaImage::from_pixel(width, height, background);
        imageops::overlay(&mut out, &source, 0, 0);
        Ok(out)
    }
}

/// Writes downloads into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DownloadSink for DirectorySink {
    fn offer(&self, filename: &str, bytes: &[u8]) -> HeatmapResult<String> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        std::fs::write(&path, bytes)?;
        info!(path = %path.display(), size = bytes.len(), "Wrote export");
        Ok(path.display().to_string())
    }
}

/// Stands in for the system clipboard by writing the text to a file.
#[derive(Debug, Clone)]
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Clipboard for FileClipboard {
    async fn write_text(&self, text: &str) -> HeatmapResult<()> {
        tokio::fs::write(&self.path, text).await?;
        Ok(())
    }
}
