//! Tests for the export pipeline against the headless surface.

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use std::sync::{Arc, Mutex};

use heatmap_app::export::{ControlLock, StyleOverrides, EXPORTING_LABEL};
use heatmap_app::headless::{DirectorySink, HeadlessSurface, ImageFileCapture, SurfaceLayout};
use heatmap_app::surface::{
    CaptureOptions, Control, ControlState, DownloadSink, Element, RasterCapture, RenderingSurface,
};
use heatmap_app::{ExportPhase, ExportPipeline, Severity, StatusLine};
use heatmap_common::{ExportPreset, HeatmapError, HeatmapResult};
use test_utils::{create_panel_capture, sample_layout, temp_test_dir, LEGEND_PIXEL, MAP_PIXEL};

// ============================================================================
// Test doubles
// ============================================================================

fn panel_surface() -> HeadlessSurface {
    let layout = sample_layout();
    HeadlessSurface::new(SurfaceLayout {
        wrapper: Some(layout.wrapper),
        map: Some(layout.map),
        legend: Some(layout.legend),
        controls: true,
    })
}

/// What the surface looked like at the moment of capture.
#[derive(Debug, Clone, Default)]
struct Snapshot {
    styles: Vec<(Element, String, String)>,
    legend_visible: bool,
    controls_visible: bool,
    export_control: ControlState,
}

/// Returns the synthetic panel capture and records the surface state.
struct PanelCapture {
    seen: Mutex<Option<Snapshot>>,
    fail: bool,
}

impl PanelCapture {
    fn ok() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(None),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(None),
            fail: true,
        })
    }

    fn snapshot(&self) -> Snapshot {
        self.seen.lock().unwrap().clone().expect("capture was called")
    }
}

#[async_trait]
impl RasterCapture for PanelCapture {
    async fn capture(
        &self,
        surface: &dyn RenderingSurface,
        _element: Element,
        options: CaptureOptions,
    ) -> HeatmapResult<RgbaImage> {
        let mut styles = Vec::new();
        for element in [Element::Wrapper, Element::Map, Element::Legend] {
            for property in [
                "background",
                "gap",
                "border",
                "border-radius",
                "box-shadow",
                "margin",
                "display",
            ] {
                if let Some(value) = surface.style_property(element, property) {
                    if !value.is_empty() {
                        styles.push((element, property.to_string(), value));
                    }
                }
            }
        }
        *self.seen.lock().unwrap() = Some(Snapshot {
            styles,
            legend_visible: surface.element_rect(Element::Legend).is_some(),
            controls_visible: surface.controls_visible(),
            export_control: surface.control_state(Control::Export),
        });

        if self.fail {
            return Err(HeatmapError::CaptureFailed("canvas tainted".to_string()));
        }
        Ok(create_panel_capture(options.scale))
    }
}

#[derive(Default)]
struct MemorySink {
    files: Mutex<Vec<(String, Vec<u8>)>>,
}

impl DownloadSink for MemorySink {
    fn offer(&self, filename: &str, bytes: &[u8]) -> HeatmapResult<String> {
        self.files
            .lock()
            .unwrap()
            .push((filename.to_string(), bytes.to_vec()));
        Ok(format!("memory://{}", filename))
    }
}

fn decode(png: &[u8]) -> RgbaImage {
    image::load_from_memory(png).unwrap().to_rgba8()
}

// ============================================================================
// Successful exports
// ============================================================================

#[tokio::test]
async fn test_map_legend_export() {
    let surface = panel_surface();
    let capture = PanelCapture::ok();
    let sink = Arc::new(MemorySink::default());
    let mut pipeline = ExportPipeline::new(Some(capture.clone()), sink.clone(), 1.0);
    let mut status = StatusLine::new();

    let artifact = pipeline
        .run(&surface, ExportPreset::MapLegend, &mut status)
        .await
        .unwrap();

    assert_eq!((artifact.width, artifact.height), (1600, 1400));
    assert!(artifact.filename.starts_with("syria-heatmap-"));
    assert!(artifact.filename.ends_with(".png"));
    assert_eq!(artifact.location, format!("memory://{}", artifact.filename));
    assert_eq!(
        pipeline.trail(),
        &[
            ExportPhase::Capturing,
            ExportPhase::Cropping,
            ExportPhase::Emitting,
            ExportPhase::Idle,
        ]
    );
    assert_eq!(pipeline.phase(), ExportPhase::Idle);
    assert_eq!(status.current().unwrap().severity, Severity::Info);

    let files = sink.files.lock().unwrap();
    assert_eq!(files.len(), 1);
    let image = decode(&files[0].1);
    assert_eq!(*image.get_pixel(0, 0), MAP_PIXEL);
    assert_eq!(*image.get_pixel(0, image.height() - 1), LEGEND_PIXEL);
}

#[tokio::test]
async fn test_overrides_active_during_capture_then_restored() {
    let surface = panel_surface();
    let capture = PanelCapture::ok();
    let mut pipeline = ExportPipeline::new(Some(capture.clone()), Arc::new(MemorySink::default()), 1.0);

    pipeline
        .run(&surface, ExportPreset::MapLegend, &mut StatusLine::new())
        .await
        .unwrap();

    let seen = capture.snapshot();
    let has = |element: Element, property: &str, value: &str| {
        seen.styles
            .iter()
            .any(|(e, p, v)| *e == element && p == property && v == value)
    };
    assert!(has(Element::Wrapper, "background", "#ffffff"));
    assert!(has(Element::Wrapper, "gap", "0px"));
    assert!(has(Element::Map, "border", "0"));
    assert!(has(Element::Legend, "box-shadow", "none"));
    assert!(seen.legend_visible);
    assert!(!seen.controls_visible);
    assert!(seen.export_control.disabled);
    assert_eq!(seen.export_control.label, EXPORTING_LABEL);

    assert!(surface.styles().is_empty());
    assert!(surface.controls_visible());
    let control = surface.control_state(Control::Export);
    assert!(!control.disabled);
    assert_eq!(control.label, "Export PNG");
}

#[tokio::test]
async fn test_map_only_hides_legend_and_keeps_gap() {
    let surface = panel_surface();
    surface.set_style_property(Element::Wrapper, "gap", "8px");
    let capture = PanelCapture::ok();
    let mut pipeline = ExportPipeline::new(Some(capture.clone()), Arc::new(MemorySink::default()), 1.0);

    let artifact = pipeline
        .run(&surface, ExportPreset::MapOnly, &mut StatusLine::new())
        .await
        .unwrap();

    assert_eq!((artifact.width, artifact.height), (1600, 1120));
    let seen = capture.snapshot();
    assert!(!seen.legend_visible);
    assert!(seen
        .styles
        .contains(&(Element::Wrapper, "gap".to_string(), "8px".to_string())));

    assert_eq!(
        surface.styles(),
        vec![(Element::Wrapper, "gap".to_string(), "8px".to_string())]
    );
    assert!(surface.element_rect(Element::Legend).is_some());
}

#[tokio::test]
async fn test_meta_preset_adds_banner() {
    let surface = panel_surface();
    let sink = Arc::new(MemorySink::default());
    let mut pipeline = ExportPipeline::new(Some(PanelCapture::ok()), sink.clone(), 1.5);

    let artifact = pipeline
        .run(&surface, ExportPreset::MapLegendMeta, &mut StatusLine::new())
        .await
        .unwrap();

    // scale 3: 2400x2100 capture plus a 105px header
    assert_eq!((artifact.width, artifact.height), (2400, 2100 + 105));
    assert!(pipeline.trail().contains(&ExportPhase::Annotating));

    let files = sink.files.lock().unwrap();
    let image = decode(&files[0].1);
    assert_eq!(*image.get_pixel(5, 5), Rgba([255, 255, 255, 255]));
    assert_eq!(*image.get_pixel(5, 105), MAP_PIXEL);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_capture_failure_restores_everything() {
    let surface = panel_surface();
    surface.set_style_property(Element::Map, "border", "1px solid #cbd5e1");
    let capture = PanelCapture::failing();
    let sink = Arc::new(MemorySink::default());
    let mut pipeline = ExportPipeline::new(Some(capture.clone()), sink.clone(), 1.0);

    let err = pipeline
        .run(&surface, ExportPreset::MapLegendMeta, &mut StatusLine::new())
        .await
        .unwrap_err();

    assert!(matches!(err, HeatmapError::CaptureFailed(_)));
    assert_eq!(err.export_status_message(), "PNG export failed. Please try again.");
    assert_eq!(
        pipeline.trail(),
        &[ExportPhase::Capturing, ExportPhase::Failed, ExportPhase::Idle]
    );
    assert!(capture.snapshot().export_control.disabled);

    assert_eq!(
        surface.styles(),
        vec![(
            Element::Map,
            "border".to_string(),
            "1px solid #cbd5e1".to_string()
        )]
    );
    assert!(surface.controls_visible());
    assert!(!surface.control_state(Control::Export).disabled);
    assert!(sink.files.lock().unwrap().is_empty());
    assert!(pipeline.last_artifact().is_none());
}

#[tokio::test]
async fn test_missing_capture_utility() {
    let surface = panel_surface();
    let mut pipeline = ExportPipeline::new(None, Arc::new(MemorySink::default()), 1.0);
    let mut status = StatusLine::new();

    let err = pipeline
        .run(&surface, ExportPreset::MapLegend, &mut status)
        .await
        .unwrap_err();

    assert!(matches!(err, HeatmapError::CollaboratorUnavailable(_)));
    assert!(err.export_status_message().starts_with("Export library failed to load."));
    assert!(status.current().is_none());
    assert!(pipeline.trail().is_empty());
    assert!(surface.styles().is_empty());
    assert!(!surface.control_state(Control::Export).disabled);
}

#[tokio::test]
async fn test_missing_map_element() {
    let layout = sample_layout();
    let surface = HeadlessSurface::new(SurfaceLayout {
        wrapper: Some(layout.wrapper),
        map: None,
        legend: Some(layout.legend),
        controls: false,
    });
    let mut pipeline = ExportPipeline::new(Some(PanelCapture::ok()), Arc::new(MemorySink::default()), 1.0);

    let err = pipeline
        .run(&surface, ExportPreset::MapOnly, &mut StatusLine::new())
        .await
        .unwrap_err();
    assert_eq!(
        err.export_status_message(),
        "Export failed: map area was not found."
    );
}

#[tokio::test]
async fn test_second_export_rejected_while_locked() {
    let surface = panel_surface();
    let _busy = ControlLock::acquire(&surface, Control::Export, EXPORTING_LABEL).unwrap();
    let capture = PanelCapture::ok();
    let mut pipeline = ExportPipeline::new(Some(capture.clone()), Arc::new(MemorySink::default()), 1.0);

    let err = pipeline
        .run(&surface, ExportPreset::MapLegend, &mut StatusLine::new())
        .await
        .unwrap_err();

    assert!(matches!(err, HeatmapError::ExportInProgress));
    assert!(capture.seen.lock().unwrap().is_none());
    assert!(surface.control_state(Control::Export).disabled);
}

// ============================================================================
// Guards
// ============================================================================

#[test]
fn test_style_overrides_restore_in_reverse_order() {
    let surface = panel_surface();
    {
        let mut overrides = StyleOverrides::new(&surface);
        overrides.set(Element::Wrapper, "gap", "4px");
        overrides.set(Element::Wrapper, "gap", "0px");
        assert_eq!(overrides.len(), 2);
        assert_eq!(
            surface.style_property(Element::Wrapper, "gap").as_deref(),
            Some("0px")
        );
    }
    assert_eq!(
        surface.style_property(Element::Wrapper, "gap").as_deref(),
        Some("")
    );
}

#[test]
fn test_hide_controls_restores_previous_display() {
    let surface = panel_surface();
    surface.set_style_property(Element::MapControls, "display", "flex");
    {
        let mut overrides = StyleOverrides::new(&surface);
        overrides.hide_controls();
        assert_eq!(overrides.len(), 1);
        assert!(!surface.controls_visible());
    }
    assert!(surface.controls_visible());
    assert_eq!(
        surface.style_property(Element::MapControls, "display").as_deref(),
        Some("flex")
    );
}

#[test]
fn test_hide_controls_skips_surface_without_controls() {
    let layout = sample_layout();
    let surface = HeadlessSurface::new(SurfaceLayout {
        wrapper: Some(layout.wrapper),
        map: Some(layout.map),
        legend: None,
        controls: false,
    });
    let mut overrides = StyleOverrides::new(&surface);
    overrides.hide_controls();
    assert!(overrides.is_empty());
}

#[test]
fn test_control_lock_releases_on_drop() {
    let surface = panel_surface();
    {
        let _lock = ControlLock::acquire(&surface, Control::Export, EXPORTING_LABEL).unwrap();
        assert!(ControlLock::acquire(&surface, Control::Export, EXPORTING_LABEL).is_err());
    }
    assert!(ControlLock::acquire(&surface, Control::Export, EXPORTING_LABEL).is_ok());
}

// ============================================================================
// Headless collaborators end to end
// ============================================================================

#[tokio::test]
async fn test_image_file_capture_to_directory() {
    let dir = temp_test_dir();
    let capture_path = dir.path().join("capture.png");
    create_panel_capture(1.0).save(&capture_path).unwrap();
    let out_dir = dir.path().join("exports");

    let surface = panel_surface();
    let mut pipeline = ExportPipeline::new(
        Some(Arc::new(ImageFileCapture::new(&capture_path))),
        Arc::new(DirectorySink::new(&out_dir)),
        2.0,
    );

    let artifact = pipeline
        .run(&surface, ExportPreset::MapOnly, &mut StatusLine::new())
        .await
        .unwrap();

    // scale 4: the 800x560 map
    assert_eq!((artifact.width, artifact.height), (3200, 2240));
    let written = std::fs::read(out_dir.join(&artifact.filename)).unwrap();
    assert_eq!(written.len(), artifact.bytes);
    assert_eq!(decode(&written).dimensions(), (3200, 2240));
}

#[tokio::test]
async fn test_image_file_capture_missing_file() {
    let dir = temp_test_dir();
    let surface = panel_surface();
    let mut pipeline = ExportPipeline::new(
        Some(Arc::new(ImageFileCapture::new(dir.path().join("absent.png")))),
        Arc::new(DirectorySink::new(dir.path())),
        1.0,
    );

    let err = pipeline
        .run(&surface, ExportPreset::MapLegend, &mut StatusLine::new())
        .await
        .unwrap_err();
    assert!(matches!(err, HeatmapError::CaptureFailed(_)));
    assert!(surface.styles().is_empty());
}
