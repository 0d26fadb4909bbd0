//! Export compositing: scale, crop and banner.
//!
//! Everything here is pure pixel and geometry work. The capture itself and the
//! temporary presentation overrides live with the caller.

use chrono::{DateTime, TimeZone, Utc};
use image::{imageops, Rgba, RgbaImage};

use heatmap_common::time::{display_timestamp, filename_timestamp};
use heatmap_common::{ExportPreset, Rect};

use crate::gradient::Color;
use crate::text::BannerFont;

/// Lower bound of the export scale factor.
pub const MIN_EXPORT_SCALE: f64 = 2.0;
/// Upper bound of the export scale factor.
pub const MAX_EXPORT_SCALE: f64 = 4.0;

/// Title drawn in the metadata banner.
pub const BANNER_TITLE: &str = "Syria Governorate Heatmap";

/// Banner height at scale 2, in output pixels.
const BANNER_BASE_HEIGHT: f64 = 70.0;
const BANNER_MARGIN_X: f64 = 18.0;
const TITLE_BASELINE: f64 = 30.0;
const TITLE_SIZE: f64 = 20.0;
const SUBTITLE_BASELINE: f64 = 52.0;
const SUBTITLE_SIZE: f64 = 13.0;

const TITLE_COLOR: &str = "#0f172a";
const SUBTITLE_COLOR: &str = "#475569";

/// Capture scale: twice the device density, kept within 2x..4x.
pub fn export_scale(device_pixel_ratio: f64) -> f64 {
    if !device_pixel_ratio.is_finite() {
        return MIN_EXPORT_SCALE;
    }
    (device_pixel_ratio * 2.0).clamp(MIN_EXPORT_SCALE, MAX_EXPORT_SCALE)
}

/// Document-space region to keep.
///
/// The legend only widens the crop when the preset asks for it and the legend
/// is actually laid out.
pub fn crop_bounds(map: Rect, legend: Option<Rect>, preset: ExportPreset) -> Rect {
    match legend {
        Some(legend) if preset.includes_legend() => map.union(&legend),
        _ => map,
    }
}

/// Crop rectangle in capture pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelCrop {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Convert document bounds into capture pixels.
///
/// `wrapper` is the captured element; the capture's origin is its top-left
/// corner.
pub fn pixel_crop(wrapper: Rect, bounds: Rect, scale: f64) -> PixelCrop {
    let rel = bounds.relative_to(&wrapper);
    PixelCrop {
        x: (rel.left * scale).round().max(0.0) as u32,
        y: (rel.top * scale).round().max(0.0) as u32,
        width: (bounds.width() * scale).round().max(1.0) as u32,
        height: (bounds.height() * scale).round().max(1.0) as u32,
    }
}

/// Copy the crop out of the capture into an image of exactly the crop size.
///
/// Parts of the crop that fall outside the capture stay transparent.
pub fn crop_capture(capture: &RgbaImage, crop: PixelCrop) -> RgbaImage {
    let mut out = RgbaImage::new(crop.width, crop.height);
    let view = imageops::crop_imm(capture, crop.x, crop.y, crop.width, crop.height).to_image();
    imageops::replace(&mut out, &view, 0, 0);
    out
}

/// Banner height for a scale factor.
pub fn banner_height(scale: f64) -> u32 {
    BANNER_BASE_HEIGHT.max((BANNER_BASE_HEIGHT * (scale / 2.0)).round()) as u32
}

fn scaled(value: f64, scale: f64) -> f64 {
    (value * (scale / 2.0)).round()
}

/// Banner subtitle, stamped in `generated_at`'s own zone.
pub fn banner_subtitle<Tz: TimeZone>(generated_at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("Generated: {}", display_timestamp(generated_at))
}

/// Put a white metadata header above `image`: title plus generation time.
pub fn annotate<Tz: TimeZone>(
    image: &RgbaImage,
    scale: f64,
    generated_at: &DateTime<Tz>,
    font: Option<&BannerFont>,
) -> RgbaImage
where
    Tz::Offset: std::fmt::Display,
{
    let header = banner_height(scale);
    let mut out = RgbaImage::from_pixel(
        image.width(),
        image.height() + header,
        Rgba([255, 255, 255, 255]),
    );

    match font {
        Some(font) => {
            let x = scaled(BANNER_MARGIN_X, scale) as i32;
            let title = Color::from_hex(TITLE_COLOR).unwrap_or_else(Color::white);
            let subtitle = Color::from_hex(SUBTITLE_COLOR).unwrap_or_else(Color::white);
            font.draw_baseline(
                &mut out,
                title.to_rgba(),
                x,
                scaled(TITLE_BASELINE, scale) as i32,
                scaled(TITLE_SIZE, scale) as f32,
                BANNER_TITLE,
            );
            font.draw_baseline(
                &mut out,
                subtitle.to_rgba(),
                x,
                scaled(SUBTITLE_BASELINE, scale) as i32,
                scaled(SUBTITLE_SIZE, scale) as f32,
                &banner_subtitle(generated_at),
            );
        }
        None => tracing::warn!("No banner font configured, exporting header without text"),
    }

    imageops::overlay(&mut out, image, 0, header as i64);
    out
}

/// Download name, e.g. `syria-heatmap-2026-10-16T09-05-03-120Z.png`.
pub fn export_filename(at: &DateTime<Utc>) -> String {
    format!("syria-heatmap-{}.png", filename_timestamp(at))
}
