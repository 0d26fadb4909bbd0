//! Synthetic raster captures.
//!
//! These stand in for what the capture utility returns so that crop and
//! banner code can be checked pixel by pixel.

use image::{Rgba, RgbaImage};

/// Marker color for the map area of [`create_panel_capture`].
pub const MAP_PIXEL: Rgba<u8> = Rgba([30, 58, 138, 255]);
/// Marker color for the legend area of [`create_panel_capture`].
pub const LEGEND_PIXEL: Rgba<u8> = Rgba([219, 234, 254, 255]);
/// Background of the wrapper.
pub const BACKGROUND_PIXEL: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A capture of the sample panel at `scale`: map rows on top, a white gap,
/// then legend rows, matching `fixtures::sample_layout`.
pub fn create_panel_capture(scale: f64) -> RgbaImage {
    let layout = crate::fixtures::sample_layout();
    let width = (layout.wrapper.width() * scale).round() as u32;
    let height = (layout.wrapper.height() * scale).round() as u32;
    let map_bottom = ((layout.map.bottom - layout.wrapper.top) * scale).round() as u32;
    let legend_top = ((layout.legend.top - layout.wrapper.top) * scale).round() as u32;

    RgbaImage::from_fn(width, height, |_, y| {
        if y < map_bottom {
            MAP_PIXEL
        } else if y >= legend_top {
            LEGEND_PIXEL
        } else {
            BACKGROUND_PIXEL
        }
    })
}

/// A smooth two-axis gradient with far more than 256 colors.
pub fn create_gradient_capture(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let r = ((x as f32 / width as f32) * 255.0) as u8;
        let g = ((y as f32 / height as f32) * 255.0) as u8;
        Rgba([r, g, 128, 255])
    })
}
