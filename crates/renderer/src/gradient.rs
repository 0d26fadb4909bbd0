//! Two-stop color scale for region fills.
//!
//! Values are normalized against the min/max of the whole value map and then
//! blended between the palette's light and dark endpoints.

use heatmap_common::palette::hex_to_rgb;
use heatmap_common::{Palette, Region, ValueMap};

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Parse `#rrggbb` into an opaque color.
    pub fn from_hex(hex: &str) -> Option<Self> {
        hex_to_rgb(hex).map(|(r, g, b)| Self::rgb(r, g, b))
    }

    /// Lowercase `#rrggbb`; alpha is dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgba(&self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

/// Light and dark endpoints of a palette.
pub fn palette_endpoints(palette: Palette) -> (Color, Color) {
    let (light, dark) = palette.stops();
    // Catalog stops are compile-time literals covered by the palette tests.
    let light = Color::from_hex(light).unwrap_or_else(Color::white);
    let dark = Color::from_hex(dark).unwrap_or_else(Color::white);
    (light, dark)
}

/// Map `value` into `[0, 1]` against the data range.
///
/// A flat range has no spread to normalize against: positive data maps to the
/// dark end, zero or negative data to the light end.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return if value > 0.0 { 1.0 } else { 0.0 };
    }
    (value - min) / (max - min)
}

fn blend_channel(a: u8, b: u8, t: f64) -> u8 {
    let v = a as f64 + (b as f64 - a as f64) * t;
    v.round().clamp(0.0, 255.0) as u8
}

/// Linear color interpolation, rounded to the nearest channel value.
pub fn interpolate_color(light: Color, dark: Color, t: f64) -> Color {
    Color::new(
        blend_channel(light.r, dark.r, t),
        blend_channel(light.g, dark.g, t),
        blend_channel(light.b, dark.b, t),
        255,
    )
}

/// Fill color for one value given every current value.
pub fn color_for(value: f64, all_values: &[f64], palette: Palette) -> Color {
    let min = all_values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = all_values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let t = if all_values.is_empty() {
        normalize(value, value, value)
    } else {
        normalize(value, min, max)
    };
    let (light, dark) = palette_endpoints(palette);
    interpolate_color(light, dark, t)
}

/// Fill colors for every region, in canonical order.
pub fn fill_colors(values: &ValueMap, palette: Palette) -> Vec<(Region, Color)> {
    let all = values.as_slice();
    values
        .iter()
        .map(|(region, value)| (region, color_for(value, all, palette)))
        .collect()
}

/// `count` evenly spaced values from `min` to `max` inclusive.
pub fn legend_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![min],
        _ => (0..count)
            .map(|i| {
                let t = i as f64 / (count - 1) as f64;
                min + (max - min) * t
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let c = Color::from_hex("#1e3a8a").unwrap();
        assert_eq!(c, Color::rgb(0x1e, 0x3a, 0x8a));
        assert_eq!(c.to_hex(), "#1e3a8a");
    }

    #[test]
    fn test_blend_rounds_to_nearest() {
        // 0 + (255 - 0) * 0.5 = 127.5 rounds up
        assert_eq!(blend_channel(0, 255, 0.5), 128);
        assert_eq!(blend_channel(10, 20, 0.24), 12);
    }
}
