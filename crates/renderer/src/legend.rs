//! Legend derived from the current values and palette.

use serde::Serialize;

use heatmap_common::{Palette, ValueMap};

use crate::gradient::{legend_ticks, palette_endpoints};

/// Number of tick labels under the legend bar.
pub const LEGEND_TICK_COUNT: usize = 5;

/// Display data for the legend. Rebuilt whenever the map is restyled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub min: f64,
    pub max: f64,
    /// Light endpoint as `#rrggbb`
    pub light: String,
    /// Dark endpoint as `#rrggbb`
    pub dark: String,
    pub ticks: Vec<f64>,
}

impl Legend {
    pub fn build(values: &ValueMap, palette: Palette) -> Self {
        let min = values.min();
        let max = values.max();
        let (light, dark) = palette_endpoints(palette);
        Self {
            min,
            max,
            light: light.to_hex(),
            dark: dark.to_hex(),
            ticks: legend_ticks(min, max, LEGEND_TICK_COUNT),
        }
    }

    /// e.g. `0 to 1,250.5`
    pub fn range_label(&self) -> String {
        format!("{} to {}", format_number(self.min), format_number(self.max))
    }

    pub fn tick_labels(&self) -> Vec<String> {
        self.ticks.iter().map(|t| format_number(*t)).collect()
    }

    pub fn css_gradient(&self) -> String {
        format!("linear-gradient(90deg, {}, {})", self.light, self.dark)
    }
}

/// Format with thousands separators and at most two fraction digits.
pub fn format_number(value: f64) -> String {
    let scaled = value * 100.0;
    let rounded = if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        value
    };
    if !rounded.is_finite() {
        return rounded.to_string();
    }

    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}
