//! View configuration: display toggles plus the per-region value map.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

use crate::palette::Palette;
use crate::region::{Region, REGION_COUNT};

/// One numeric value per region, indexed in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; REGION_COUNT]")]
pub struct ValueMap([f64; REGION_COUNT]);

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-finite entries become 0, as with [`ValueMap::set`].
    pub fn from_array(values: [f64; REGION_COUNT]) -> Self {
        Self(values.map(finite_or_zero))
    }

    pub fn get(&self, region: Region) -> f64 {
        self.0[region.index()]
    }

    /// Store a user-entered value. Non-finite input becomes 0.
    pub fn set(&mut self, region: Region, value: f64) {
        self.0[region.index()] = finite_or_zero(value);
    }

    /// Reset every region to 0.
    pub fn reset(&mut self) {
        self.0 = [0.0; REGION_COUNT];
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// (region, value) pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Region, f64)> + '_ {
        Region::ALL.iter().map(move |r| (*r, self.0[r.index()]))
    }

    pub fn min(&self) -> f64 {
        self.0.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

impl Index<Region> for ValueMap {
    type Output = f64;

    fn index(&self, region: Region) -> &f64 {
        &self.0[region.index()]
    }
}

impl From<[f64; REGION_COUNT]> for ValueMap {
    fn from(values: [f64; REGION_COUNT]) -> Self {
        Self::from_array(values)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Which language(s) region labels are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    #[default]
    English,
    Arabic,
    Both,
}

impl LabelMode {
    /// Token used in links.
    pub fn token(self) -> &'static str {
        match self {
            LabelMode::English => "en",
            LabelMode::Arabic => "ar",
            LabelMode::Both => "both",
        }
    }

    /// Accepts the link tokens and the long names.
    pub fn from_token(token: &str) -> Option<LabelMode> {
        match token {
            "en" | "english" => Some(LabelMode::English),
            "ar" | "arabic" => Some(LabelMode::Arabic),
            "both" => Some(LabelMode::Both),
            _ => None,
        }
    }
}

impl fmt::Display for LabelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Which elements an exported image contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportPreset {
    MapOnly,
    #[default]
    MapLegend,
    MapLegendMeta,
}

impl ExportPreset {
    pub fn token(self) -> &'static str {
        match self {
            ExportPreset::MapOnly => "map_only",
            ExportPreset::MapLegend => "map_legend",
            ExportPreset::MapLegendMeta => "map_legend_meta",
        }
    }

    pub fn from_token(token: &str) -> Option<ExportPreset> {
        match token {
            "map_only" => Some(ExportPreset::MapOnly),
            "map_legend" => Some(ExportPreset::MapLegend),
            "map_legend_meta" => Some(ExportPreset::MapLegendMeta),
            _ => None,
        }
    }

    pub fn includes_legend(self) -> bool {
        !matches!(self, ExportPreset::MapOnly)
    }

    pub fn includes_banner(self) -> bool {
        matches!(self, ExportPreset::MapLegendMeta)
    }
}

impl fmt::Display for ExportPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Everything a shareable link carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub palette: Palette,
    pub show_names: bool,
    pub label_mode: LabelMode,
    pub show_values: bool,
    pub export_preset: ExportPreset,
    pub values: ValueMap,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            show_names: true,
            label_mode: LabelMode::default(),
            show_values: false,
            export_preset: ExportPreset::default(),
            values: ValueMap::default(),
        }
    }
}

impl ViewConfig {
    /// Label mode and value display only take effect while names are shown.
    pub fn label_controls_enabled(&self) -> bool {
        self.show_names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_map_coerces_non_finite() {
        let mut values = ValueMap::new();
        values.set(Region::Homs, f64::NAN);
        values.set(Region::Hama, f64::INFINITY);
        values.set(Region::Aleppo, 12.5);
        assert_eq!(values[Region::Homs], 0.0);
        assert_eq!(values[Region::Hama], 0.0);
        assert_eq!(values[Region::Aleppo], 12.5);
    }

    #[test]
    fn test_from_array_coerces_non_finite() {
        let mut raw = [1.0; REGION_COUNT];
        raw[Region::Homs.index()] = f64::NAN;
        raw[Region::Hama.index()] = f64::INFINITY;
        raw[Region::Idleb.index()] = f64::NEG_INFINITY;

        let values = ValueMap::from_array(raw);
        assert_eq!(values[Region::Homs], 0.0);
        assert_eq!(values[Region::Hama], 0.0);
        assert_eq!(values[Region::Idleb], 0.0);
        assert_eq!(values[Region::Aleppo], 1.0);
        assert!(values.as_slice().iter().all(|v| v.is_finite()));
        assert_eq!(values.min(), 0.0);
    }

    #[test]
    fn test_deserialized_values_are_coerced() {
        let yaml = format!("[.nan{}]", ", 2.0".repeat(REGION_COUNT - 1));
        let values: ValueMap = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(values[Region::Aleppo], 0.0);
        assert_eq!(values[Region::AlHasakeh], 2.0);
    }

    #[test]
    fn test_value_map_min_max() {
        let mut values = ValueMap::new();
        values.set(Region::Idleb, -3.0);
        values.set(Region::Tartous, 9.0);
        assert_eq!(values.min(), -3.0);
        assert_eq!(values.max(), 9.0);
        values.reset();
        assert_eq!(values.min(), 0.0);
        assert_eq!(values.max(), 0.0);
    }

    #[test]
    fn test_tokens_roundtrip() {
        for mode in [LabelMode::English, LabelMode::Arabic, LabelMode::Both] {
            assert_eq!(LabelMode::from_token(mode.token()), Some(mode));
        }
        for preset in [
            ExportPreset::MapOnly,
            ExportPreset::MapLegend,
            ExportPreset::MapLegendMeta,
        ] {
            assert_eq!(ExportPreset::from_token(preset.token()), Some(preset));
        }
        assert_eq!(LabelMode::from_token("english"), Some(LabelMode::English));
        assert_eq!(LabelMode::from_token("fr"), None);
        assert_eq!(ExportPreset::from_token("map"), None);
    }
}
