//! Raw link parameters and their validated, partial form.

use serde::Serialize;

use heatmap_common::{ExportPreset, LabelMode, Palette, Region, ViewConfig, REGION_COUNT};

pub const PARAM_PALETTE: &str = "palette";
pub const PARAM_SHOW_NAMES: &str = "showNames";
pub const PARAM_LABEL_MODE: &str = "labelMode";
pub const PARAM_SHOW_VALUES: &str = "showValues";
pub const PARAM_EXPORT_PRESET: &str = "exportPreset";
pub const PARAM_VALUES: &str = "values";

/// KVP (Key-Value Pair) parameters exactly as they appeared in the link.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewStateParams {
    pub palette: Option<String>,
    pub show_names: Option<String>,
    pub label_mode: Option<String>,
    pub show_values: Option<String>,
    pub export_preset: Option<String>,
    pub values: Option<String>,
}

impl ViewStateParams {
    /// Collect known keys from decoded pairs. The first occurrence of a key
    /// wins and unknown keys are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                PARAM_PALETTE => &mut params.palette,
                PARAM_SHOW_NAMES => &mut params.show_names,
                PARAM_LABEL_MODE => &mut params.label_mode,
                PARAM_SHOW_VALUES => &mut params.show_values,
                PARAM_EXPORT_PRESET => &mut params.export_preset,
                PARAM_VALUES => &mut params.values,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }

    /// Validate every field against its own domain.
    pub fn validate(&self) -> PartialViewConfig {
        PartialViewConfig {
            palette: self.palette.as_deref().and_then(Palette::from_name),
            show_names: self.show_names.as_deref().and_then(parse_flag),
            label_mode: self.label_mode.as_deref().and_then(LabelMode::from_token),
            show_values: self.show_values.as_deref().and_then(parse_flag),
            export_preset: self.export_preset.as_deref().and_then(ExportPreset::from_token),
            values: self
                .values
                .as_deref()
                .filter(|token| !token.is_empty())
                .map(parse_values),
        }
    }
}

/// Booleans are exactly `0` or `1`.
fn parse_flag(token: &str) -> Option<bool> {
    match token {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}

/// Positional values; `None` where the slot is unparsable or not finite.
/// A blank slot reads as 0.
fn parse_values(token: &str) -> Vec<Option<f64>> {
    token
        .split(',')
        .take(REGION_COUNT)
        .map(|item| {
            let item = item.trim();
            if item.is_empty() {
                return Some(0.0);
            }
            item.parse::<f64>().ok().filter(|v| v.is_finite())
        })
        .collect()
}

/// The subset of a [`ViewConfig`] a link managed to specify validly.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartialViewConfig {
    pub palette: Option<Palette>,
    pub show_names: Option<bool>,
    pub label_mode: Option<LabelMode>,
    pub show_values: Option<bool>,
    pub export_preset: Option<ExportPreset>,
    /// Per-region slots in canonical order; shorter than 14 when the link
    /// carried fewer numbers.
    pub values: Option<Vec<Option<f64>>>,
}

impl PartialViewConfig {
    /// Overwrite the fields that were specified, leaving the rest untouched.
    pub fn apply_to(&self, config: &mut ViewConfig) {
        if let Some(palette) = self.palette {
            config.palette = palette;
        }
        if let Some(show_names) = self.show_names {
            config.show_names = show_names;
        }
        if let Some(label_mode) = self.label_mode {
            config.label_mode = label_mode;
        }
        if let Some(show_values) = self.show_values {
            config.show_values = show_values;
        }
        if let Some(preset) = self.export_preset {
            config.export_preset = preset;
        }
        if let Some(values) = &self.values {
            for (region, slot) in Region::ALL.iter().zip(values) {
                if let Some(value) = slot {
                    config.values.set(*region, *value);
                }
            }
        }
    }

    /// Start from defaults and apply.
    pub fn to_config(&self) -> ViewConfig {
        let mut config = ViewConfig::default();
        self.apply_to(&mut config);
        config
    }

}
