//! On-map region labels.
//!
//! Labels are always rebuilt as a whole set from the current view config.
//! With 14 regions the redundant work is negligible and there is no
//! per-label state to invalidate.

use serde::Serialize;

use heatmap_common::{BoundaryDataset, LabelMode, LatLng, Region, ValueMap, ViewConfig};

/// Separator between English and Arabic names in `both` mode.
pub const NAME_SEPARATOR: &str = " / ";

/// Display text for one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionLabel {
    pub region: Region,
    pub name: String,
    /// Raw value text, present only when values are shown.
    pub value: Option<String>,
}

impl RegionLabel {
    /// Markup placed inside the map's label marker.
    pub fn to_html(&self) -> String {
        let name = escape_html(&self.name);
        match &self.value {
            Some(value) => format!(
                r#"<span class="gov-label"><span class="gov-name">{}</span><span class="gov-value">{}</span></span>"#,
                name,
                escape_html(value)
            ),
            None => format!(
                r#"<span class="gov-label"><span class="gov-name">{}</span></span>"#,
                name
            ),
        }
    }
}

/// A label positioned on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLabel {
    pub anchor: LatLng,
    pub label: RegionLabel,
}

/// Region name in the requested language(s).
pub fn label_text(region: Region, mode: LabelMode) -> String {
    match mode {
        LabelMode::English => region.english_name().to_string(),
        LabelMode::Arabic => region.arabic_name().to_string(),
        LabelMode::Both => format!(
            "{}{}{}",
            region.english_name(),
            NAME_SEPARATOR,
            region.arabic_name()
        ),
    }
}

/// Raw value text. `f64` display already drops a trailing `.0` and always
/// writes positional digits, never exponent notation.
pub fn value_text(value: f64) -> String {
    format!("{}", value)
}

pub fn label_for(region: Region, mode: LabelMode, show_value: bool, values: &ValueMap) -> RegionLabel {
    RegionLabel {
        region,
        name: label_text(region, mode),
        value: show_value.then(|| value_text(values.get(region))),
    }
}

/// Label position: the feature centroid, nudged for regions that need it.
pub fn label_anchor(region: Region, centroid: LatLng) -> LatLng {
    match region.label_lat_offset() {
        Some(offset) => LatLng::new(centroid.lat + offset, centroid.lng),
        None => centroid,
    }
}

/// Hover tooltip, e.g. `Idlib: 7`.
pub fn tooltip_for(region: Region, values: &ValueMap) -> String {
    format!("{}: {}", region.english_name(), value_text(values.get(region)))
}

/// Rebuild every label for the dataset.
///
/// Returns nothing when names are switched off: label mode and value display
/// sit behind that switch. Features whose key is not a known region are
/// skipped.
pub fn compose_labels(dataset: &BoundaryDataset, config: &ViewConfig) -> Vec<PlacedLabel> {
    if !config.show_names {
        return Vec::new();
    }

    dataset
        .features
        .iter()
        .filter_map(|feature| {
            let region = feature.region()?;
            Some(PlacedLabel {
                anchor: label_anchor(region, feature.center()),
                label: label_for(region, config.label_mode, config.show_values, &config.values),
            })
        })
        .collect()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
