//! Common test fixtures for the heatmap tests.

use heatmap_common::{
    BoundaryDataset, BoundaryFeature, ExportPreset, GeoBounds, LabelMode, Palette, Rect, Region,
    ValueMap, ViewConfig,
};

/// Approximate governorate extents as (region, min_lng, min_lat, max_lng, max_lat).
pub const REGION_EXTENTS: [(Region, f64, f64, f64, f64); 14] = [
    (Region::Aleppo, 36.5, 35.6, 38.5, 36.7),
    (Region::Damascus, 36.2, 33.45, 36.4, 33.6),
    (Region::RuralDamascus, 35.9, 32.9, 37.9, 34.2),
    (Region::Daraa, 35.9, 32.3, 36.6, 33.0),
    (Region::Quneitra, 35.7, 32.8, 35.95, 33.3),
    (Region::AsSweida, 36.3, 32.3, 37.2, 33.1),
    (Region::Homs, 36.3, 33.6, 40.0, 35.2),
    (Region::Hama, 36.3, 34.8, 38.0, 35.6),
    (Region::Tartous, 35.8, 34.6, 36.3, 35.2),
    (Region::Lattakia, 35.7, 35.2, 36.2, 36.0),
    (Region::Idleb, 36.1, 35.4, 37.0, 36.3),
    (Region::ArRaqqa, 38.0, 35.3, 39.9, 36.7),
    (Region::DeirEzZor, 39.3, 34.3, 41.3, 36.0),
    (Region::AlHasakeh, 39.9, 35.9, 42.4, 37.3),
];

/// The config used in the round-trip examples: blue palette, bilingual
/// names, values hidden, map+legend export, Dar'a = 42.5.
pub fn sample_config() -> ViewConfig {
    let mut values = ValueMap::new();
    values.set(Region::Daraa, 42.5);
    ViewConfig {
        palette: Palette::Blue,
        show_names: true,
        label_mode: LabelMode::Both,
        show_values: false,
        export_preset: ExportPreset::MapLegend,
        values,
    }
}

/// Values 0, 10, 20, ... in canonical order.
pub fn ramp_values() -> ValueMap {
    let mut values = ValueMap::new();
    for (i, region) in Region::ALL.iter().enumerate() {
        values.set(*region, i as f64 * 10.0);
    }
    values
}

/// All 14 regions with rectangular extents.
pub fn sample_dataset() -> BoundaryDataset {
    BoundaryDataset::new(
        REGION_EXTENTS
            .iter()
            .map(|(region, min_lng, min_lat, max_lng, max_lat)| BoundaryFeature {
                key: region.key().to_string(),
                bounds: GeoBounds {
                    min_lng: *min_lng,
                    min_lat: *min_lat,
                    max_lng: *max_lng,
                    max_lat: *max_lat,
                },
            })
            .collect(),
    )
}

/// The same extents as a GeoJSON FeatureCollection of rectangles.
pub fn sample_geojson() -> String {
    let features: Vec<serde_json::Value> = REGION_EXTENTS
        .iter()
        .map(|(region, x0, y0, x1, y1)| {
            serde_json::json!({
                "type": "Feature",
                "properties": { "shapeName": region.key() },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]]
                }
            })
        })
        .collect();
    serde_json::json!({ "type": "FeatureCollection", "features": features }).to_string()
}

/// Element layout of the map panel in document coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PanelLayout {
    pub wrapper: Rect,
    pub map: Rect,
    pub legend: Rect,
}

/// A 800x700 wrapper holding a 800x560 map and a legend 12px below it.
pub fn sample_layout() -> PanelLayout {
    PanelLayout {
        wrapper: Rect::from_size(20.0, 100.0, 800.0, 700.0),
        map: Rect::from_size(20.0, 100.0, 800.0, 560.0),
        legend: Rect::from_size(20.0, 672.0, 800.0, 128.0),
    }
}
