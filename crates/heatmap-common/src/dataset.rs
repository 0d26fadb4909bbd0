//! Boundary dataset: the pre-supplied GeoJSON features.
//!
//! Only two things are read from each feature: its region key
//! (`properties.shapeName`) and the bounding box of its coordinates. Geometry
//! is otherwise opaque.

use serde_json::Value;
use std::path::Path;

use crate::bbox::{GeoBounds, LatLng};
use crate::error::{HeatmapError, HeatmapResult};
use crate::region::Region;

/// Property carrying the region key.
pub const NAME_PROPERTY: &str = "shapeName";

/// One named feature of the boundary dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub key: String,
    pub bounds: GeoBounds,
}

impl BoundaryFeature {
    pub fn region(&self) -> Option<Region> {
        Region::from_key(&self.key)
    }

    /// Center of the feature's bounding box.
    pub fn center(&self) -> LatLng {
        self.bounds.center()
    }
}

/// The feature collection, in dataset order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryDataset {
    pub features: Vec<BoundaryFeature>,
}

impl BoundaryDataset {
    pub fn new(features: Vec<BoundaryFeature>) -> Self {
        Self { features }
    }

    pub fn from_file(path: impl AsRef<Path>) -> HeatmapResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_geojson(&content)
    }

    /// Parse a GeoJSON `FeatureCollection`.
    ///
    /// Features without a name or without any coordinates are skipped.
    pub fn from_geojson(json: &str) -> HeatmapResult<Self> {
        let root: Value = serde_json::from_str(json)?;
        let features = root
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| HeatmapError::InvalidDataset("missing 'features' array".to_string()))?;

        let parsed = features
            .iter()
            .filter_map(|feature| {
                let key = feature
                    .get("properties")?
                    .get(NAME_PROPERTY)?
                    .as_str()?
                    .to_string();
                let coordinates = feature.get("geometry")?.get("coordinates")?;
                let mut bounds = None;
                collect_bounds(coordinates, &mut bounds);
                bounds.map(|bounds| BoundaryFeature { key, bounds })
            })
            .collect();

        Ok(Self { features: parsed })
    }

    pub fn get(&self, region: Region) -> Option<&BoundaryFeature> {
        self.features.iter().find(|f| f.key == region.key())
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Walk nested coordinate arrays of any depth, growing `bounds` per position.
fn collect_bounds(value: &Value, bounds: &mut Option<GeoBounds>) {
    let Some(items) = value.as_array() else {
        return;
    };

    if let (Some(lng), Some(lat)) = (
        items.first().and_then(Value::as_f64),
        items.get(1).and_then(Value::as_f64),
    ) {
        match bounds {
            Some(b) => b.extend(lng, lat),
            None => *bounds = Some(GeoBounds::from_point(lng, lat)),
        }
        return;
    }

    for item in items {
        collect_bounds(item, bounds);
    }
}
