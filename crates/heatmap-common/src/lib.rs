//! Common types shared across the governorate heatmap crates.

pub mod bbox;
pub mod config;
pub mod dataset;
pub mod error;
pub mod palette;
pub mod region;
pub mod time;

pub use bbox::{GeoBounds, LatLng, Rect};
pub use dataset::{BoundaryDataset, BoundaryFeature};
pub use config::{ExportPreset, LabelMode, ValueMap, ViewConfig};
pub use error::{HeatmapError, HeatmapResult};
pub use palette::Palette;
pub use region::{Region, REGION_COUNT};
