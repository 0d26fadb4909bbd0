//! Pure rendering logic for the governorate heatmap.
//!
//! - Color scale (value normalization and two-stop interpolation)
//! - Legend derivation
//! - Region label composition
//! - Export compositing (crop, banner, PNG encoding)

pub mod export;
pub mod gradient;
pub mod labels;
pub mod legend;
pub mod png;
pub mod text;

pub use gradient::{color_for, fill_colors, legend_ticks, normalize, Color};
pub use labels::{compose_labels, label_for, PlacedLabel, RegionLabel};
pub use legend::Legend;
