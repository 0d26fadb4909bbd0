//! Shareable link codec for the heatmap view configuration.
//!
//! A link carries six flat key/value pairs:
//!
//! | key | values |
//! |---|---|
//! | `palette` | palette catalog name |
//! | `showNames` | `0` / `1` |
//! | `labelMode` | `en` / `ar` / `both` |
//! | `showValues` | `0` / `1` |
//! | `exportPreset` | `map_only` / `map_legend` / `map_legend_meta` |
//! | `values` | 14 comma-joined numbers in canonical region order |
//!
//! Decoding never fails as a whole: each field is validated on its own and
//! skipped when invalid.

pub mod codec;
pub mod params;

pub use codec::{decode, encode, query_part, share_link};
pub use params::{PartialViewConfig, ViewStateParams};
