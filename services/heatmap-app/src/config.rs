//! Application configuration.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use heatmap_common::{HeatmapError, HeatmapResult};
use renderer::text::BannerFont;

/// Runtime settings for the `heatmap` binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Host display density; export scale is derived from it
    pub device_pixel_ratio: f64,

    /// Directory receiving exported PNGs
    pub output_dir: PathBuf,

    /// TrueType font for the export banner text
    pub font_path: Option<PathBuf>,

    /// Page the share link points at
    pub base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            device_pixel_ratio: 1.0,
            output_dir: PathBuf::from("."),
            font_path: None,
            base_url: "index.html".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml(path: impl AsRef<Path>) -> HeatmapResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| HeatmapError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load configuration from `HEATMAP_*` environment variables.
    pub fn from_env() -> HeatmapResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> HeatmapResult<Self> {
        let defaults = Self::default();

        let device_pixel_ratio = match lookup("HEATMAP_DEVICE_PIXEL_RATIO") {
            Some(raw) => raw.trim().parse::<f64>().map_err(|_| {
                HeatmapError::Config(format!("HEATMAP_DEVICE_PIXEL_RATIO: invalid number '{}'", raw))
            })?,
            None => defaults.device_pixel_ratio,
        };

        Ok(Self {
            device_pixel_ratio,
            output_dir: lookup("HEATMAP_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            font_path: lookup("HEATMAP_FONT_PATH").map(PathBuf::from),
            base_url: lookup("HEATMAP_BASE_URL").unwrap_or(defaults.base_url),
        })
    }

    /// Load the banner font, if one is configured.
    pub fn load_font(&self) -> HeatmapResult<Option<Arc<BannerFont>>> {
        self.font_path
            .as_ref()
            .map(|path| BannerFont::from_file(path).map(Arc::new))
            .transpose()
    }
}
