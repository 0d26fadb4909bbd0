//! Text drawing for the export banner.
//!
//! No font is embedded. Callers load a TrueType file at runtime; when none is
//! configured the banner is still laid out, just without text.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use rusttype::{Font, Scale};
use std::path::Path;

use heatmap_common::{HeatmapError, HeatmapResult};

/// A loaded banner font.
pub struct BannerFont {
    font: Font<'static>,
}

impl std::fmt::Debug for BannerFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BannerFont").finish_non_exhaustive()
    }
}

impl BannerFont {
    pub fn from_bytes(bytes: Vec<u8>) -> HeatmapResult<Self> {
        Font::try_from_vec(bytes)
            .map(|font| Self { font })
            .ok_or_else(|| HeatmapError::Font("not a valid TrueType font".to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> HeatmapResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| HeatmapError::Font(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(bytes)
    }

    /// Draw `text` with its baseline at `(x, baseline)`, size in pixels.
    pub fn draw_baseline(
        &self,
        img: &mut RgbaImage,
        color: Rgba<u8>,
        x: i32,
        baseline: i32,
        size: f32,
        text: &str,
    ) {
        let scale = Scale::uniform(size);
        // imageproc positions glyphs by their top edge
        let ascent = self.font.v_metrics(scale).ascent;
        let top = baseline - ascent.round() as i32;
        draw_text_mut(img, color, x, top, scale, &self.font, text);
    }
}
