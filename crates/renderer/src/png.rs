//! PNG encoding for exported images.
//!
//! Picks the encoding per image:
//! - **Indexed PNG (color type 3)** when the image has at most 256 distinct
//!   RGBA colors, which is common for flat choropleth fills.
//! - **RGBA PNG (color type 6)** otherwise.

use image::RgbaImage;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::io::Write;

use heatmap_common::{HeatmapError, HeatmapResult};

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

/// Rows handed to each rayon task during color collection.
const ROWS_PER_TASK: usize = 64;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

const COLOR_TYPE_INDEXED: u8 = 3;
const COLOR_TYPE_RGBA: u8 = 6;

/// Encode an image, choosing indexed or RGBA output.
pub fn encode_png(image: &RgbaImage) -> HeatmapResult<Vec<u8>> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(HeatmapError::EncodeFailed(format!(
            "cannot encode empty image {}x{}",
            width, height
        )));
    }

    let pixels = image.as_raw();
    match build_color_table(pixels, width as usize) {
        Some(table) => {
            tracing::debug!(colors = table.colors.len(), width, height, "Encoding indexed PNG");
            encode_indexed(width, height, &table)
        }
        None => {
            tracing::debug!(width, height, "Encoding RGBA PNG");
            encode_rgba(pixels, width, height)
        }
    }
}

#[inline(always)]
fn pack(px: &[u8]) -> u32 {
    u32::from_le_bytes([px[0], px[1], px[2], px[3]])
}

/// Palette plus one index byte per pixel.
struct ColorTable {
    colors: Vec<[u8; 4]>,
    indices: Vec<u8>,
}

/// Collect distinct colors in parallel; `None` once more than 256 are seen.
fn build_color_table(pixels: &[u8], width: usize) -> Option<ColorTable> {
    let chunk_bytes = width * 4 * ROWS_PER_TASK;

    let unique = pixels
        .par_chunks(chunk_bytes)
        .try_fold(HashSet::new, |mut seen: HashSet<u32>, chunk| {
            for px in chunk.chunks_exact(4) {
                seen.insert(pack(px));
                if seen.len() > MAX_PALETTE_SIZE {
                    return None;
                }
            }
            Some(seen)
        })
        .try_reduce(HashSet::new, |mut a, b| {
            a.extend(b);
            (a.len() <= MAX_PALETTE_SIZE).then_some(a)
        })?;

    // Sorted so identical images always produce identical bytes.
    let mut packed: Vec<u32> = unique.into_iter().collect();
    packed.sort_unstable();

    let lookup: HashMap<u32, u8> = packed
        .iter()
        .enumerate()
        .map(|(i, c)| (*c, i as u8))
        .collect();
    let indices = pixels
        .par_chunks_exact(4)
        .map(|px| lookup.get(&pack(px)).copied().unwrap_or(0))
        .collect();
    let colors = packed.into_iter().map(u32::to_le_bytes).collect();

    Some(ColorTable { colors, indices })
}

fn encode_indexed(width: u32, height: u32, table: &ColorTable) -> HeatmapResult<Vec<u8>> {
    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut png, b"IHDR", &header(width, height, COLOR_TYPE_INDEXED));

    let plte: Vec<u8> = table.colors.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    if table.colors.iter().any(|c| c[3] < 255) {
        let trns: Vec<u8> = table.colors.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    let idat = deflate_scanlines(&table.indices, width as usize)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn encode_rgba(pixels: &[u8], width: u32, height: u32) -> HeatmapResult<Vec<u8>> {
    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut png, b"IHDR", &header(width, height, COLOR_TYPE_RGBA));

    let idat = deflate_scanlines(pixels, width as usize * 4)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// IHDR payload: 8-bit depth, default compression/filter, no interlace.
fn header(width: u32, height: u32, color_type: u8) -> Vec<u8> {
    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.extend_from_slice(&[8, color_type, 0, 0, 0]);
    ihdr
}

/// Prefix each row with filter type 0 and zlib-compress the result.
fn deflate_scanlines(data: &[u8], row_bytes: usize) -> HeatmapResult<Vec<u8>> {
    let rows = data.len() / row_bytes;
    let mut raw = Vec::with_capacity(rows * (row_bytes + 1));
    for row in data.chunks_exact(row_bytes) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    let compressed = encoder.write_all(&raw).and_then(|()| encoder.finish());
    compressed.map_err(|e| HeatmapError::EncodeFailed(format!("IDAT compression failed: {}", e)))
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}
