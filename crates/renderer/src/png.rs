//! PNG encoding for rendered maps.
//!
//! Maps drawn with a handful of colours (decorations, flat fills, coarse
//! grids) are written as indexed PNG (colour type 3); anything with more
//! than 256 distinct colours falls back to RGBA (colour type 6).

use image::RgbaImage;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::io::Write;

use crate::error::{RenderError, RenderResult};

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

/// Minimum pixels to benefit from parallel palette extraction
const PARALLEL_THRESHOLD: usize = 4096;

const COLOR_TYPE_INDEXED: u8 = 3;
const COLOR_TYPE_RGBA: u8 = 6;

type Palette = Vec<[u8; 4]>;

/// Encode an image, choosing indexed or RGBA output.
pub fn encode_png(image: &RgbaImage) -> RenderResult<Vec<u8>> {
    let (width, height) = image.dimensions();
    let pixels = image.as_raw();

    let palette = if pixels.len() / 4 >= PARALLEL_THRESHOLD {
        extract_palette_parallel(pixels)
    } else {
        extract_palette(pixels)
    };

    match palette {
        Some((palette, indices)) => write_png(
            width,
            height,
            COLOR_TYPE_INDEXED,
            Some(&palette),
            &indices,
            width as usize,
        ),
        None => write_png(width, height, COLOR_TYPE_RGBA, None, pixels, width as usize * 4),
    }
}

/// Pack RGBA bytes into a u32 for faster hashing and comparison
#[inline(always)]
fn pack(p: &[u8]) -> u32 {
    u32::from_le_bytes([p[0], p[1], p[2], p[3]])
}

/// Palette plus one index per pixel, or `None` past 256 colours.
fn extract_palette(pixels: &[u8]) -> Option<(Palette, Vec<u8>)> {
    let mut lookup: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette = Palette::with_capacity(MAX_PALETTE_SIZE);
    let mut indices = Vec::with_capacity(pixels.len() / 4);

    for px in pixels.chunks_exact(4) {
        let key = pack(px);
        let index = match lookup.get(&key) {
            Some(&i) => i,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let i = palette.len() as u8;
                palette.push([px[0], px[1], px[2], px[3]]);
                lookup.insert(key, i);
                i
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Parallel variant: collect distinct colours per chunk, merge in chunk
/// order so the palette is deterministic, then map pixels to indices.
fn extract_palette_parallel(pixels: &[u8]) -> Option<(Palette, Vec<u8>)> {
    let chunk_pixels = (pixels.len() / 4 / rayon::current_num_threads()).max(256);

    let per_chunk: Vec<Option<Vec<u32>>> = pixels
        .par_chunks(chunk_pixels * 4)
        .map(|chunk| {
            let mut seen = HashSet::with_capacity(MAX_PALETTE_SIZE);
            let mut ordered = Vec::new();
            for px in chunk.chunks_exact(4) {
                let key = pack(px);
                if seen.insert(key) {
                    if seen.len() > MAX_PALETTE_SIZE {
                        return None;
                    }
                    ordered.push(key);
                }
            }
            Some(ordered)
        })
        .collect();

    let mut lookup: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette = Palette::with_capacity(MAX_PALETTE_SIZE);
    for keys in per_chunk {
        for key in keys? {
            if lookup.contains_key(&key) {
                continue;
            }
            if palette.len() >= MAX_PALETTE_SIZE {
                return None;
            }
            lookup.insert(key, palette.len() as u8);
            palette.push(key.to_le_bytes());
        }
    }

    let indices = pixels
        .par_chunks_exact(4)
        .map(|px| lookup.get(&pack(px)).copied().unwrap_or(0))
        .collect();

    Some((palette, indices))
}

fn write_png(
    width: u32,
    height: u32,
    color_type: u8,
    palette: Option<&Palette>,
    data: &[u8],
    row_bytes: usize,
) -> RenderResult<Vec<u8>> {
    let mut png = Vec::with_capacity(data.len() / 2 + 1024);
    png.extend_from_slice(&SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.extend_from_slice(&[8, color_type, 0, 0, 0]);
    write_chunk(&mut png, b"IHDR", &ihdr);

    if let Some(palette) = palette {
        let plte: Vec<u8> = palette.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
        write_chunk(&mut png, b"PLTE", &plte);

        // tRNS only when some entry is not opaque
        if palette.iter().any(|c| c[3] < 255) {
            let trns: Vec<u8> = palette.iter().map(|c| c[3]).collect();
            write_chunk(&mut png, b"tRNS", &trns);
        }
    }

    let idat = deflate_scanlines(data, row_bytes, height as usize)
        .map_err(|e| RenderError::Encode(format!("IDAT compression failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Prefix each scanline with filter type 0 and zlib-compress.
fn deflate_scanlines(data: &[u8], row_bytes: usize, rows: usize) -> std::io::Result<Vec<u8>> {
    let mut raw = Vec::with_capacity(rows * (row_bytes + 1));
    for row in data.chunks_exact(row_bytes.max(1)).take(rows) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&raw)?;
    encoder.finish()
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

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    // colour type byte sits after signature (8), length (4), "IHDR" (4),
    // width (4), height (4) and bit depth (1)
    const COLOR_TYPE_OFFSET: usize = 25;

    #[test]
    fn test_extract_palette_simple() {
        let pixels = [
            255, 0, 0, 255, // red
            0, 255, 0, 255, // green
            0, 0, 255, 255, // blue
            255, 0, 0, 255, // red again
        ];
        let (palette, indices) = extract_palette(&pixels).unwrap();
        assert_eq!(palette.len(), 3);
        assert_eq!(indices, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut image = RgbaImage::new(128, 128);
        for (x, y, px) in image.enumerate_pixels_mut() {
            let c = (((x / 8) + (y / 8)) % 50) as u8;
            *px = Rgba([c * 5, 100 + c * 3, 200 - c * 2, 255]);
        }
        let seq = extract_palette(image.as_raw()).unwrap();
        let par = extract_palette_parallel(image.as_raw()).unwrap();
        assert_eq!(seq.0.len(), par.0.len());
        // same colour for every pixel, whatever the index order
        for (a, b) in seq.1.iter().zip(par.1.iter()) {
            assert_eq!(seq.0[*a as usize], par.0[*b as usize]);
        }
    }

    #[test]
    fn test_few_colours_use_indexed() {
        let image = RgbaImage::from_pixel(16, 16, Rgba([0, 255, 255, 255]));
        let png = encode_png(&image).unwrap();
        assert_eq!(&png[0..8], &SIGNATURE);
        assert_eq!(png[COLOR_TYPE_OFFSET], COLOR_TYPE_INDEXED);
    }

    #[test]
    fn test_many_colours_use_rgba() {
        let mut image = RgbaImage::new(300, 1);
        for (x, _, px) in image.enumerate_pixels_mut() {
            *px = Rgba([(x % 256) as u8, (x / 2) as u8, (x / 3) as u8, 255]);
        }
        let png = encode_png(&image).unwrap();
        assert_eq!(png[COLOR_TYPE_OFFSET], COLOR_TYPE_RGBA);
    }

    #[test]
    fn test_decodes_back_to_same_pixels() {
        let mut image = RgbaImage::from_pixel(5, 3, Rgba([255, 255, 255, 255]));
        image.put_pixel(2, 1, Rgba([255, 0, 0, 128]));
        let png = encode_png(&image).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded, image);
    }
}
