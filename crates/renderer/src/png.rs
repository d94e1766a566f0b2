//! PNG encoding for RGBA image data.
//!
//! Supports two encoding modes:
//! - **Indexed PNG (color type 3)**: Used when image has ≤256 unique colors.
//!   Produces smaller files and encodes faster.
//! - **RGBA PNG (color type 6)**: Fallback for images with >256 colors.
//!
//! Output is deterministic: the same pixels always produce the same bytes.

use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::io::Write;

use crate::error::RenderError;

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

/// Minimum pixels to benefit from parallel palette extraction
const PARALLEL_THRESHOLD: usize = 4096; // 64x64 or larger

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

const METRES_PER_INCH: f64 = 0.0254;

type Palette = Vec<(u8, u8, u8, u8)>;

/// Create a PNG image with automatic format selection.
///
/// - If ≤256 unique colors: uses indexed PNG
/// - Otherwise: uses RGBA PNG
///
/// When `dpi` is given a `pHYs` chunk records the physical resolution.
///
/// # Arguments
/// - `pixels`: RGBA pixel data (4 bytes per pixel, straight alpha)
/// - `width`: Image width in pixels
/// - `height`: Image height in pixels
/// - `dpi`: Optional resolution in dots per inch
pub fn encode_png(
    pixels: &[u8],
    width: usize,
    height: usize,
    dpi: Option<u32>,
) -> Result<Vec<u8>, RenderError> {
    let num_pixels = pixels.len() / 4;

    let palette_result = if num_pixels >= PARALLEL_THRESHOLD {
        extract_palette_parallel(pixels)
    } else {
        extract_palette_sequential(pixels)
    };

    match palette_result {
        Some((palette, indices)) => create_png_indexed(width, height, &palette, &indices, dpi),
        None => create_png(pixels, width, height, dpi),
    }
}

/// Pack RGBA bytes into a u32 for faster hashing and comparison
#[inline(always)]
fn pack_color(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (r as u32) | ((g as u32) << 8) | ((b as u32) << 16) | ((a as u32) << 24)
}

/// Unpack u32 back to RGBA tuple
#[inline(always)]
fn unpack_color(packed: u32) -> (u8, u8, u8, u8) {
    (
        packed as u8,
        (packed >> 8) as u8,
        (packed >> 16) as u8,
        (packed >> 24) as u8,
    )
}

/// Sequential palette extraction for small images.
///
/// Palette entries appear in first-use order.
fn extract_palette_sequential(pixels: &[u8]) -> Option<(Palette, Vec<u8>)> {
    let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Palette = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices: Vec<u8> = Vec::with_capacity(pixels.len() / 4);

    for chunk in pixels.chunks_exact(4) {
        let packed = pack_color(chunk[0], chunk[1], chunk[2], chunk[3]);

        let index = match color_to_index.get(&packed) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push((chunk[0], chunk[1], chunk[2], chunk[3]));
                color_to_index.insert(packed, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Parallel palette extraction for larger images.
///
/// 1. Parallel pass: collect unique colors per chunk
/// 2. Merge, sort and check the palette fits in 256 entries
/// 3. Parallel pass: map each pixel to its palette index
///
/// Sorting the merged colors keeps the palette independent of hash order.
fn extract_palette_parallel(pixels: &[u8]) -> Option<(Palette, Vec<u8>)> {
    let chunk_size = (pixels.len() / 4 / rayon::current_num_threads()).max(256) * 4;

    let chunk_colors: Vec<Vec<u32>> = pixels
        .par_chunks(chunk_size)
        .map(|chunk| {
            let mut local: HashSet<u32> = HashSet::with_capacity(MAX_PALETTE_SIZE);
            for pixel in chunk.chunks_exact(4) {
                local.insert(pack_color(pixel[0], pixel[1], pixel[2], pixel[3]));
                // Early exit if we definitely have too many colors
                if local.len() > MAX_PALETTE_SIZE {
                    break;
                }
            }
            local.into_iter().collect()
        })
        .collect();

    let mut unique: Vec<u32> = chunk_colors.into_iter().flatten().collect();
    unique.sort_unstable();
    unique.dedup();
    if unique.len() > MAX_PALETTE_SIZE {
        return None;
    }

    let color_to_index: HashMap<u32, u8> = unique
        .iter()
        .enumerate()
        .map(|(i, packed)| (*packed, i as u8))
        .collect();
    let palette: Palette = unique.iter().map(|p| unpack_color(*p)).collect();

    let indices: Vec<u8> = pixels
        .par_chunks_exact(4)
        .map(|p| {
            let packed = pack_color(p[0], p[1], p[2], p[3]);
            color_to_index.get(&packed).copied().unwrap_or(0)
        })
        .collect();

    Some((palette, indices))
}

/// Create an indexed PNG (color type 3) from palette and indices.
pub fn create_png_indexed(
    width: usize,
    height: usize,
    palette: &[(u8, u8, u8, u8)],
    indices: &[u8],
    dpi: Option<u32>,
) -> Result<Vec<u8>, RenderError> {
    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 3));

    let mut plte_data = Vec::with_capacity(palette.len() * 3);
    for (r, g, b, _) in palette {
        plte_data.extend_from_slice(&[*r, *g, *b]);
    }
    write_chunk(&mut png, b"PLTE", &plte_data);

    // tRNS chunk (transparency) - only if any color has alpha < 255
    if palette.iter().any(|(_, _, _, a)| *a < 255) {
        let trns_data: Vec<u8> = palette.iter().map(|(_, _, _, a)| *a).collect();
        write_chunk(&mut png, b"tRNS", &trns_data);
    }

    if let Some(dpi) = dpi {
        write_chunk(&mut png, b"pHYs", &phys(dpi));
    }

    let idat_data = deflate_scanlines(indices, width, height, 1)?;
    write_chunk(&mut png, b"IDAT", &idat_data);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Create a PNG image from RGBA pixel data (color type 6).
///
/// This is the fallback for images with >256 unique colors.
pub fn create_png(
    pixels: &[u8],
    width: usize,
    height: usize,
    dpi: Option<u32>,
) -> Result<Vec<u8>, RenderError> {
    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 6));
    if let Some(dpi) = dpi {
        write_chunk(&mut png, b"pHYs", &phys(dpi));
    }

    let idat_data = deflate_scanlines(pixels, width, height, 4)?;
    write_chunk(&mut png, b"IDAT", &idat_data);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Pixels per metre for a DPI value, as stored in `pHYs`.
pub fn dpi_to_pixels_per_metre(dpi: u32) -> u32 {
    (dpi as f64 / METRES_PER_INCH).round() as u32
}

fn ihdr(width: usize, height: usize, color_type: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&(width as u32).to_be_bytes());
    data.extend_from_slice(&(height as u32).to_be_bytes());
    data.push(8); // bit depth
    data.push(color_type);
    data.push(0); // compression method
    data.push(0); // filter method
    data.push(0); // interlace method
    data
}

fn phys(dpi: u32) -> Vec<u8> {
    let ppm = dpi_to_pixels_per_metre(dpi);
    let mut data = Vec::with_capacity(9);
    data.extend_from_slice(&ppm.to_be_bytes());
    data.extend_from_slice(&ppm.to_be_bytes());
    data.push(1); // unit: metre
    data
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Deflate image rows for the IDAT chunk, prefixing each with filter type 0.
fn deflate_scanlines(
    data: &[u8],
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
) -> Result<Vec<u8>, RenderError> {
    let row_len = width * bytes_per_pixel;
    let mut uncompressed = Vec::with_capacity(height * (1 + row_len));

    for row in data.chunks_exact(row_len.max(1)).take(height) {
        uncompressed.push(0); // filter type: none
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&uncompressed)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_palette_simple() {
        // 4 pixels: red, green, blue, red (3 unique colors)
        let pixels = [
            255, 0, 0, 255, // red
            0, 255, 0, 255, // green
            0, 0, 255, 255, // blue
            255, 0, 0, 255, // red again
        ];

        let (palette, indices) = extract_palette_sequential(&pixels).unwrap();
        assert_eq!(palette.len(), 3);
        assert_eq!(indices, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_extract_palette_parallel_is_deterministic() {
        let mut pixels = Vec::with_capacity(128 * 128 * 4);
        for y in 0..128u32 {
            for x in 0..128u32 {
                let color_idx = (x / 8) + (y / 8);
                pixels.extend_from_slice(&[(color_idx * 5) as u8, 100, 200, 255]);
            }
        }

        let (palette_a, indices_a) = extract_palette_parallel(&pixels).unwrap();
        let (palette_b, indices_b) = extract_palette_parallel(&pixels).unwrap();
        assert_eq!(palette_a.len(), 31);
        assert_eq!(palette_a, palette_b);
        assert_eq!(indices_a, indices_b);
        assert_eq!(indices_a.len(), 128 * 128);

        let (r, _, _, _) = palette_a[indices_a[0] as usize];
        assert_eq!(r, 0);
    }

    #[test]
    fn test_extract_palette_too_many_colors() {
        let mut pixels = Vec::new();
        for i in 0..300u32 {
            pixels.extend_from_slice(&[(i % 256) as u8, (i / 256) as u8, 0, 255]);
        }
        assert!(extract_palette_sequential(&pixels).is_none());
    }

    #[test]
    fn test_phys_chunk_for_100_dpi() {
        assert_eq!(dpi_to_pixels_per_metre(100), 3937);
        assert_eq!(dpi_to_pixels_per_metre(72), 2835);

        let png = create_png(&[0, 0, 0, 255], 1, 1, Some(100)).unwrap();
        let pos = png.windows(4).position(|w| w == b"pHYs").unwrap();
        assert_eq!(&png[pos + 4..pos + 8], &3937u32.to_be_bytes());
        assert_eq!(png[pos + 12], 1);
    }

    #[test]
    fn test_crc_matches_whole_chunk_hash() {
        let mut png = Vec::new();
        write_chunk(&mut png, b"IEND", &[]);
        assert_eq!(&png[8..12], &crc32fast::hash(b"IEND").to_be_bytes());
    }
}
