//! Gradient/heatmap rendering for snapshot grids.

use snapshot_common::ColorScale;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Viridis anchor colors at evenly spaced positions 0, 1/8, ..., 1.
const VIRIDIS: [Color; 9] = [
    Color::new(68, 1, 84, 255),
    Color::new(71, 44, 122, 255),
    Color::new(59, 82, 139, 255),
    Color::new(44, 114, 142, 255),
    Color::new(33, 145, 140, 255),
    Color::new(40, 174, 128, 255),
    Color::new(94, 201, 98, 255),
    Color::new(170, 220, 50, 255),
    Color::new(253, 231, 37, 255),
];

/// Viridis colormap for a normalized position in [0, 1].
///
/// Out-of-range positions clamp to the end colors.
pub fn viridis(t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let segments = (VIRIDIS.len() - 1) as f64;
    let pos = t * segments;
    let idx = (pos.floor() as usize).min(VIRIDIS.len() - 2);
    interpolate_color(VIRIDIS[idx], VIRIDIS[idx + 1], (pos - idx as f64) as f32)
}

/// Linear color interpolation
fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((color1.r as f32 * t_inv) + (color2.r as f32 * t)).round() as u8,
        ((color1.g as f32 * t_inv) + (color2.g as f32 * t)).round() as u8,
        ((color1.b as f32 * t_inv) + (color2.b as f32 * t)).round() as u8,
        ((color1.a as f32 * t_inv) + (color2.a as f32 * t)).round() as u8,
    )
}

/// Color for one cell, or `None` for masked (NaN) cells.
///
/// Values at or below `scale.min` get the bottom color, values at or above
/// `scale.max` the top color.
pub fn color_for_value<F>(value: f64, scale: &ColorScale, color_fn: F) -> Option<Color>
where
    F: Fn(f64) -> Color,
{
    if value.is_nan() {
        return None;
    }
    Some(color_fn(scale.normalize(value)))
}

/// Render grid data as a gradient heatmap, one pixel per cell.
///
/// # Arguments
/// - `data`: 2D grid of values (row-major order)
/// - `width`: Number of columns
/// - `height`: Number of rows
/// - `scale`: Value range mapped onto the colormap
/// - `color_fn`: Function to convert a normalized value (0-1) to a color
///
/// # Returns
/// RGBA pixel data (4 bytes per pixel); masked cells are fully transparent.
pub fn render_grid<F>(
    data: &[f64],
    width: usize,
    height: usize,
    scale: &ColorScale,
    color_fn: F,
) -> Vec<u8>
where
    F: Fn(f64) -> Color,
{
    let mut pixels = vec![0u8; width * height * 4];

    for (idx, value) in data.iter().take(width * height).enumerate() {
        let color = color_for_value(*value, scale, &color_fn).unwrap_or_else(Color::transparent);
        pixels[idx * 4..idx * 4 + 4].copy_from_slice(&color.to_array());
    }

    pixels
}

/// Pixel rectangle in canvas coordinates (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Blit per-cell colors into an RGBA canvas with nearest-neighbor scaling.
///
/// Every canvas pixel whose center lies inside `rect` takes the color of the
/// grid cell under that center; cells are never blended. Transparent cells
/// leave the canvas untouched.
pub fn blit_nearest(
    canvas: &mut [u8],
    canvas_width: usize,
    canvas_height: usize,
    cells: &[u8],
    columns: usize,
    rows: usize,
    rect: PixelRect,
) {
    if columns == 0 || rows == 0 || rect.width <= 0.0 || rect.height <= 0.0 {
        return;
    }

    let cell_w = rect.width / columns as f32;
    let cell_h = rect.height / rows as f32;

    let x_start = rect.x.max(0.0).floor() as usize;
    let x_end = (rect.right().ceil() as usize).min(canvas_width);
    let y_start = rect.y.max(0.0).floor() as usize;
    let y_end = (rect.bottom().ceil() as usize).min(canvas_height);

    for py in y_start..y_end {
        let cy = py as f32 + 0.5;
        if cy < rect.y || cy >= rect.bottom() {
            continue;
        }
        let row = (((cy - rect.y) / cell_h) as usize).min(rows - 1);

        for px in x_start..x_end {
            let cx = px as f32 + 0.5;
            if cx < rect.x || cx >= rect.right() {
                continue;
            }
            let col = (((cx - rect.x) / cell_w) as usize).min(columns - 1);

            let src = (row * columns + col) * 4;
            if cells[src + 3] == 0 {
                continue;
            }
            let dst = (py * canvas_width + px) * 4;
            canvas[dst..dst + 4].copy_from_slice(&cells[src..src + 4]);
        }
    }
}
