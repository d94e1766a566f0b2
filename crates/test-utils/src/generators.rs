//! Synthetic snapshot generators.
//!
//! All generators return row-major `Vec<f64>` with `rows * columns` values,
//! the same layout the simulation writes to disk.

/// Creates a grid with predictable values.
///
/// Each cell value is `row * 1000 + col`, so a misplaced read is obvious.
///
/// # Example
///
/// ```
/// use test_utils::create_index_grid;
///
/// let grid = create_index_grid(2, 3);
/// assert_eq!(grid, vec![0.0, 1.0, 2.0, 1000.0, 1001.0, 1002.0]);
/// ```
pub fn create_index_grid(rows: usize, columns: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(rows * columns);
    for row in 0..rows {
        for col in 0..columns {
            data.push((row * 1000 + col) as f64);
        }
    }
    data
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(rows: usize, columns: usize, value: f64) -> Vec<f64> {
    vec![value; rows * columns]
}

/// Creates a left-to-right linear ramp from `low` to `high`.
///
/// The first column is exactly `low`, the last exactly `high`.
pub fn create_gradient_grid(rows: usize, columns: usize, low: f64, high: f64) -> Vec<f64> {
    let mut data = Vec::with_capacity(rows * columns);
    let span = (columns.max(2) - 1) as f64;
    for _row in 0..rows {
        for col in 0..columns {
            data.push(low + (high - low) * col as f64 / span);
        }
    }
    data
}

/// Creates a smooth bump: `base` at the edges rising to `peak` at the center.
///
/// Produces closed contours around the center, like a pressure pulse.
pub fn create_bump_grid(rows: usize, columns: usize, base: f64, peak: f64) -> Vec<f64> {
    let mut data = Vec::with_capacity(rows * columns);
    let cy = (rows as f64 - 1.0) / 2.0;
    let cx = (columns as f64 - 1.0) / 2.0;
    let radius = (cx * cx + cy * cy).sqrt().max(1.0);

    for row in 0..rows {
        for col in 0..columns {
            let dy = row as f64 - cy;
            let dx = col as f64 - cx;
            let r = (dx * dx + dy * dy).sqrt() / radius;
            let weight = (1.0 - r).max(0.0);
            data.push(base + (peak - base) * weight * weight);
        }
    }
    data
}

/// Zeroes a rectangular block of cells, like the solver does for cells
/// outside the flow domain.
///
/// The block covers rows `row_start..row_end` and columns
/// `col_start..col_end`, clipped to the grid.
pub fn mask_block(
    data: &mut [f64],
    columns: usize,
    row_start: usize,
    row_end: usize,
    col_start: usize,
    col_end: usize,
) {
    let rows = data.len() / columns.max(1);
    for row in row_start..row_end.min(rows) {
        for col in col_start..col_end.min(columns) {
            data[row * columns + col] = 0.0;
        }
    }
}

/// Encodes values the way the simulation writes them: raw little-endian f64.
pub fn encode_snapshot(values: &[f64]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(values.len() * 8);
    for v in values {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}
