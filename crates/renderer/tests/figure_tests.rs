//! Tests for full snapshot figures.
//!
//! Figures are decoded back through the `image` crate so the checks see
//! exactly what ends up on disk.

use renderer::contour::Point;
use renderer::gradient::viridis;
use renderer::{render_figure, FigureLayout, FigureStyle};
use snapshot_common::{ColorScale, FieldKind, Grid, GridShape};
use test_utils::assert_approx_eq;
use test_utils::generators::{
    create_bump_grid, create_constant_grid, create_gradient_grid, mask_block,
};

const ROWS: usize = 70;
const COLUMNS: usize = 130;

// ============================================================================
// Helper functions
// ============================================================================

fn grid(values: Vec<f64>) -> Grid {
    Grid::from_values(GridShape::new(ROWS, COLUMNS), values).unwrap()
}

fn decode(png: &[u8]) -> image::RgbaImage {
    image::load_from_memory(png).unwrap().to_rgba8()
}

/// Decoded pixel at the center of grid cell (row, column).
fn cell_pixel(img: &image::RgbaImage, row: usize, column: usize) -> [u8; 4] {
    let layout = FigureLayout::compute(&FigureStyle::default(), ROWS, COLUMNS);
    let (x, y) = layout.grid_to_canvas(ROWS, COLUMNS, Point::new(column as f32, row as f32));
    img.get_pixel(x as u32, y as u32).0
}

// ============================================================================
// Figure tests
// ============================================================================

#[test]
fn test_figure_dimensions_and_dpi() {
    let scale = FieldKind::Temperature.default_scale();
    let figure = render_figure(
        &grid(create_gradient_grid(ROWS, COLUMNS, 0.8, 1.0)),
        &scale,
        &FigureStyle::default(),
    )
    .unwrap();
    let png = figure.encode_png().unwrap();

    let img = decode(&png);
    assert_eq!(img.dimensions(), (640, 480));
    assert_eq!(figure.dpi(), 100);

    let phys = png.windows(4).position(|w| w == b"pHYs").unwrap();
    assert_eq!(&png[phys + 4..phys + 8], &3937u32.to_be_bytes());
}

#[test]
fn test_image_keeps_square_cells() {
    let layout = FigureLayout::compute(&FigureStyle::default(), ROWS, COLUMNS);
    assert_approx_eq!(layout.image.width / COLUMNS as f32, layout.image.height / ROWS as f32, 1e-4);
    assert_approx_eq!(layout.image.x, 80.0, 1e-3);
    // Colorbar spans the full axes height, not just the image
    assert_approx_eq!(layout.colorbar.y, 57.6, 1e-3);
    assert!(layout.colorbar.height > layout.image.height);
}

#[test]
fn test_masked_cells_show_background() {
    let mut values = create_gradient_grid(ROWS, COLUMNS, 0.85, 1.05);
    mask_block(&mut values, COLUMNS, 20, 50, 40, 90);
    let mut grid = grid(values);
    assert_eq!(grid.mask_zeros(), 30 * 50);

    let scale = FieldKind::Concentration.default_scale();
    let figure = render_figure(&grid, &scale, &FigureStyle::default()).unwrap();
    let img = decode(&figure.encode_png().unwrap());

    assert_eq!(cell_pixel(&img, 35, 65), [255, 255, 255, 255]);
    assert_eq!(cell_pixel(&img, 22, 42), [255, 255, 255, 255]);
    // Outside the block the heat map is drawn
    assert_ne!(cell_pixel(&img, 5, 5), [255, 255, 255, 255]);
}

#[test]
fn test_out_of_scale_values_clamp_to_end_colors() {
    let scale = FieldKind::Concentration.default_scale();
    let style = FigureStyle::default();

    let low = render_figure(&grid(create_constant_grid(ROWS, COLUMNS, 0.5)), &scale, &style)
        .unwrap();
    let img = decode(&low.encode_png().unwrap());
    assert_eq!(cell_pixel(&img, 35, 65), viridis(0.0).to_array());
    assert!(low.levels.is_empty());

    let high = render_figure(&grid(create_constant_grid(ROWS, COLUMNS, 2.0)), &scale, &style)
        .unwrap();
    let img = decode(&high.encode_png().unwrap());
    assert_eq!(cell_pixel(&img, 35, 65), viridis(1.0).to_array());
}

#[test]
fn test_nearest_neighbor_keeps_cell_colors() {
    let scale = ColorScale::new(0.0, 1.0);
    let mut values = create_constant_grid(ROWS, COLUMNS, 0.25);
    for row in 0..ROWS {
        values[row * COLUMNS + 100] = 0.75;
    }
    let figure = render_figure(&grid(values), &scale, &FigureStyle::default()).unwrap();
    let img = decode(&figure.encode_png().unwrap());

    // Far from the contour around column 100, colors are pure cell colors
    assert_eq!(cell_pixel(&img, 10, 20), viridis(0.25).to_array());
    assert_eq!(cell_pixel(&img, 60, 60), viridis(0.25).to_array());
}

#[test]
fn test_contours_drawn_in_black() {
    let scale = FieldKind::Pressure.default_scale();
    let figure = render_figure(
        &grid(create_bump_grid(ROWS, COLUMNS, 0.7, 1.05)),
        &scale,
        &FigureStyle::default(),
    )
    .unwrap();
    assert!(!figure.levels.is_empty());

    let layout = FigureLayout::compute(&FigureStyle::default(), ROWS, COLUMNS);
    let img = decode(&figure.encode_png().unwrap());

    // Inside the image, only contour strokes can be black
    let image = layout.image;
    let dark = (image.y as u32 + 3..image.bottom() as u32 - 3)
        .flat_map(|y| (image.x as u32 + 3..image.right() as u32 - 3).map(move |x| (x, y)))
        .filter(|(x, y)| {
            let [r, g, b, _] = img.get_pixel(*x, *y).0;
            r < 20 && g < 20 && b < 20
        })
        .count();
    assert!(dark > 100, "expected contour pixels, found {}", dark);
}

#[test]
fn test_rendering_is_deterministic() {
    let scale = FieldKind::Temperature.default_scale();
    let mut values = create_bump_grid(ROWS, COLUMNS, 0.8, 1.0);
    mask_block(&mut values, COLUMNS, 0, 10, 0, 130);
    let mut grid = grid(values);
    grid.mask_zeros();

    let style = FigureStyle::default();
    let a = render_figure(&grid, &scale, &style).unwrap().encode_png().unwrap();
    let b = render_figure(&grid, &scale, &style).unwrap().encode_png().unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_fully_masked_grid_renders_blank_image() {
    let mut grid = grid(create_constant_grid(ROWS, COLUMNS, 0.0));
    grid.mask_zeros();

    let scale = FieldKind::Concentration.default_scale();
    let figure = render_figure(&grid, &scale, &FigureStyle::default()).unwrap();
    assert!(figure.levels.is_empty());

    let img = decode(&figure.encode_png().unwrap());
    assert_eq!(cell_pixel(&img, 35, 65), [255, 255, 255, 255]);
}
