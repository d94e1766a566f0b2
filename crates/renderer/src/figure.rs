//! Figure composition: heat map, contours, axes and colorbar on one canvas.
//!
//! The page follows the usual plotting-library defaults: a 6.4 x 4.8 inch
//! figure, an axes box inset from each edge, and a colorbar carved off the
//! right side of that box. The grid keeps square cells, so the image is
//! centered inside whatever room the box leaves.

use snapshot_common::{ColorScale, Grid};
use tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};
use tracing::debug;

use crate::colorbar::{self, ColorbarStyle};
use crate::contour::{self, ContourConfig, Point};
use crate::error::RenderError;
use crate::glyphs::{self, Align, GlyphMetrics};
use crate::gradient::{self, Color, PixelRect};
use crate::png;
use crate::ticks;

const POINTS_PER_INCH: f32 = 72.0;

/// Page geometry and line/label sizes for a rendered snapshot.
///
/// Axes fractions are measured from the bottom-left corner of the page.
/// Line widths and font sizes are in points and scale with `dpi`.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureStyle {
    pub width_in: f32,
    pub height_in: f32,
    pub dpi: u32,
    pub axes_left: f32,
    pub axes_right: f32,
    pub axes_bottom: f32,
    pub axes_top: f32,
    /// Share of the axes box width given to the colorbar.
    pub colorbar_fraction: f32,
    /// Gap between image and colorbar, as a share of the axes box width.
    pub colorbar_pad: f32,
    /// Colorbar height over width.
    pub colorbar_aspect: f32,
    pub contour_width_pt: f32,
    pub font_pt: f32,
    pub frame_width_pt: f32,
    pub tick_length_pt: f32,
    pub tick_pad_pt: f32,
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            width_in: 6.4,
            height_in: 4.8,
            dpi: 100,
            axes_left: 0.125,
            axes_right: 0.9,
            axes_bottom: 0.11,
            axes_top: 0.88,
            colorbar_fraction: 0.15,
            colorbar_pad: 0.05,
            colorbar_aspect: 20.0,
            contour_width_pt: 1.5,
            font_pt: 10.0,
            frame_width_pt: 0.8,
            tick_length_pt: 3.5,
            tick_pad_pt: 3.5,
        }
    }
}

impl FigureStyle {
    /// Convert a length in points to pixels at this style's DPI.
    pub fn px(&self, points: f32) -> f32 {
        points * self.dpi as f32 / POINTS_PER_INCH
    }

    /// Canvas size in pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        let dpi = self.dpi as f32;
        (
            (self.width_in * dpi).round() as u32,
            (self.height_in * dpi).round() as u32,
        )
    }
}

/// Pixel placement of the image and colorbar for one grid shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureLayout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Where the grid cells land, row 0 at the top.
    pub image: PixelRect,
    pub colorbar: PixelRect,
}

impl FigureLayout {
    pub fn compute(style: &FigureStyle, rows: usize, columns: usize) -> Self {
        let (canvas_width, canvas_height) = style.canvas_size();
        let w = canvas_width as f32;
        let h = canvas_height as f32;

        let box_x = style.axes_left * w;
        let box_y = (1.0 - style.axes_top) * h;
        let box_w = (style.axes_right - style.axes_left) * w;
        let box_h = (style.axes_top - style.axes_bottom) * h;

        let slot_x = box_x + box_w * (1.0 - style.colorbar_fraction);
        let slot_w = box_w * style.colorbar_fraction;
        let bar_w = slot_w.min(box_h / style.colorbar_aspect);
        let colorbar = PixelRect::new(slot_x, box_y, bar_w, box_h);

        let avail_w = box_w * (1.0 - style.colorbar_fraction - style.colorbar_pad);
        let image = fit_equal_aspect(
            PixelRect::new(box_x, box_y, avail_w, box_h),
            rows.max(1),
            columns.max(1),
        );

        Self {
            canvas_width,
            canvas_height,
            image,
            colorbar,
        }
    }

    /// Canvas position of a grid point in cell units (cell centers at
    /// integer coordinates).
    pub fn grid_to_canvas(&self, rows: usize, columns: usize, point: Point) -> (f32, f32) {
        let cell_w = self.image.width / columns.max(1) as f32;
        let cell_h = self.image.height / rows.max(1) as f32;
        (
            self.image.x + (point.x + 0.5) * cell_w,
            self.image.y + (point.y + 0.5) * cell_h,
        )
    }
}

/// Largest rectangle with square cells that fits in `area`, centered.
fn fit_equal_aspect(area: PixelRect, rows: usize, columns: usize) -> PixelRect {
    let cell = (area.width / columns as f32).min(area.height / rows as f32);
    let width = cell * columns as f32;
    let height = cell * rows as f32;
    PixelRect::new(
        area.x + (area.width - width) / 2.0,
        area.y + (area.height - height) / 2.0,
        width,
        height,
    )
}

/// A composed, opaque figure ready for encoding.
pub struct Figure {
    pixmap: Pixmap,
    dpi: u32,
    /// Contour levels that were traced.
    pub levels: Vec<f64>,
}

impl Figure {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// RGBA bytes, row-major. The canvas is opaque, so premultiplied and
    /// straight alpha coincide.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data()
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        png::encode_png(
            self.pixels(),
            self.width() as usize,
            self.height() as usize,
            Some(self.dpi),
        )
    }
}

/// Draw `grid` as a nearest-neighbor heat map over `scale` with black
/// contour lines at automatic levels and a colorbar on the right.
///
/// NaN cells are left as page background.
pub fn render_figure(
    grid: &Grid,
    scale: &ColorScale,
    style: &FigureStyle,
) -> Result<Figure, RenderError> {
    let rows = grid.rows();
    let columns = grid.columns();
    if grid.values().is_empty() {
        return Err(RenderError::InvalidGrid(format!(
            "{}x{} grid has no cells",
            rows, columns
        )));
    }

    let layout = FigureLayout::compute(style, rows, columns);
    let mut pixmap = Pixmap::new(layout.canvas_width, layout.canvas_height).ok_or(
        RenderError::Canvas {
            width: layout.canvas_width,
            height: layout.canvas_height,
        },
    )?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let cells = gradient::render_grid(grid.values(), columns, rows, scale, gradient::viridis);
    let (cw, ch) = (pixmap.width() as usize, pixmap.height() as usize);
    gradient::blit_nearest(pixmap.data_mut(), cw, ch, &cells, columns, rows, layout.image);

    let config = ContourConfig {
        levels: contour::default_levels_for(grid.values()),
        line_width: style.px(style.contour_width_pt),
        line_color: Color::BLACK.to_array(),
    };
    let contours = contour::generate_all_contours(grid.values(), columns, rows, &config);
    contour::draw_contours(&mut pixmap, &contours, &config, |p| {
        layout.grid_to_canvas(rows, columns, p)
    });

    draw_axes(&mut pixmap, &layout, style, rows, columns);

    let bar_style = ColorbarStyle {
        frame_width: style.px(style.frame_width_pt),
        tick_length: style.px(style.tick_length_pt),
        tick_pad: style.px(style.tick_pad_pt),
        font_size: style.px(style.font_pt),
    };
    colorbar::draw_colorbar(&mut pixmap, layout.colorbar, scale, &bar_style, gradient::viridis);

    debug!(
        rows,
        columns,
        levels = config.levels.len(),
        contours = contours.len(),
        "Composed figure"
    );

    Ok(Figure {
        pixmap,
        dpi: style.dpi,
        levels: config.levels,
    })
}

/// Frame the image and label rows and columns by cell index.
fn draw_axes(pixmap: &mut Pixmap, layout: &FigureLayout, style: &FigureStyle, rows: usize, columns: usize) {
    let image = layout.image;
    let frame_width = style.px(style.frame_width_pt);
    let tick_length = style.px(style.tick_length_pt);
    let tick_pad = style.px(style.tick_pad_pt);
    let font = style.px(style.font_pt);
    let label_half_height = GlyphMetrics::for_size(font).char_height / 2.0;

    let mut paint = Paint::default();
    paint.set_color_rgba8(0, 0, 0, 255);
    paint.anti_alias = true;
    let stroke = Stroke {
        width: frame_width,
        ..Stroke::default()
    };

    if let Some(rect) = Rect::from_xywh(image.x, image.y, image.width, image.height) {
        let path = PathBuilder::from_rect(rect);
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    // Column ticks below the image
    let cell_w = image.width / columns as f32;
    let x_max = columns as f64 - 0.5;
    let x_bins = ticks::bins_for_length(image.width, font, 3.0);
    let x_step = ticks::nice_step(-0.5, x_max, x_bins).unwrap_or(1.0);
    for value in ticks::ticks_within(-0.5, x_max, x_bins) {
        let x = image.x + (value as f32 + 0.5) * cell_w;
        stroke_line(pixmap, &paint, &stroke, (x, image.bottom()), (x, image.bottom() + tick_length));
        glyphs::draw_text(
            pixmap,
            x,
            image.bottom() + tick_length + tick_pad + label_half_height,
            &ticks::format_tick(value, x_step),
            font,
            Align::Center,
            [0, 0, 0, 255],
        );
    }

    // Row ticks left of the image, row 0 at the top
    let cell_h = image.height / rows as f32;
    let y_max = rows as f64 - 0.5;
    let y_bins = ticks::bins_for_length(image.height, font, 2.0);
    let y_step = ticks::nice_step(-0.5, y_max, y_bins).unwrap_or(1.0);
    for value in ticks::ticks_within(-0.5, y_max, y_bins) {
        let y = image.y + (value as f32 + 0.5) * cell_h;
        stroke_line(pixmap, &paint, &stroke, (image.x - tick_length, y), (image.x, y));
        glyphs::draw_text(
            pixmap,
            image.x - tick_length - tick_pad,
            y,
            &ticks::format_tick(value, y_step),
            font,
            Align::Right,
            [0, 0, 0, 255],
        );
    }
}

fn stroke_line(pixmap: &mut Pixmap, paint: &Paint, stroke: &Stroke, from: (f32, f32), to: (f32, f32)) {
    let mut pb = PathBuilder::new();
    pb.move_to(from.0, from.1);
    pb.line_to(to.0, to.1);
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, paint, stroke, Transform::identity(), None);
    }
}
