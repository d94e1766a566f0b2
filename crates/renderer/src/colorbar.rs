//! Vertical colorbar keyed to a heat-map color scale.

use snapshot_common::ColorScale;
use tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::glyphs::{self, Align};
use crate::gradient::{Color, PixelRect};
use crate::ticks;

/// Appearance of the colorbar frame, ticks and labels.
#[derive(Debug, Clone, Copy)]
pub struct ColorbarStyle {
    pub frame_width: f32,
    pub tick_length: f32,
    pub tick_pad: f32,
    pub font_size: f32,
}

/// Draw a vertical colorbar filling `rect`: `scale.min` at the bottom,
/// `scale.max` at the top, tick labels to the right.
///
/// Returns the tick values that were drawn.
pub fn draw_colorbar<F>(
    pixmap: &mut Pixmap,
    rect: PixelRect,
    scale: &ColorScale,
    style: &ColorbarStyle,
    color_fn: F,
) -> Vec<f64>
where
    F: Fn(f64) -> Color,
{
    fill_strip(pixmap, rect, &color_fn);

    let mut paint = Paint::default();
    paint.set_color_rgba8(0, 0, 0, 255);
    paint.anti_alias = true;

    if let Some(frame) = Rect::from_xywh(rect.x, rect.y, rect.width, rect.height) {
        let stroke = Stroke {
            width: style.frame_width,
            ..Stroke::default()
        };
        let path = PathBuilder::from_rect(frame);
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    let bins = ticks::bins_for_length(rect.height, style.font_size, 2.0);
    let values = ticks::ticks_within(scale.min, scale.max, bins);
    let step = ticks::nice_step(scale.min, scale.max, bins).unwrap_or(1.0);

    let tick_stroke = Stroke {
        width: style.frame_width,
        ..Stroke::default()
    };

    for value in &values {
        let y = value_to_y(*value, rect, scale);

        let mut pb = PathBuilder::new();
        pb.move_to(rect.right(), y);
        pb.line_to(rect.right() + style.tick_length, y);
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint, &tick_stroke, Transform::identity(), None);
        }

        glyphs::draw_text(
            pixmap,
            rect.right() + style.tick_length + style.tick_pad,
            y,
            &ticks::format_tick(*value, step),
            style.font_size,
            Align::Left,
            [0, 0, 0, 255],
        );
    }

    values
}

/// Vertical pixel position of `value` inside the bar.
pub fn value_to_y(value: f64, rect: PixelRect, scale: &ColorScale) -> f32 {
    let t = scale.normalize(value) as f32;
    rect.bottom() - t * rect.height
}

/// Fill the bar row by row, sampling the colormap at each row center.
fn fill_strip<F>(pixmap: &mut Pixmap, rect: PixelRect, color_fn: &F)
where
    F: Fn(f64) -> Color,
{
    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    if rect.height <= 0.0 {
        return;
    }

    let x_start = rect.x.max(0.0).round() as usize;
    let x_end = (rect.right().round() as usize).min(width);
    let y_start = rect.y.max(0.0).round() as usize;
    let y_end = (rect.bottom().round() as usize).min(height);

    let data = pixmap.data_mut();
    for py in y_start..y_end {
        let t = ((rect.bottom() as f64 - (py as f64 + 0.5)) / rect.height as f64).clamp(0.0, 1.0);
        let rgba = color_fn(t).to_array();
        for px in x_start..x_end {
            let dst = (py * width + px) * 4;
            data[dst..dst + 4].copy_from_slice(&rgba);
        }
    }
}
