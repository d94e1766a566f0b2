//! Stroked seven-segment glyphs for numeric tick labels.
//!
//! Only digits, '-' and '.' are drawn; anything else advances the pen
//! without ink. No font files are needed.

use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Horizontal anchor of a label relative to its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Glyph metrics derived from a font size in pixels.
#[derive(Debug, Clone, Copy)]
pub struct GlyphMetrics {
    pub char_width: f32,
    pub char_height: f32,
    pub spacing: f32,
}

impl GlyphMetrics {
    pub fn for_size(font_size: f32) -> Self {
        Self {
            char_width: font_size * 0.45,
            char_height: font_size * 0.75,
            spacing: font_size * 0.15,
        }
    }

    /// Advance of one character; '.' is narrower than digits.
    fn advance(&self, ch: char) -> f32 {
        match ch {
            '.' => self.char_width * 0.4 + self.spacing,
            _ => self.char_width + self.spacing,
        }
    }

    /// Total width of `text` in pixels.
    pub fn text_width(&self, text: &str) -> f32 {
        let total: f32 = text.chars().map(|c| self.advance(c)).sum();
        (total - self.spacing).max(0.0)
    }
}

/// Draw `text` with its vertical center at `y`.
pub fn draw_text(
    pixmap: &mut Pixmap,
    x: f32,
    y: f32,
    text: &str,
    font_size: f32,
    align: Align,
    color: [u8; 4],
) {
    let metrics = GlyphMetrics::for_size(font_size);
    let width = metrics.text_width(text);
    let mut pen_x = match align {
        Align::Left => x,
        Align::Center => x - width / 2.0,
        Align::Right => x - width,
    };

    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;

    let stroke = Stroke {
        width: (font_size * 0.1).max(1.0),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    for ch in text.chars() {
        let glyph_width = metrics.advance(ch) - metrics.spacing;
        let center_x = pen_x + glyph_width / 2.0;
        draw_character(pixmap, center_x, y, ch, &metrics, &paint, &stroke);
        pen_x += metrics.advance(ch);
    }
}

/// Draw a single character as simple line segments around (x, y).
fn draw_character(
    pixmap: &mut Pixmap,
    x: f32,
    y: f32,
    ch: char,
    metrics: &GlyphMetrics,
    paint: &Paint,
    stroke: &Stroke,
) {
    let w = metrics.char_width / 2.0;
    let h = metrics.char_height / 2.0;

    let segments: Vec<((f32, f32), (f32, f32))> = match ch {
        '0' => vec![
            ((-w, -h), (w, -h)),
            ((w, -h), (w, h)),
            ((w, h), (-w, h)),
            ((-w, h), (-w, -h)),
        ],
        '1' => vec![((0.0, -h), (0.0, h)), ((-w * 0.5, -h * 0.6), (0.0, -h))],
        '2' => vec![
            ((-w, -h), (w, -h)),
            ((w, -h), (w, 0.0)),
            ((w, 0.0), (-w, 0.0)),
            ((-w, 0.0), (-w, h)),
            ((-w, h), (w, h)),
        ],
        '3' => vec![
            ((-w, -h), (w, -h)),
            ((w, -h), (w, h)),
            ((w, h), (-w, h)),
            ((-w, 0.0), (w, 0.0)),
        ],
        '4' => vec![
            ((-w, -h), (-w, 0.0)),
            ((-w, 0.0), (w, 0.0)),
            ((w, -h), (w, h)),
        ],
        '5' => vec![
            ((w, -h), (-w, -h)),
            ((-w, -h), (-w, 0.0)),
            ((-w, 0.0), (w, 0.0)),
            ((w, 0.0), (w, h)),
            ((w, h), (-w, h)),
        ],
        '6' => vec![
            ((w, -h), (-w, -h)),
            ((-w, -h), (-w, h)),
            ((-w, h), (w, h)),
            ((w, h), (w, 0.0)),
            ((w, 0.0), (-w, 0.0)),
        ],
        '7' => vec![((-w, -h), (w, -h)), ((w, -h), (0.0, h))],
        '8' => vec![
            ((-w, -h), (w, -h)),
            ((w, -h), (w, h)),
            ((w, h), (-w, h)),
            ((-w, h), (-w, -h)),
            ((-w, 0.0), (w, 0.0)),
        ],
        '9' => vec![
            ((-w, 0.0), (w, 0.0)),
            ((w, 0.0), (w, -h)),
            ((w, -h), (-w, -h)),
            ((-w, -h), (-w, 0.0)),
            ((w, 0.0), (w, h)),
            ((w, h), (-w, h)),
        ],
        '-' => vec![((-w, 0.0), (w, 0.0))],
        '.' => vec![((0.0, h * 0.85), (0.0, h))],
        _ => vec![],
    };

    for ((x1, y1), (x2, y2)) in segments {
        let mut pb = PathBuilder::new();
        pb.move_to(x + x1, y + y1);
        pb.line_to(x + x2, y + y2);
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, paint, stroke, Transform::identity(), None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ink_count(pixmap: &Pixmap) -> usize {
        pixmap.data().chunks_exact(4).filter(|p| p[3] > 0).count()
    }

    #[test]
    fn test_text_width_scales_with_length() {
        let m = GlyphMetrics::for_size(14.0);
        assert!(m.text_width("100") > m.text_width("10"));
        assert!(m.text_width("0.9") < m.text_width("009"));
        assert_eq!(m.text_width(""), 0.0);
    }

    #[test]
    fn test_draw_text_inks_digits_only() {
        let mut pixmap = Pixmap::new(60, 20).unwrap();
        draw_text(&mut pixmap, 30.0, 10.0, "0.85", 14.0, Align::Center, [0, 0, 0, 255]);
        assert!(ink_count(&pixmap) > 0);

        let mut blank = Pixmap::new(60, 20).unwrap();
        draw_text(&mut blank, 30.0, 10.0, "ab", 14.0, Align::Center, [0, 0, 0, 255]);
        assert_eq!(ink_count(&blank), 0);
    }

    #[test]
    fn test_draw_text_right_aligned_stays_left_of_anchor() {
        let mut pixmap = Pixmap::new(80, 20).unwrap();
        draw_text(&mut pixmap, 40.0, 10.0, "60", 14.0, Align::Right, [0, 0, 0, 255]);

        let rightmost = pixmap
            .data()
            .chunks_exact(4)
            .enumerate()
            .filter(|(_, p)| p[3] > 0)
            .map(|(i, _)| i % 80)
            .max()
            .unwrap();
        assert!(rightmost <= 42);
    }
}
