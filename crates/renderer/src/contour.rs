//! Contour line (isoline) rendering using marching squares algorithm.
//!
//! Contours are traced in grid coordinates, where `(x, y)` is the center of
//! the cell at column `x`, row `y`. Callers map them onto the canvas when
//! drawing, so the lines sit exactly over the heat-map cells.

use crate::ticks;

/// A point in grid space (column, row)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance(&self, other: &Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A line segment between two points
#[derive(Debug, Clone)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// A complete contour line (polyline)
#[derive(Debug, Clone)]
pub struct Contour {
    pub level: f64,
    pub points: Vec<Point>,
    pub closed: bool,
}

/// Configuration for contour rendering
#[derive(Debug, Clone)]
pub struct ContourConfig {
    /// Contour levels to draw
    pub levels: Vec<f64>,
    /// Line width in pixels
    pub line_width: f32,
    /// Line color [R, G, B, A]
    pub line_color: [u8; 4],
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            levels: vec![],
            line_width: 1.5,
            line_color: [0, 0, 0, 255],
        }
    }
}

/// Number of level bins targeted by automatic level selection.
pub const DEFAULT_LEVEL_BINS: usize = 8;

/// Automatic contour levels for data spanning `[zmin, zmax]`.
///
/// Levels are nice numbers strictly inside the data range; a constant field
/// has none.
pub fn default_levels(zmin: f64, zmax: f64) -> Vec<f64> {
    ticks::nice_ticks(zmin, zmax, DEFAULT_LEVEL_BINS)
        .into_iter()
        .filter(|level| *level > zmin && *level < zmax)
        .collect()
}

/// Automatic contour levels over the finite values of `data`.
pub fn default_levels_for(data: &[f64]) -> Vec<f64> {
    let range = data
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        });

    match range {
        Some((lo, hi)) => default_levels(lo, hi),
        None => vec![],
    }
}

/// Marching squares algorithm to generate contour lines
///
/// # Arguments
/// * `data` - Grid data in row-major order
/// * `width` - Grid width
/// * `height` - Grid height
/// * `level` - Contour level to extract
///
/// # Returns
/// Vector of line segments representing the contour
pub fn march_squares(data: &[f64], width: usize, height: usize, level: f64) -> Vec<Segment> {
    if width < 2 || height < 2 || data.len() != width * height {
        return vec![];
    }

    let mut segments = Vec::new();

    for y in 0..(height - 1) {
        for x in 0..(width - 1) {
            let tl = data[y * width + x];
            let tr = data[y * width + x + 1];
            let bl = data[(y + 1) * width + x];
            let br = data[(y + 1) * width + x + 1];

            // Masked cells break the contour
            if tl.is_nan() || tr.is_nan() || bl.is_nan() || br.is_nan() {
                continue;
            }

            let mut cell_index = 0;
            if tl >= level { cell_index |= 1; }
            if tr >= level { cell_index |= 2; }
            if br >= level { cell_index |= 4; }
            if bl >= level { cell_index |= 8; }

            let corners = CellCorners { tl, tr, br, bl };
            segments.extend(get_cell_segments(cell_index, x as f32, y as f32, &corners, level));
        }
    }

    segments
}

struct CellCorners {
    tl: f64,
    tr: f64,
    br: f64,
    bl: f64,
}

/// Get line segments for a marching squares cell
///
/// Uses linear interpolation to find where the contour crosses cell edges
fn get_cell_segments(
    cell_index: u8,
    x: f32,
    y: f32,
    c: &CellCorners,
    level: f64,
) -> Vec<Segment> {
    let top = interpolate_edge(x, y, x + 1.0, y, c.tl, c.tr, level);
    let right = interpolate_edge(x + 1.0, y, x + 1.0, y + 1.0, c.tr, c.br, level);
    let bottom = interpolate_edge(x, y + 1.0, x + 1.0, y + 1.0, c.bl, c.br, level);
    let left = interpolate_edge(x, y, x, y + 1.0, c.tl, c.bl, level);

    match cell_index {
        0 | 15 => vec![],
        1 | 14 => vec![Segment { start: left, end: top }],
        2 | 13 => vec![Segment { start: top, end: right }],
        3 | 12 => vec![Segment { start: left, end: right }],
        4 | 11 => vec![Segment { start: right, end: bottom }],
        5 => vec![
            Segment { start: left, end: top },
            Segment { start: right, end: bottom },
        ],
        6 | 9 => vec![Segment { start: top, end: bottom }],
        7 | 8 => vec![Segment { start: left, end: bottom }],
        10 => vec![
            Segment { start: top, end: right },
            Segment { start: left, end: bottom },
        ],
        _ => vec![],
    }
}

/// Linearly interpolate between two edge points based on data values
fn interpolate_edge(
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    val1: f64,
    val2: f64,
    level: f64,
) -> Point {
    if (val2 - val1).abs() < 1e-12 {
        return Point::new((x1 + x2) / 2.0, (y1 + y2) / 2.0);
    }

    let t = ((level - val1) / (val2 - val1)).clamp(0.0, 1.0) as f32;

    Point::new(x1 + t * (x2 - x1), y1 + t * (y2 - y1))
}

/// Tolerance for treating two segment endpoints as the same point.
const JOIN_EPSILON: f32 = 1e-4;

/// Connect line segments into continuous polylines
///
/// Takes a collection of unordered segments and chains them at matching
/// endpoints, growing each polyline from both ends.
pub fn connect_segments(segments: Vec<Segment>) -> Vec<Contour> {
    if segments.is_empty() {
        return vec![];
    }

    let mut contours = Vec::new();
    let mut used = vec![false; segments.len()];

    for start_idx in 0..segments.len() {
        if used[start_idx] {
            continue;
        }
        used[start_idx] = true;

        let mut points = std::collections::VecDeque::new();
        points.push_back(segments[start_idx].start);
        points.push_back(segments[start_idx].end);

        let mut changed = true;
        while changed {
            changed = false;
            let (Some(&head), Some(&tail)) = (points.front(), points.back()) else {
                break;
            };

            for (i, seg) in segments.iter().enumerate() {
                if used[i] {
                    continue;
                }

                if seg.start.distance(&tail) < JOIN_EPSILON {
                    points.push_back(seg.end);
                } else if seg.end.distance(&tail) < JOIN_EPSILON {
                    points.push_back(seg.start);
                } else if seg.end.distance(&head) < JOIN_EPSILON {
                    points.push_front(seg.start);
                } else if seg.start.distance(&head) < JOIN_EPSILON {
                    points.push_front(seg.end);
                } else {
                    continue;
                }

                used[i] = true;
                changed = true;
                break;
            }
        }

        let points: Vec<Point> = points.into_iter().collect();
        let closed = match (points.first(), points.last()) {
            (Some(first), Some(last)) => points.len() > 2 && first.distance(last) < JOIN_EPSILON,
            _ => false,
        };

        if points.len() >= 2 {
            contours.push(Contour {
                level: 0.0, // Level will be set by caller
                points,
                closed,
            });
        }
    }

    contours
}

/// Generate all contours for multiple levels
pub fn generate_all_contours(
    data: &[f64],
    width: usize,
    height: usize,
    config: &ContourConfig,
) -> Vec<Contour> {
    let mut all_contours = Vec::new();

    for &level in &config.levels {
        let segments = march_squares(data, width, height, level);
        let mut contours = connect_segments(segments);
        for contour in &mut contours {
            contour.level = level;
        }
        all_contours.extend(contours);
    }

    all_contours
}

/// Stroke contours onto an existing canvas.
///
/// `to_canvas` maps grid coordinates to pixel coordinates.
pub fn draw_contours<M>(
    pixmap: &mut tiny_skia::Pixmap,
    contours: &[Contour],
    config: &ContourConfig,
    to_canvas: M,
) where
    M: Fn(Point) -> (f32, f32),
{
    use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Stroke, Transform};

    let [r, g, b, a] = config.line_color;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;

    let stroke = Stroke {
        width: config.line_width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    for contour in contours {
        if contour.points.len() < 2 {
            continue;
        }

        let mut pb = PathBuilder::new();
        let (x0, y0) = to_canvas(contour.points[0]);
        pb.move_to(x0, y0);
        for point in &contour.points[1..] {
            let (x, y) = to_canvas(*point);
            pb.line_to(x, y);
        }
        if contour.closed {
            pb.close();
        }

        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    tracing::debug!(
        num_contours = contours.len(),
        total_points = contours.iter().map(|c| c.points.len()).sum::<usize>(),
        "Drew contours"
    );
}
