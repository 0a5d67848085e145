//! CPU rasterizer: figures and strokes → pixels.
//!
//! Coverage is binary: a pixel is painted when its center lies inside the
//! shape (nonzero winding). Everything is clipped to the bitmap, so callers
//! never need to bounds-check pointer coordinates.
//!
//! Strokes on closed paths are expanded to an outline with `kurbo::stroke`
//! and filled. Round-capped segments and circle outlines are tested
//! analytically, which keeps the per-move brush cost low.

use crate::bitmap::Bitmap;
use crate::color::Color;
use crate::figure::{Figure, Pen};
use kurbo::{Circle, Join, Point, Rect, Shape, Stroke, StrokeOpts, Vec2};

/// Flattening tolerance for curve → polyline conversion, in pixels.
const TOLERANCE: f64 = 0.1;

/// Paint a figure with the given pen.
pub fn draw_figure(bitmap: &mut Bitmap, figure: &Figure, pen: &Pen) {
    log::trace!("RASTER {figure:?} fill={} width={}", pen.fill, pen.width);
    match figure {
        Figure::Line(line) => stroke_segment(bitmap, line.p0, line.p1, pen.width, pen.color),
        Figure::Rect(rect) if pen.fill => fill_shape(bitmap, rect, pen.color),
        Figure::Rect(rect) => {
            let path = rect.to_path(TOLERANCE);
            stroke_outline(bitmap, &path, pen.width, pen.color);
        }
        Figure::Circle(circle) if pen.fill => fill_shape(bitmap, circle, pen.color),
        Figure::Circle(circle) => stroke_ring(bitmap, *circle, pen.width, pen.color),
        Figure::Triangle(points) => draw_vertices(bitmap, points, pen),
        Figure::Polygon(points) => draw_vertices(bitmap, points, pen),
    }
}

fn draw_vertices(bitmap: &mut Bitmap, points: &[Point], pen: &Pen) {
    let path = Figure::vertex_path(points);
    if pen.fill {
        fill_shape(bitmap, &path, pen.color);
    } else {
        stroke_outline(bitmap, &path, pen.width, pen.color);
    }
}

/// Fill the interior of any kurbo shape.
pub fn fill_shape(bitmap: &mut Bitmap, shape: &impl Shape, color: Color) {
    let Some((x0, y0, x1, y1)) = pixel_span(bitmap, shape.bounding_box()) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            if shape.contains(pixel_center(x, y)) {
                bitmap.blend_pixel(x, y, color);
            }
        }
    }
}

/// Stroke a path with mitered joins, the way a 2D canvas outlines shapes.
pub fn stroke_outline(bitmap: &mut Bitmap, path: &impl Shape, width: f64, color: Color) {
    let style = Stroke::new(width).with_join(Join::Miter);
    let outline = kurbo::stroke(
        path.path_elements(TOLERANCE),
        &style,
        &StrokeOpts::default(),
        TOLERANCE,
    );
    fill_shape(bitmap, &outline, color);
}

/// Round-capped straight segment of the given width.
///
/// Used for the line tool and for every brush/eraser step.
pub fn stroke_segment(bitmap: &mut Bitmap, from: Point, to: Point, width: f64, color: Color) {
    let half = width / 2.0;
    let bbox = Rect::from_points(from, to).inflate(half, half);
    let Some((x0, y0, x1, y1)) = pixel_span(bitmap, bbox) else {
        return;
    };
    let limit = half * half;
    for y in y0..y1 {
        for x in x0..x1 {
            if segment_distance_sq(from, to, pixel_center(x, y)) <= limit {
                bitmap.blend_pixel(x, y, color);
            }
        }
    }
}

/// Circle outline: the annulus `radius ± width/2`.
pub fn stroke_ring(bitmap: &mut Bitmap, circle: Circle, width: f64, color: Color) {
    let half = width / 2.0;
    let outer = circle.radius + half;
    let inner = (circle.radius - half).max(0.0);
    let bbox = Rect::from_center_size(circle.center, (outer * 2.0, outer * 2.0));
    let Some((x0, y0, x1, y1)) = pixel_span(bitmap, bbox) else {
        return;
    };
    let (outer_sq, inner_sq) = (outer * outer, inner * inner);
    for y in y0..y1 {
        for x in x0..x1 {
            let d = (pixel_center(x, y) - circle.center).hypot2();
            if d <= outer_sq && d >= inner_sq {
                bitmap.blend_pixel(x, y, color);
            }
        }
    }
}

fn pixel_center(x: u32, y: u32) -> Point {
    Point::new(x as f64 + 0.5, y as f64 + 0.5)
}

/// Squared distance from `p` to the segment `a..b`.
fn segment_distance_sq(a: Point, b: Point, p: Point) -> f64 {
    let ab: Vec2 = b - a;
    let len_sq = ab.hypot2();
    if len_sq == 0.0 {
        return (p - a).hypot2();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).hypot2()
}

/// Clip a bounding box to the bitmap, as half-open pixel ranges.
fn pixel_span(bitmap: &Bitmap, bbox: Rect) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = (bitmap.width() as f64, bitmap.height() as f64);
    let x0 = bbox.x0.floor().clamp(0.0, w);
    let y0 = bbox.y0.floor().clamp(0.0, h);
    let x1 = bbox.x1.ceil().clamp(0.0, w);
    let y1 = bbox.y1.ceil().clamp(0.0, h);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}
