//! Shape geometry built from a drag gesture.
//!
//! Every closed-shape tool derives its figure from two points: the anchor
//! recorded at gesture start and the current pointer position.
//!
//! | Tool | Anchor | Pointer |
//! |------|--------|---------|
//! | Line | one end | other end |
//! | Rectangle | corner | opposite corner |
//! | Circle | center | on the circumference |
//! | Polygon | center | circumscribed radius |
//! | Triangle | apex | one base corner (other is mirrored across the apex x) |

use crate::color::Color;
use kurbo::{BezPath, Circle, Line, Point, Rect};
use std::f64::consts::TAU;

/// Geometry of one shape, in canvas pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Figure {
    Line(Line),
    Rect(Rect),
    Circle(Circle),
    Triangle([Point; 3]),
    Polygon(Vec<Point>),
}

impl Figure {
    pub fn line(anchor: Point, point: Point) -> Self {
        Figure::Line(Line::new(anchor, point))
    }

    pub fn rectangle(anchor: Point, point: Point) -> Self {
        Figure::Rect(Rect::from_points(anchor, point))
    }

    pub fn circle(anchor: Point, point: Point) -> Self {
        Figure::Circle(Circle::new(anchor, anchor.distance(point)))
    }

    /// Isosceles triangle: apex at the anchor, base at the pointer's y,
    /// with the second base corner reflected across the anchor's x.
    pub fn triangle(anchor: Point, point: Point) -> Self {
        let mirrored = Point::new(anchor.x * 2.0 - point.x, point.y);
        Figure::Triangle([anchor, point, mirrored])
    }

    /// Regular polygon centred on the anchor. The first vertex sits at
    /// angle 0 (to the right of the center). `sides` below 3 is raised to 3.
    pub fn polygon(anchor: Point, point: Point, sides: u32) -> Self {
        let sides = sides.max(3);
        let radius = anchor.distance(point);
        let step = TAU / sides as f64;
        let vertices = (0..sides)
            .map(|i| {
                let angle = step * i as f64;
                Point::new(
                    anchor.x + radius * angle.cos(),
                    anchor.y + radius * angle.sin(),
                )
            })
            .collect();
        Figure::Polygon(vertices)
    }

    /// Lines are the only open figure; everything else honors the fill flag.
    pub fn is_closed(&self) -> bool {
        !matches!(self, Figure::Line(_))
    }

    /// Closed outline of triangles and polygons.
    pub fn vertex_path(points: &[Point]) -> BezPath {
        let mut path = BezPath::new();
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            path.move_to(*first);
            for p in iter {
                path.line_to(*p);
            }
            path.close_path();
        }
        path
    }
}

/// How a figure or stroke is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f64,
    /// Fill closed figures instead of outlining them.
    pub fill: bool,
}

impl Pen {
    pub fn stroke(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            fill: false,
        }
    }

    pub fn filled(color: Color) -> Self {
        Self {
            color,
            width: 1.0,
            fill: true,
        }
    }
}
