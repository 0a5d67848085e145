//! Drawing tools and the in-progress gesture.
//!
//! Two families of tools:
//!
//! | Family | Tools | Move event |
//! |--------|-------|------------|
//! | Freehand | Brush, Eraser | paint one segment onto the live bitmap |
//! | Figure | Line, Rectangle, Circle, Triangle, Polygon | restore the base snapshot, redraw the figure |
//!
//! A figure preview is a pure function of the gesture's base snapshot and
//! the current pointer: the base is never written to.

use sketch_core::{Bitmap, Color, Figure, Pen, Point, Snapshot, draw_figure};

/// The active tool determines how a drag is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
    Line,
    Rectangle,
    Circle,
    Triangle,
    Polygon,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Brush,
        ToolKind::Eraser,
        ToolKind::Line,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Triangle,
        ToolKind::Polygon,
    ];

    /// Parse the tool button id used by the page (`"brush"`, `"rectangle"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Brush => "brush",
            ToolKind::Eraser => "eraser",
            ToolKind::Line => "line",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Triangle => "triangle",
            ToolKind::Polygon => "polygon",
        }
    }

    /// Brush and eraser accumulate segments instead of previewing a figure.
    pub fn is_freehand(self) -> bool {
        matches!(self, ToolKind::Brush | ToolKind::Eraser)
    }

    /// Figure spanned by a drag from `anchor` to `point`.
    /// `None` for freehand tools.
    pub fn figure(self, anchor: Point, point: Point, polygon_sides: u32) -> Option<Figure> {
        match self {
            ToolKind::Brush | ToolKind::Eraser => None,
            ToolKind::Line => Some(Figure::line(anchor, point)),
            ToolKind::Rectangle => Some(Figure::rectangle(anchor, point)),
            ToolKind::Circle => Some(Figure::circle(anchor, point)),
            ToolKind::Triangle => Some(Figure::triangle(anchor, point)),
            ToolKind::Polygon => Some(Figure::polygon(anchor, point, polygon_sides)),
        }
    }
}

/// Tool, width, color and fill mode chosen by the selector controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolConfig {
    pub tool: ToolKind,
    /// Stroke width in pixels, at least 1.
    pub width: u32,
    pub color: Color,
    /// Fill closed figures instead of outlining them.
    pub fill: bool,
}

impl ToolConfig {
    pub fn new(width: u32, color: Color) -> Self {
        Self {
            tool: ToolKind::default(),
            width: width.max(1),
            color,
            fill: false,
        }
    }

    /// Pen for this configuration. The eraser paints with `background`.
    pub fn pen(&self, background: Color) -> Pen {
        let color = if self.tool == ToolKind::Eraser {
            background
        } else {
            self.color
        };
        Pen {
            color,
            width: self.width as f64,
            fill: self.fill,
        }
    }
}

/// One pointer-down → move* → pointer-up interaction.
///
/// The tool configuration is captured at gesture start; selector changes
/// made mid-drag apply to the next gesture.
#[derive(Debug, Clone)]
pub struct Gesture {
    /// Bitmap as it was when the gesture started.
    pub base: Snapshot,
    pub anchor: Point,
    /// Most recent pointer position.
    pub last: Point,
    pub tool: ToolKind,
    pub pen: Pen,
}

impl Gesture {
    pub fn new(base: Snapshot, anchor: Point, config: &ToolConfig, background: Color) -> Self {
        Self {
            base,
            anchor,
            last: anchor,
            tool: config.tool,
            pen: config.pen(background),
        }
    }

    /// Render the figure preview for `point` on a fresh copy of the base.
    pub fn preview(&self, point: Point, polygon_sides: u32) -> Bitmap {
        let mut out = self.base.to_bitmap();
        if let Some(figure) = self.tool.figure(self.anchor, point, polygon_sides) {
            draw_figure(&mut out, &figure, &self.pen);
        }
        out
    }
}
