//! Input abstraction layer.
//!
//! Normalizes mouse, touch, and keyboard events into a unified `InputEvent`
//! enum. Pointer positions are canvas-local pixel coordinates.

use sketch_core::Point;

/// Modifier keys held during a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

/// A normalized input event from any pointing device or the keyboard.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start).
    PointerDown { x: f32, y: f32 },

    /// Pointer moved (mouse move, touch move).
    PointerMove { x: f32, y: f32 },

    /// Pointer released (mouse up).
    PointerUp { x: f32, y: f32 },

    /// Keyboard shortcut. `key` is the `KeyboardEvent.key` value.
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn from_pointer_down(x: f32, y: f32) -> Self {
        Self::PointerDown { x, y }
    }

    pub fn from_pointer_move(x: f32, y: f32) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn from_pointer_up(x: f32, y: f32) -> Self {
        Self::PointerUp { x, y }
    }

    pub fn from_key(key: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
        }
    }

    /// Convert a touch point from viewport (client) coordinates to
    /// canvas-local ones, given the canvas' bounding-rect origin.
    pub fn touch_to_canvas(client_x: f32, client_y: f32, rect_left: f32, rect_top: f32) -> (f32, f32) {
        (client_x - rect_left, client_y - rect_top)
    }

    /// Extract position if this is a pointer event.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y } => Some(Point::new(*x as f64, *y as f64)),
            Self::Key { .. } => None,
        }
    }
}
