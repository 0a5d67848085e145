//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s.
//! The shortcut map lives in Rust so it's shared across WASM and native.
//!
//! | Keys | Action |
//! |------|--------|
//! | ⌘Z / Ctrl+Z | Undo |
//! | ⌘Y / Ctrl+Y, ⌘⇧Z | Redo |
//! | ⌘S | Export image |
//! | ⌘Delete | Clear canvas |
//! | B E L R C T P | Brush, eraser, line, rectangle, circle, triangle, polygon |
//! | F | Toggle fill |

use crate::input::{InputEvent, Modifiers};
use crate::tools::ToolKind;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tool switching ──
    Tool(ToolKind),
    ToggleFill,

    // ── Edit ──
    Undo,
    Redo,
    Clear,

    // ── File ──
    Export,
}

impl ShortcutAction {
    pub fn name(self) -> &'static str {
        match self {
            ShortcutAction::Tool(tool) => tool.name(),
            ShortcutAction::ToggleFill => "toggleFill",
            ShortcutAction::Undo => "undo",
            ShortcutAction::Redo => "redo",
            ShortcutAction::Clear => "clear",
            ShortcutAction::Export => "export",
        }
    }
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a normalized key event. Pointer events have no binding.
    pub fn resolve_event(event: &InputEvent) -> Option<ShortcutAction> {
        match event {
            InputEvent::Key { key, modifiers } => Self::resolve_with(key, *modifiers),
            _ => None,
        }
    }

    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let modifiers = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        Self::resolve_with(key, modifiers)
    }

    fn resolve_with(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        } = modifiers;
        let cmd = ctrl || meta;

        if alt {
            return None;
        }

        // ── Modifier combos first (most specific) ──
        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "s" | "S" => Some(ShortcutAction::Export),
                "Delete" | "Backspace" => Some(ShortcutAction::Clear),
                _ => None,
            };
        }

        if shift {
            return None;
        }

        // ── Single keys (no modifiers) ──
        match key {
            "b" | "B" => Some(ShortcutAction::Tool(ToolKind::Brush)),
            "e" | "E" => Some(ShortcutAction::Tool(ToolKind::Eraser)),
            "l" | "L" => Some(ShortcutAction::Tool(ToolKind::Line)),
            "r" | "R" => Some(ShortcutAction::Tool(ToolKind::Rectangle)),
            "c" | "C" => Some(ShortcutAction::Tool(ToolKind::Circle)),
            "t" | "T" => Some(ShortcutAction::Tool(ToolKind::Triangle)),
            "p" | "P" => Some(ShortcutAction::Tool(ToolKind::Polygon)),
            "f" | "F" => Some(ShortcutAction::ToggleFill),
            _ => None,
        }
    }
}
