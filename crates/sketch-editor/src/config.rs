//! Surface configuration.
//!
//! Every field has a default, so a partial JSON object (or `{}`) is a valid
//! configuration.

use crate::persist::DEFAULT_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use sketch_core::Color;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SurfaceConfig {
    /// Blank-canvas color. The eraser paints with it.
    pub background: Color,
    /// Maximum undo (and redo) entries. The oldest entry is dropped first.
    pub history_depth: usize,
    /// Vertex count of the polygon tool.
    pub polygon_sides: u32,
    pub default_width: u32,
    pub default_color: Color,
    /// Multiply the stroke width by `max(sx, sy)` when the canvas is resized.
    pub scale_width_on_resize: bool,
    /// Name of the durable storage slot.
    pub storage_key: String,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            history_depth: 32,
            polygon_sides: 5,
            default_width: 5,
            default_color: Color::BLACK,
            scale_width_on_resize: false,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl SurfaceConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
