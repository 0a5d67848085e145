//! The drawing surface: pixel buffer, tool state, and gesture handling.
//!
//! `DrawingSurface` is the single owner of the canvas bitmap. Everything
//! that changes the pixels goes through it so the undo history and the
//! restore sequencing see every change:
//!
//! - **Gesture start** records a history checkpoint and captures the base
//!   snapshot for figure previews.
//! - **Gesture move** paints a brush segment, or restores the base and
//!   redraws the figure from the anchor to the pointer.
//! - **Gesture end** leaves the last rendered bitmap as the committed state.

use crate::config::SurfaceConfig;
use crate::export::ExportRequest;
use crate::history::HistoryStack;
use crate::input::InputEvent;
use crate::restore::{RestoreSequencer, RestoreTicket};
use crate::shortcuts::ShortcutAction;
use crate::tools::{Gesture, ToolConfig, ToolKind};
use sketch_core::raster::stroke_segment;
use sketch_core::{Bitmap, Color, ImageFormat, Point, Snapshot};

pub struct DrawingSurface {
    bitmap: Bitmap,
    config: SurfaceConfig,
    tool: ToolConfig,
    history: HistoryStack,
    /// Present between pointer-down and pointer-up.
    gesture: Option<Gesture>,
    restores: RestoreSequencer,
}

impl DrawingSurface {
    /// Create a blank surface with the default configuration.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(width, height, SurfaceConfig::default())
    }

    pub fn with_config(width: u32, height: u32, config: SurfaceConfig) -> Self {
        let tool = ToolConfig::new(config.default_width, config.default_color);
        Self {
            bitmap: Bitmap::new(width, height, config.background),
            history: HistoryStack::new(config.history_depth),
            tool,
            config,
            gesture: None,
            restores: RestoreSequencer::new(),
        }
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Freeze the current pixels.
    pub fn snapshot(&self) -> Snapshot {
        self.bitmap.snapshot()
    }

    // ─── Tool selectors ──────────────────────────────────────────────────

    pub fn tool_config(&self) -> &ToolConfig {
        &self.tool
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool.tool = tool;
    }

    pub fn set_color(&mut self, color: Color) {
        self.tool.color = color;
    }

    /// Set the stroke width. Zero is raised to 1.
    pub fn set_width(&mut self, width: u32) {
        self.tool.width = width.max(1);
    }

    pub fn set_fill(&mut self, fill: bool) {
        self.tool.fill = fill;
    }

    // ─── Gestures ────────────────────────────────────────────────────────

    pub fn is_drawing(&self) -> bool {
        self.gesture.is_some()
    }

    /// Start a gesture at `point`. A gesture still in progress (a lost
    /// pointer-up) is committed first.
    pub fn begin_gesture(&mut self, point: Point) {
        if self.gesture.is_some() {
            self.end_gesture();
        }
        self.restores.supersede();
        let base = self.bitmap.snapshot();
        self.history.record_checkpoint(base.clone());
        log::debug!(
            "gesture start {} at ({:.1}, {:.1})",
            self.tool.tool.name(),
            point.x,
            point.y
        );
        self.gesture = Some(Gesture::new(base, point, &self.tool, self.config.background));
    }

    /// Extend the active gesture to `point`. Returns `false` when no
    /// gesture is active (a hover move).
    pub fn move_gesture(&mut self, point: Point) -> bool {
        let Some(gesture) = self.gesture.as_mut() else {
            return false;
        };
        if gesture.tool.is_freehand() {
            stroke_segment(
                &mut self.bitmap,
                gesture.last,
                point,
                gesture.pen.width,
                gesture.pen.color,
            );
        } else {
            self.bitmap = gesture.preview(point, self.config.polygon_sides);
        }
        gesture.last = point;
        true
    }

    /// Finish the active gesture; the bitmap as last rendered is kept.
    /// Returns `false` when no gesture was active.
    pub fn end_gesture(&mut self) -> bool {
        match self.gesture.take() {
            Some(gesture) => {
                log::debug!("gesture end {}", gesture.tool.name());
                true
            }
            None => false,
        }
    }

    /// Route a pointer event. Key events are ignored here; resolve them
    /// through `ShortcutMap` and call `apply_action`.
    /// Returns `true` when the bitmap may have changed.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        let Some(point) = event.position() else {
            return false;
        };
        match event {
            InputEvent::PointerDown { .. } => {
                self.begin_gesture(point);
                false
            }
            InputEvent::PointerMove { .. } => self.move_gesture(point),
            InputEvent::PointerUp { .. } => {
                self.end_gesture();
                false
            }
            InputEvent::Key { .. } => false,
        }
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Restore the state before the most recent checkpoint.
    /// Returns `false` (and changes nothing) when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.end_gesture();
        if !self.history.can_undo() {
            return false;
        }
        let current = self.bitmap.snapshot();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore_now(&previous);
                true
            }
            None => false,
        }
    }

    /// Re-apply the most recently undone state.
    pub fn redo(&mut self) -> bool {
        self.end_gesture();
        if !self.history.can_redo() {
            return false;
        }
        let current = self.bitmap.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.restore_now(&next);
                true
            }
            None => false,
        }
    }

    fn restore_now(&mut self, snapshot: &Snapshot) {
        self.restores.supersede();
        self.bitmap = if snapshot.dimensions() == self.bitmap.dimensions() {
            snapshot.to_bitmap()
        } else {
            snapshot.scaled(self.width(), self.height())
        };
    }

    /// Reset to the background color. Undoable.
    pub fn clear(&mut self) {
        self.end_gesture();
        self.history.record_checkpoint(self.bitmap.snapshot());
        self.reset_to_background();
    }

    /// Reset to the background color without touching the history.
    pub(crate) fn reset_to_background(&mut self) {
        self.end_gesture();
        self.restores.supersede();
        self.bitmap.fill(self.config.background);
    }

    // ─── Resize ──────────────────────────────────────────────────────────

    /// Stretch the drawing into new dimensions.
    ///
    /// The history is dropped: its snapshots have the old size. With
    /// `scale_width_on_resize` the stroke width follows the larger of the
    /// two scale factors.
    pub fn resize(&mut self, width: u32, height: u32) {
        let (old_w, old_h) = self.bitmap.dimensions();
        if (old_w, old_h) == (width, height) {
            return;
        }
        self.end_gesture();
        self.restores.supersede();
        self.bitmap = self.bitmap.scaled(width, height);
        self.history.clear();

        if self.config.scale_width_on_resize && old_w > 0 && old_h > 0 {
            let factor = (width as f64 / old_w as f64).max(height as f64 / old_h as f64);
            let scaled = (self.tool.width as f64 * factor).round() as u32;
            self.set_width(scaled);
        }
        log::debug!(
            "resized {old_w}x{old_h} -> {width}x{height}, width {}",
            self.tool.width
        );
    }

    // ─── Asynchronous restores ───────────────────────────────────────────

    /// Take a ticket for a restore whose pixels arrive later.
    pub fn begin_restore(&mut self) -> RestoreTicket {
        self.restores.issue()
    }

    /// Apply a finished restore, stretched to the current dimensions.
    /// Stale tickets are dropped and `false` is returned.
    pub fn finish_restore(&mut self, ticket: RestoreTicket, bitmap: Bitmap) -> bool {
        if !self.restores.try_apply(ticket) {
            return false;
        }
        self.end_gesture();
        self.bitmap = bitmap.scaled(self.width(), self.height());
        true
    }

    /// A restore failed to produce pixels. If still current, fall back to a
    /// blank canvas. Returns whether the reset happened.
    pub fn fail_restore(&mut self, ticket: RestoreTicket) -> bool {
        if !self.restores.try_apply(ticket) {
            return false;
        }
        self.end_gesture();
        self.bitmap.fill(self.config.background);
        true
    }

    pub fn has_pending_restore(&self) -> bool {
        self.restores.has_pending()
    }

    // ─── Actions ─────────────────────────────────────────────────────────

    /// Start an export. The returned request must be confirmed before any
    /// image is encoded.
    pub fn request_export(&self, timestamp_ms: u64, format: ImageFormat) -> ExportRequest {
        ExportRequest::new(timestamp_ms, format)
    }

    /// Apply a shortcut action. Returns `true` when the bitmap changed.
    ///
    /// `Export` needs the host's confirmation dialog and is left to the
    /// caller; it returns `false` here.
    pub fn apply_action(&mut self, action: ShortcutAction) -> bool {
        match action {
            ShortcutAction::Tool(tool) => {
                self.set_tool(tool);
                false
            }
            ShortcutAction::ToggleFill => {
                self.tool.fill = !self.tool.fill;
                false
            }
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Clear => {
                self.clear();
                true
            }
            ShortcutAction::Export => false,
        }
    }
}
