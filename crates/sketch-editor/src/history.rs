//! Undo/redo history of full-canvas snapshots.
//!
//! The surface records a checkpoint (the pre-gesture bitmap) when a gesture
//! starts. Undo hands back the most recent checkpoint and parks the current
//! bitmap on the redo stack; redo is the mirror image. Any new checkpoint
//! invalidates redo.
//!
//! Both stacks are bounded by `max_depth`; pushing past it drops the oldest
//! entry.

use sketch_core::Snapshot;

pub struct HistoryStack {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// Maximum entries per stack.
    max_depth: usize,
}

impl HistoryStack {
    /// `max_depth` below 1 is raised to 1.
    pub fn new(max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Push the current bitmap onto undo and clear redo.
    pub fn record_checkpoint(&mut self, current: Snapshot) {
        push_bounded(&mut self.undo_stack, current, self.max_depth);
        self.redo_stack.clear();
    }

    /// Pop the most recent checkpoint for the caller to restore.
    /// `current` is kept on the redo stack. Returns `None` (and keeps
    /// nothing) when there is nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop()?;
        push_bounded(&mut self.redo_stack, current, self.max_depth);
        Some(previous)
    }

    /// Pop the most recently undone state. `current` goes back onto undo.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        push_bounded(&mut self.undo_stack, current, self.max_depth);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Forget everything, e.g. after a resize made old snapshots unusable.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

fn push_bounded(stack: &mut Vec<Snapshot>, snapshot: Snapshot, max_depth: usize) {
    stack.push(snapshot);
    if stack.len() > max_depth {
        stack.remove(0);
        log::debug!("history full ({max_depth}), dropped oldest entry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketch_core::{Bitmap, Color};

    fn snap(shade: u8) -> Snapshot {
        Bitmap::new(2, 2, Color::rgb(shade, shade, shade)).snapshot()
    }

    #[test]
    fn undo_redo_roundtrip() {
        let mut stack = HistoryStack::new(10);
        let before = snap(0);
        let after = snap(1);

        stack.record_checkpoint(before.clone());
        let restored = stack.undo(after.clone()).unwrap();
        assert!(restored.ptr_eq(&before));
        assert!(stack.can_redo());

        let redone = stack.redo(restored).unwrap();
        assert!(redone.ptr_eq(&after));
        assert!(stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn empty_stacks_are_noops() {
        let mut stack = HistoryStack::new(10);
        assert!(stack.undo(snap(0)).is_none());
        assert!(stack.redo(snap(0)).is_none());
        assert_eq!(stack.undo_len(), 0);
        assert_eq!(stack.redo_len(), 0);
    }

    #[test]
    fn redo_clears_on_new_checkpoint() {
        let mut stack = HistoryStack::new(10);
        stack.record_checkpoint(snap(0));
        stack.undo(snap(1));
        assert!(stack.can_redo());

        stack.record_checkpoint(snap(2));
        assert!(!stack.can_redo());
    }

    #[test]
    fn max_depth_trims_oldest() {
        let mut stack = HistoryStack::new(3);
        for i in 0..5 {
            stack.record_checkpoint(snap(i));
        }
        assert_eq!(stack.undo_len(), 3);

        // Entries 2, 3, 4 remain; 0 and 1 were evicted.
        let mut seen = Vec::new();
        let mut current = snap(99);
        while let Some(prev) = stack.undo(current) {
            seen.push(prev.pixel(0, 0).unwrap().r);
            current = prev;
        }
        assert_eq!(seen, vec![4, 3, 2]);
    }

    #[test]
    fn huge_depth_does_not_preallocate() {
        let mut stack = HistoryStack::new(usize::MAX);
        stack.record_checkpoint(snap(0));
        assert_eq!(stack.undo_len(), 1);
        assert_eq!(stack.max_depth(), usize::MAX);
    }

    #[test]
    fn zero_depth_is_raised_to_one() {
        let mut stack = HistoryStack::new(0);
        stack.record_checkpoint(snap(0));
        stack.record_checkpoint(snap(1));
        assert_eq!(stack.max_depth(), 1);
        assert_eq!(stack.undo_len(), 1);
    }
}
