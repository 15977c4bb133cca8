//! Undo/redo history of pixel patches.
//!
//! Each entry stores the pixels of the rectangle an operation touched, as
//! they were before (on the undo stack) or after (on the redo stack) the
//! operation. Restoring a patch gives back the exact prior buffer.

use crate::buffer::{copy_region_from, PixelBuffer, PixelRect};
use image::RgbaImage;
use std::collections::VecDeque;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Maximum bytes of pixel data held across both stacks.
pub const MAX_HISTORY_BYTES: usize = 256 * 1024 * 1024;

/// A rectangle of saved pixel values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelPatch {
    rect: PixelRect,
    bytes: Vec<u8>,
}

impl PixelPatch {
    /// Save the current pixels of `rect`.
    pub fn capture(buffer: &PixelBuffer, rect: PixelRect) -> Self {
        let (rect, bytes) = buffer.copy_region(rect);
        Self { rect, bytes }
    }

    /// Crop a full-buffer snapshot down to `rect`.
    pub fn from_snapshot(snapshot: &RgbaImage, rect: PixelRect) -> Self {
        let clipped = PixelBuffer::clip_to(snapshot.dimensions(), rect);
        let (rect, bytes) = copy_region_from(snapshot, clipped);
        Self { rect, bytes }
    }

    /// Write the saved pixels back.
    pub fn apply(&self, buffer: &mut PixelBuffer) {
        if !self.rect.is_empty() {
            buffer.write_region(self.rect, &self.bytes);
        }
    }

    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    pub fn memory_size(&self) -> usize {
        self.bytes.len()
    }
}

/// One undoable operation.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    description: &'static str,
    patch: PixelPatch,
}

impl HistoryEntry {
    pub fn new(description: &'static str, patch: PixelPatch) -> Self {
        Self { description, patch }
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn patch(&self) -> &PixelPatch {
        &self.patch
    }

    /// Swap the saved pixels with the buffer's current ones, returning the
    /// entry for the opposite stack.
    fn swap_into(self, buffer: &mut PixelBuffer) -> HistoryEntry {
        let current = PixelPatch::capture(buffer, self.patch.rect);
        self.patch.apply(buffer);
        HistoryEntry::new(self.description, current)
    }
}

/// Undo/redo stacks with count and memory limits.
#[derive(Debug)]
pub struct History {
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_entries: usize,
    max_bytes: usize,
    total_bytes: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_UNDO_HISTORY, MAX_HISTORY_BYTES)
    }
}

impl History {
    pub fn new(max_entries: usize, max_bytes: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_entries: max_entries.max(1),
            max_bytes,
            total_bytes: 0,
        }
    }

    /// Record a new operation. Forward history is discarded.
    pub fn push(&mut self, entry: HistoryEntry) {
        for dropped in self.redo_stack.drain(..) {
            self.total_bytes = self.total_bytes.saturating_sub(dropped.patch.memory_size());
        }
        self.total_bytes += entry.patch.memory_size();
        self.undo_stack.push_back(entry);
        self.prune();
    }

    /// Undo the last operation. Returns its description, or `None` when
    /// there is nothing to undo.
    pub fn undo(&mut self, buffer: &mut PixelBuffer) -> Option<&'static str> {
        let entry = self.undo_stack.pop_back()?;
        let description = entry.description;
        self.total_bytes = self.total_bytes.saturating_sub(entry.patch.memory_size());
        let redo = entry.swap_into(buffer);
        self.total_bytes += redo.patch.memory_size();
        self.redo_stack.push(redo);
        Some(description)
    }

    /// Redo the last undone operation.
    pub fn redo(&mut self, buffer: &mut PixelBuffer) -> Option<&'static str> {
        let entry = self.redo_stack.pop()?;
        let description = entry.description;
        self.total_bytes = self.total_bytes.saturating_sub(entry.patch.memory_size());
        let undo = entry.swap_into(buffer);
        self.total_bytes += undo.patch.memory_size();
        self.undo_stack.push_back(undo);
        Some(description)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn undo_description(&self) -> Option<&'static str> {
        self.undo_stack.back().map(|e| e.description)
    }

    /// Bytes of pixel data held.
    pub fn memory_usage(&self) -> usize {
        self.total_bytes
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.total_bytes = 0;
    }

    fn prune(&mut self) {
        while self.undo_stack.len() > self.max_entries {
            self.evict_oldest();
        }
        while self.total_bytes > self.max_bytes && self.undo_stack.len() > 1 {
            self.evict_oldest();
        }
    }

    fn evict_oldest(&mut self) {
        if let Some(removed) = self.undo_stack.pop_front() {
            log::debug!("Evicting oldest history entry: {}", removed.description);
            self.total_bytes = self.total_bytes.saturating_sub(removed.patch.memory_size());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BLACK;
    use image::Rgba;

    fn paint(buffer: &mut PixelBuffer, history: &mut History, x: u32, color: Rgba<u8>) {
        let rect = PixelRect::new(x, 0, 1, 1);
        history.push(HistoryEntry::new("Paint", PixelPatch::capture(buffer, rect)));
        buffer.put(x, 0, color);
    }

    #[test]
    fn test_undo_empty() {
        let mut buffer = PixelBuffer::new(2, 2);
        let mut history = History::default();
        assert!(!history.can_undo());
        assert_eq!(history.undo(&mut buffer), None);
        assert_eq!(buffer, PixelBuffer::new(2, 2));
    }

    #[test]
    fn test_undo_redo_exact() {
        let mut buffer = PixelBuffer::new(4, 1);
        let mut history = History::default();
        paint(&mut buffer, &mut history, 1, BLACK);
        let after = buffer.clone();

        assert_eq!(history.undo(&mut buffer), Some("Paint"));
        assert_eq!(buffer, PixelBuffer::new(4, 1));
        assert!(history.can_redo());

        assert_eq!(history.redo(&mut buffer), Some("Paint"));
        assert_eq!(buffer, after);
    }

    #[test]
    fn test_push_clears_redo() {
        let mut buffer = PixelBuffer::new(4, 1);
        let mut history = History::default();
        paint(&mut buffer, &mut history, 0, BLACK);
        history.undo(&mut buffer);
        assert!(history.can_redo());
        paint(&mut buffer, &mut history, 2, BLACK);
        assert!(!history.can_redo());
        assert_eq!(history.redo(&mut buffer), None);
    }

    #[test]
    fn test_depth_cap_evicts_oldest() {
        let mut buffer = PixelBuffer::new(8, 1);
        let mut history = History::new(3, usize::MAX);
        for x in 0..5 {
            paint(&mut buffer, &mut history, x, BLACK);
        }
        assert_eq!(history.undo_count(), 3);
        while history.undo(&mut buffer).is_some() {}
        // The first two paints can no longer be undone.
        assert_eq!(buffer.get(0, 0), Some(BLACK));
        assert_eq!(buffer.get(1, 0), Some(BLACK));
        assert_eq!(buffer.get(2, 0), Some(crate::color::WHITE));
    }

    #[test]
    fn test_memory_cap_keeps_latest() {
        let mut buffer = PixelBuffer::new(8, 1);
        let mut history = History::new(50, 4);
        paint(&mut buffer, &mut history, 0, BLACK);
        paint(&mut buffer, &mut history, 1, BLACK);
        assert_eq!(history.undo_count(), 1);
        assert_eq!(history.memory_usage(), 4);
    }

    #[test]
    fn test_patch_from_snapshot_clips() {
        let snapshot = RgbaImage::from_pixel(3, 3, BLACK);
        let patch = PixelPatch::from_snapshot(&snapshot, PixelRect::new(2, 2, 5, 5));
        assert_eq!(patch.rect(), PixelRect::new(2, 2, 1, 1));
        assert_eq!(patch.memory_size(), 4);
    }
}
