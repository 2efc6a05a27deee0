//! EditHistory: linear undo/redo over whole-frame snapshots.
//!
//! **Why**: Pixel edits are cheap to snapshot at sprite sizes, so history
//! stores full frame copies instead of per-stroke diffs.
//!
//! **Used by**: Editor (stroke begin snapshots, undo/redo, timeline ops)
//!
//! # Model
//!
//! Two stacks plus a `just_undid` flag. Snapshots are NOT tagged with a frame
//! index: they always apply to `store.current_index()` at undo/redo time.
//! Callers must call `clear_buffers()` whenever the edited frame changes or a
//! document is loaded, otherwise one frame's pixels get replayed onto another.
//!
//! # Branch pruning
//!
//! After an undo, the next `add_undo_stack()` drops the redo stack: a new edit
//! makes the undone future unreachable. The flag itself only changes inside
//! `undo()` (set) and `redo()` (cleared).

use log::{debug, trace};

use super::editor_events::CanvasRefreshEvent;
use super::event_bus::EditorEmitter;
use super::frame_store::FrameStore;
use crate::entities::frame::Frame;

/// Undo/redo snapshot stacks
#[derive(Debug, Default)]
pub struct EditHistory {
    undo_buffer: Vec<Frame>,
    redo_buffer: Vec<Frame>,
    just_undid: bool,
    /// Max snapshots per stack, 0 = unbounded
    limit: usize,
    emitter: EditorEmitter,
}

impl EditHistory {
    pub fn new(emitter: EditorEmitter) -> Self {
        Self {
            emitter,
            ..Default::default()
        }
    }

    /// History keeping at most `limit` snapshots per stack (0 = unbounded)
    pub fn with_limit(emitter: EditorEmitter, limit: usize) -> Self {
        Self {
            limit,
            ..Self::new(emitter)
        }
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        Self::trim(&mut self.undo_buffer, limit);
        Self::trim(&mut self.redo_buffer, limit);
    }

    /// Record the frame about to be edited.
    pub fn add_undo_stack(&mut self, snapshot: &Frame) {
        if self.just_undid {
            // New edit after undo: previous future is gone
            if !self.redo_buffer.is_empty() {
                trace!("Pruning {} redo snapshots", self.redo_buffer.len());
            }
            self.redo_buffer.clear();
        }
        self.undo_buffer.push(snapshot.clone());
        Self::trim(&mut self.undo_buffer, self.limit);
    }

    /// Restore the last snapshot into the current frame. No-op if empty.
    pub fn undo(&mut self, store: &mut FrameStore) {
        let Some(snapshot) = self.undo_buffer.pop() else {
            return;
        };
        let index = store.current_index();
        let current = std::mem::replace(store.get(index), snapshot);
        self.redo_buffer.push(current);
        Self::trim(&mut self.redo_buffer, self.limit);
        self.just_undid = true;

        debug!("Undo on frame {} ({} left)", index, self.undo_buffer.len());
        self.emitter.emit(CanvasRefreshEvent(store.frame(index).clone()));
    }

    /// Re-apply the last undone snapshot. No-op if empty.
    pub fn redo(&mut self, store: &mut FrameStore) {
        let Some(snapshot) = self.redo_buffer.pop() else {
            return;
        };
        let index = store.current_index();
        let current = std::mem::replace(store.get(index), snapshot);
        self.undo_buffer.push(current);
        Self::trim(&mut self.undo_buffer, self.limit);
        self.just_undid = false;

        debug!("Redo on frame {} ({} left)", index, self.redo_buffer.len());
        self.emitter.emit(CanvasRefreshEvent(store.frame(index).clone()));
    }

    /// Drop all snapshots (frame switch, document load)
    pub fn clear_buffers(&mut self) {
        self.undo_buffer.clear();
        self.redo_buffer.clear();
    }

    /// Commit an edited buffer into the current frame (deep copy).
    /// Does not touch the stacks.
    pub fn update_frame(&mut self, store: &mut FrameStore, image: &Frame) {
        let index = store.current_index();
        store.get(index).clone_from(image);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_buffer.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_buffer.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_buffer.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_buffer.len()
    }

    pub fn just_undid(&self) -> bool {
        self.just_undid
    }

    fn trim(buffer: &mut Vec<Frame>, limit: usize) {
        if limit > 0 && buffer.len() > limit {
            let overflow = buffer.len() - limit;
            buffer.drain(0..overflow);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_bus::EventBus;
    use crate::entities::frame::{BLACK, Point, WHITE};
    use image::Rgba;
    use std::sync::{Arc, Mutex};

    const RED: image::Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn paint(store: &mut FrameStore, x: i32, color: image::Rgba<u8>) {
        store.current_mut().set_pixel(Point::new(x, 0), color);
    }

    /// Test: Undo/redo round trip
    /// Validates: undo restores F0, redo restores F1 pixel for pixel
    #[test]
    fn test_undo_redo_round_trip() {
        let mut store = FrameStore::new(4, 4);
        let mut history = EditHistory::new(EditorEmitter::dummy());

        let f0 = store.current().clone();
        history.add_undo_stack(&f0);
        paint(&mut store, 1, BLACK);
        let f1 = store.current().clone();
        assert_ne!(f0, f1);

        history.undo(&mut store);
        assert_eq!(store.current(), &f0);
        assert!(history.just_undid());

        history.redo(&mut store);
        assert_eq!(store.current(), &f1);
        assert!(!history.just_undid());
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut store = FrameStore::new(2, 2);
        let mut history = EditHistory::new(EditorEmitter::dummy());
        let before = store.current().clone();

        history.undo(&mut store);
        history.redo(&mut store);

        assert_eq!(store.current(), &before);
        assert!(!history.just_undid());
        assert_eq!(history.undo_len(), 0);
        assert_eq!(history.redo_len(), 0);
    }

    /// Test: Branch pruning after undo
    /// Validates: next add_undo_stack empties a non-empty redo stack
    #[test]
    fn test_branch_pruning() {
        let mut store = FrameStore::new(4, 1);
        let mut history = EditHistory::new(EditorEmitter::dummy());

        for x in 0..3 {
            history.add_undo_stack(store.current());
            paint(&mut store, x, BLACK);
        }
        history.undo(&mut store);
        history.undo(&mut store);
        assert_eq!(history.redo_len(), 2);

        history.add_undo_stack(store.current());
        assert_eq!(history.redo_len(), 0);

        history.redo(&mut store);
        assert_eq!(history.undo_len(), 2);
    }

    /// Test: No pruning without a preceding undo
    #[test]
    fn test_redo_then_edit_keeps_redo() {
        let mut store = FrameStore::new(4, 1);
        let mut history = EditHistory::new(EditorEmitter::dummy());

        history.add_undo_stack(store.current());
        paint(&mut store, 0, BLACK);
        history.add_undo_stack(store.current());
        paint(&mut store, 1, BLACK);

        history.undo(&mut store);
        history.undo(&mut store);
        history.redo(&mut store);
        assert_eq!(history.redo_len(), 1);

        // just_undid is false after redo
        history.add_undo_stack(store.current());
        assert_eq!(history.redo_len(), 1);
    }

    #[test]
    fn test_update_frame_commits_copy() {
        let mut store = FrameStore::new(2, 2);
        let mut history = EditHistory::new(EditorEmitter::dummy());

        let mut buffer = store.current().clone();
        buffer.fill(RED);
        history.update_frame(&mut store, &buffer);
        buffer.fill(WHITE);

        assert!(store.current().is_uniform(RED));
        assert_eq!(history.undo_len(), 0);
    }

    /// Test: Snapshots apply to whatever frame is current
    /// Validates: untagged snapshots (caller must clear on frame switch)
    #[test]
    fn test_snapshots_follow_current_index() {
        let mut store = FrameStore::new(2, 1);
        store.generate_frame(2, 1);
        let mut history = EditHistory::new(EditorEmitter::dummy());

        let mut red = Frame::new(2, 1);
        red.fill(RED);
        history.add_undo_stack(&red);

        store.set_current_index(1);
        history.undo(&mut store);
        assert!(store.frame(1).is_uniform(RED));
        assert!(store.frame(0).is_uniform(WHITE));

        history.clear_buffers();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let mut store = FrameStore::new(3, 1);
        let mut history = EditHistory::with_limit(EditorEmitter::dummy(), 2);

        for x in 0..3 {
            history.add_undo_stack(store.current());
            paint(&mut store, x, BLACK);
        }
        assert_eq!(history.undo_len(), 2);

        history.undo(&mut store);
        history.undo(&mut store);
        history.undo(&mut store);
        // Oldest (all white) snapshot was evicted
        assert_eq!(store.current().pixel(Point::new(0, 0)), Some(BLACK));
        assert_eq!(store.current().pixel(Point::new(1, 0)), Some(WHITE));
    }

    #[test]
    fn test_undo_emits_canvas_refresh() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        bus.subscribe::<CanvasRefreshEvent, _>(move |e| sink.lock().unwrap().push(e.0.clone()));

        let mut store = FrameStore::new(2, 2);
        let mut history = EditHistory::new(EditorEmitter::from_emitter(bus.emitter()));
        history.add_undo_stack(store.current());
        paint(&mut store, 0, RED);

        history.undo(&mut store);
        history.redo(&mut store);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].is_uniform(WHITE));
        assert_eq!(seen[1].pixel(Point::new(0, 0)), Some(RED));
    }
}
