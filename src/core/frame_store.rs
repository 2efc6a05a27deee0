//! FrameStore: ordered frame sequence with the current-frame index.
//!
//! **Why**: Single owner of every frame in the document. History, tools and
//! the player all read and write frames through here.
//!
//! **Used by**: Editor (timeline ops), EditHistory (install snapshots),
//! Player (cycle bursts), project_io (encode/decode)
//!
//! # Invariants
//!
//! - `0 <= current_index < len` whenever `len > 0`
//! - `len >= 1` is kept by `remove()`/`pop()`, which refuse to drop the last
//!   frame. `clear_frames()` is the only way to reach `len == 0`; the load path
//!   refills immediately through `replace_frames()`.
//!
//! # Preconditions
//!
//! Index arguments are checked with `assert!`, exactly like slice indexing.
//! Callers validate against `num_frames()` first; the `Editor` facade does
//! that and turns violations into `EditorError`.

use log::{debug, trace};

use super::error::{EditorError, check_dimensions};
use crate::entities::frame::Frame;

/// Ordered frames plus current frame index
#[derive(Debug, Clone)]
pub struct FrameStore {
    frames: Vec<Frame>,
    current_index: usize,
    width: u32,
    height: u32,
}

impl FrameStore {
    /// Create store holding one blank frame
    pub fn new(width: u32, height: u32) -> Self {
        let mut store = Self {
            frames: Vec::new(),
            current_index: 0,
            width,
            height,
        };
        store.generate_frame(width, height);
        store
    }

    /// Number of frames in the animation
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Canvas size shared by all frames
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Mutable frame at index. Panics if `index >= num_frames()`.
    pub fn get(&mut self, index: usize) -> &mut Frame {
        assert!(
            index < self.frames.len(),
            "frame index {} out of range ({} frames)",
            index,
            self.frames.len()
        );
        &mut self.frames[index]
    }

    /// Read-only frame at index. Panics if `index >= num_frames()`.
    pub fn frame(&self, index: usize) -> &Frame {
        assert!(
            index < self.frames.len(),
            "frame index {} out of range ({} frames)",
            index,
            self.frames.len()
        );
        &self.frames[index]
    }

    pub fn first(&self) -> &Frame {
        self.frames.first().expect("frame store is empty")
    }

    pub fn last(&self) -> &Frame {
        self.frames.last().expect("frame store is empty")
    }

    /// Iterate frames in order
    pub fn frames(&self) -> impl ExactSizeIterator<Item = &Frame> {
        self.frames.iter()
    }

    /// Append a blank (white) frame, returns its index
    pub fn generate_frame(&mut self, width: u32, height: u32) -> usize {
        self.frames.push(Frame::new(width, height));
        let index = self.frames.len() - 1;
        debug!("Generated frame {} ({}x{})", index, width, height);
        index
    }

    /// Add frame as the last frame of the animation
    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Insert frame at position. Panics if `index > num_frames()`.
    pub fn insert(&mut self, frame: Frame, index: usize) {
        assert!(
            index <= self.frames.len(),
            "insert index {} out of range ({} frames)",
            index,
            self.frames.len()
        );
        self.frames.insert(index, frame);
    }

    /// Delete frame at index. Panics if out of range.
    ///
    /// Refuses to delete the only remaining frame.
    pub fn remove(&mut self, index: usize) -> Result<Frame, EditorError> {
        assert!(
            index < self.frames.len(),
            "remove index {} out of range ({} frames)",
            index,
            self.frames.len()
        );
        if self.frames.len() == 1 {
            return Err(EditorError::LastFrame);
        }
        let frame = self.frames.remove(index);
        self.clamp_current();
        trace!("Removed frame {}, {} left", index, self.frames.len());
        Ok(frame)
    }

    /// Delete the last frame. Refuses to delete the only remaining frame.
    pub fn pop(&mut self) -> Result<Frame, EditorError> {
        if self.frames.len() <= 1 {
            return Err(EditorError::LastFrame);
        }
        let frame = self.frames.pop().ok_or(EditorError::LastFrame)?;
        self.clamp_current();
        Ok(frame)
    }

    /// Exchange two frames. `current_index` is left as is.
    pub fn swap(&mut self, i: usize, j: usize) {
        self.frames.swap(i, j);
    }

    /// Remove every frame. Caller must refill before further edits.
    pub fn clear_frames(&mut self) {
        self.frames.clear();
        self.current_index = 0;
    }

    /// Replace the whole sequence (document load). Rejects an empty list and
    /// frames whose size differs from the first one.
    pub fn replace_frames(&mut self, frames: Vec<Frame>) -> Result<(), EditorError> {
        let first = frames.first().ok_or(EditorError::EmptyDocument)?;
        let expected = first.dimensions();
        check_dimensions(expected.0, expected.1)?;
        if let Some(bad) = frames.iter().find(|f| f.dimensions() != expected) {
            return Err(EditorError::DimensionMismatch {
                expected,
                found: bad.dimensions(),
            });
        }

        self.clear_frames();
        for frame in frames {
            self.push(frame);
        }
        self.width = expected.0;
        self.height = expected.1;
        debug!("Replaced frames: {} x {}x{}", self.frames.len(), self.width, self.height);
        Ok(())
    }

    /// Resize every frame (top-left anchored, new area white)
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), EditorError> {
        check_dimensions(width, height)?;
        for frame in self.frames.iter_mut() {
            *frame = frame.resized(width, height);
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Set current frame index. Panics if out of range.
    ///
    /// Does not touch undo history; see `EditHistory::clear_buffers`.
    pub fn set_current_index(&mut self, index: usize) {
        assert!(
            index < self.frames.len(),
            "current index {} out of range ({} frames)",
            index,
            self.frames.len()
        );
        self.current_index = index;
    }

    pub fn current(&self) -> &Frame {
        self.frame(self.current_index)
    }

    pub fn current_mut(&mut self) -> &mut Frame {
        let index = self.current_index;
        self.get(index)
    }

    fn clamp_current(&mut self) {
        if self.current_index >= self.frames.len() {
            self.current_index = self.frames.len().saturating_sub(1);
        }
    }
}

impl Default for FrameStore {
    fn default() -> Self {
        Self::new(100, 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::frame::{BLACK, Point, WHITE};

    fn marked(width: u32, height: u32, x: i32) -> Frame {
        let mut frame = Frame::new(width, height);
        frame.set_pixel(Point::new(x, 0), BLACK);
        frame
    }

    /// Test: generate_frame appends one white frame
    /// Validates: count grows by exactly one, content is background
    #[test]
    fn test_generate_frame() {
        let mut store = FrameStore::new(8, 8);
        for (w, h) in [(1, 1), (8, 8), (3, 17)] {
            let before = store.num_frames();
            let index = store.generate_frame(w, h);
            assert_eq!(store.num_frames(), before + 1);
            assert_eq!(index, before);
            assert!(store.frame(index).is_uniform(WHITE));
            assert_eq!(store.frame(index).dimensions(), (w, h));
        }
    }

    #[test]
    fn test_new_store_has_one_frame() {
        let store = FrameStore::new(4, 3);
        assert_eq!(store.num_frames(), 1);
        assert_eq!(store.current_index(), 0);
        assert_eq!(store.dimensions(), (4, 3));
        assert_eq!(store.first(), store.last());
    }

    #[test]
    fn test_push_insert_order() {
        let mut store = FrameStore::new(4, 1);
        store.push(marked(4, 1, 1));
        store.insert(marked(4, 1, 2), 1);
        assert_eq!(store.num_frames(), 3);
        assert_eq!(store.frame(1).pixel(Point::new(2, 0)), Some(BLACK));
        assert_eq!(store.last().pixel(Point::new(1, 0)), Some(BLACK));
    }

    #[test]
    #[should_panic]
    fn test_get_out_of_range_panics() {
        let mut store = FrameStore::new(2, 2);
        store.get(1);
    }

    #[test]
    #[should_panic]
    fn test_insert_past_end_panics() {
        let mut store = FrameStore::new(2, 2);
        store.insert(Frame::new(2, 2), 2);
    }

    /// Test: remove/pop keep at least one frame
    #[test]
    fn test_last_frame_is_kept() {
        let mut store = FrameStore::new(2, 2);
        assert_eq!(store.remove(0), Err(EditorError::LastFrame));
        assert_eq!(store.pop(), Err(EditorError::LastFrame));
        assert_eq!(store.num_frames(), 1);

        store.generate_frame(2, 2);
        assert!(store.pop().is_ok());
        assert_eq!(store.num_frames(), 1);
    }

    /// Test: current index stays valid after removal
    #[test]
    fn test_remove_clamps_current() {
        let mut store = FrameStore::new(2, 2);
        store.generate_frame(2, 2);
        store.generate_frame(2, 2);
        store.set_current_index(2);
        store.remove(2).unwrap();
        assert_eq!(store.current_index(), 1);
    }

    #[test]
    fn test_swap_leaves_current_index() {
        let mut store = FrameStore::new(4, 1);
        store.push(marked(4, 1, 3));
        store.set_current_index(1);
        store.swap(0, 1);
        assert_eq!(store.current_index(), 1);
        assert_eq!(store.frame(0).pixel(Point::new(3, 0)), Some(BLACK));
        assert!(store.frame(1).is_uniform(WHITE));
    }

    #[test]
    fn test_clear_and_replace() {
        let mut store = FrameStore::new(2, 2);
        store.clear_frames();
        assert!(store.is_empty());

        assert_eq!(store.replace_frames(Vec::new()), Err(EditorError::EmptyDocument));
        let err = store.replace_frames(vec![Frame::new(3, 3), Frame::new(2, 3)]);
        assert!(matches!(err, Err(EditorError::DimensionMismatch { .. })));

        store.replace_frames(vec![Frame::new(3, 3), Frame::new(3, 3)]).unwrap();
        assert_eq!(store.num_frames(), 2);
        assert_eq!(store.dimensions(), (3, 3));
        assert_eq!(store.current_index(), 0);
    }

    #[test]
    fn test_resize_all_frames() {
        let mut store = FrameStore::new(2, 2);
        store.generate_frame(2, 2);
        store.resize(5, 1).unwrap();
        assert_eq!(store.dimensions(), (5, 1));
        assert!(store.frames().all(|f| f.dimensions() == (5, 1)));
        assert!(store.resize(0, 4).is_err());
    }
}
