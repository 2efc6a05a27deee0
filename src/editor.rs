//! Editor: the in-process API the UI collaborators talk to.
//!
//! Owns the document (`FrameStore`), its `EditHistory`, the `Toolbox` and the
//! preview `Player`, and routes canvas/tool/timeline/playback calls to them.
//! Results go back out as events on the shared `EventBus`.
//!
//! # Strokes
//!
//! `draw_pressed` snapshots the current frame into history and copies it into
//! a stroke buffer. Moves paint into that buffer; `draw_released` commits it
//! with `EditHistory::update_frame`. The canvas is refreshed from the buffer
//! after every mutating step.
//!
//! # History scope
//!
//! Snapshots are not tagged with a frame, so every operation that changes
//! which frame is being edited clears history here: frame switch, delete,
//! resize, load, new document. Reordering keeps it, since the current index
//! follows the edited frame.

use std::time::Instant;

use log::{debug, info};

use crate::config::EditorSettings;
use crate::core::editor_events::{CanvasRefreshEvent, FramesChangedEvent};
use crate::core::error::{EditorError, check_dimensions, check_index};
use crate::core::event_bus::{EditorEmitter, EventBus};
use crate::core::frame_store::FrameStore;
use crate::core::history::EditHistory;
use crate::core::player::Player;
use crate::entities::frame::{Color, Frame, Point};
use crate::entities::tool::{Effect, ToolKind};
use crate::entities::toolbox::Toolbox;

/// Sprite editor core
#[derive(Debug)]
pub struct Editor {
    store: FrameStore,
    history: EditHistory,
    toolbox: Toolbox,
    player: Player,
    /// Working copy of the current frame while a stroke is in progress
    stroke: Option<Frame>,
    emitter: EditorEmitter,
}

impl Editor {
    /// Create editor with one blank frame sized from settings
    pub fn new(settings: &EditorSettings, bus: &EventBus) -> Result<Self, EditorError> {
        check_dimensions(settings.canvas_width, settings.canvas_height)?;
        let emitter = EditorEmitter::from_emitter(bus.emitter());

        let mut player = Player::new(emitter.clone());
        player.update_fps(settings.fps)?;

        let toolbox = Toolbox::with_brush(
            emitter.clone(),
            settings.brush_size,
            settings.pen_color(),
            settings.start_tool(),
        );

        info!(
            "Editor created: {}x{} canvas, {} fps",
            settings.canvas_width, settings.canvas_height, settings.fps
        );

        Ok(Self {
            store: FrameStore::new(settings.canvas_width, settings.canvas_height),
            history: EditHistory::with_limit(emitter.clone(), settings.history_limit),
            toolbox,
            player,
            stroke: None,
            emitter,
        })
    }

    // === Read access ===

    pub fn frames(&self) -> &FrameStore {
        &self.store
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn toolbox(&self) -> &Toolbox {
        &self.toolbox
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn current_index(&self) -> usize {
        self.store.current_index()
    }

    /// Frame the canvas should show (stroke buffer while drawing)
    pub fn canvas_frame(&self) -> &Frame {
        self.stroke.as_ref().unwrap_or_else(|| self.store.current())
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }

    // === Canvas ===

    /// Pointer down: snapshot for undo, start stroke, apply tool.
    /// A press while a stroke is open continues that stroke.
    pub fn draw_pressed(&mut self, point: Point) {
        if self.stroke.is_some() {
            self.draw_moved(point);
            return;
        }
        let mut buffer = self.store.current().clone();
        self.history.add_undo_stack(&buffer);
        self.apply_tool(&mut buffer, point);
        self.stroke = Some(buffer);
    }

    /// Pointer drag: apply tool to the stroke buffer
    pub fn draw_moved(&mut self, point: Point) {
        if let Some(mut buffer) = self.stroke.take() {
            self.apply_tool(&mut buffer, point);
            self.stroke = Some(buffer);
        }
    }

    /// Pointer up: apply tool and commit the stroke into the current frame
    pub fn draw_released(&mut self, point: Point) {
        if let Some(mut buffer) = self.stroke.take() {
            self.apply_tool(&mut buffer, point);
            self.history.update_frame(&mut self.store, &buffer);
        }
    }

    fn apply_tool(&mut self, buffer: &mut Frame, point: Point) {
        if self.toolbox.draw(buffer, point) == Effect::Mutate {
            self.emitter.emit(CanvasRefreshEvent(buffer.clone()));
        }
    }

    pub fn undo(&mut self) {
        self.stroke = None;
        self.history.undo(&mut self.store);
    }

    pub fn redo(&mut self) {
        self.stroke = None;
        self.history.redo(&mut self.store);
    }

    // === Tools ===

    pub fn select_tool(&mut self, kind: ToolKind) {
        self.toolbox.select_tool(kind);
    }

    pub fn set_brush_settings(&mut self, size: u32, color: Color) {
        self.toolbox.set_brush_settings(size, color);
    }

    pub fn set_pen_color(&mut self, color: Color) {
        self.toolbox.set_pen_color(color);
    }

    // === Timeline ===

    /// Append a blank frame at canvas size, returns its index
    pub fn add_frame(&mut self) -> usize {
        let (w, h) = self.store.dimensions();
        let index = self.store.generate_frame(w, h);
        self.emit_frames_changed();
        index
    }

    /// Delete frame at index. The last remaining frame cannot be deleted.
    pub fn delete_frame(&mut self, index: usize) -> Result<(), EditorError> {
        check_index(index, self.store.num_frames())?;
        self.store.remove(index)?;
        debug!("Deleted frame {}, {} left", index, self.store.num_frames());
        self.reset_edit_state();
        self.emit_frames_changed();
        self.emit_canvas();
        Ok(())
    }

    /// Move frame `from` to position `to`, shifting the frames in between.
    /// The current index follows the frame it pointed at.
    pub fn move_frame(&mut self, from: usize, to: usize) -> Result<(), EditorError> {
        let len = self.store.num_frames();
        check_index(from, len)?;
        check_index(to, len)?;
        if from == to {
            return Ok(());
        }

        if from < to {
            for i in from..to {
                self.store.swap(i, i + 1);
            }
        } else {
            for i in (to..from).rev() {
                self.store.swap(i, i + 1);
            }
        }

        let current = self.store.current_index();
        let new_current = if current == from {
            to
        } else if from < current && current <= to {
            current - 1
        } else if to <= current && current < from {
            current + 1
        } else {
            current
        };
        // Current index follows its frame
        self.store.set_current_index(new_current);

        debug!("Moved frame {} -> {}", from, to);
        self.emit_frames_changed();
        Ok(())
    }

    /// Switch the edited frame. Clears undo/redo history.
    pub fn set_current_frame(&mut self, index: usize) -> Result<(), EditorError> {
        check_index(index, self.store.num_frames())?;
        self.store.set_current_index(index);
        self.reset_edit_state();
        self.emit_frames_changed();
        self.emit_canvas();
        Ok(())
    }

    /// Resize every frame (top-left anchored). Clears history.
    pub fn resize_canvas(&mut self, width: u32, height: u32) -> Result<(), EditorError> {
        self.store.resize(width, height)?;
        info!("Canvas resized to {}x{}", width, height);
        self.reset_edit_state();
        self.emit_canvas();
        Ok(())
    }

    // === Document ===

    /// Replace the document with one blank frame
    pub fn new_document(&mut self, width: u32, height: u32) -> Result<(), EditorError> {
        check_dimensions(width, height)?;
        self.load_frames(vec![Frame::new(width, height)])
    }

    /// Replace all frames (persistence load), select frame 0, clear history
    pub fn load_frames(&mut self, frames: Vec<Frame>) -> Result<(), EditorError> {
        self.store.replace_frames(frames)?;
        info!("Loaded {} frames", self.store.num_frames());
        self.set_current_frame(0)
    }

    // === Playback ===

    pub fn update_fps(&mut self, fps: i32) -> Result<(), EditorError> {
        self.player.update_fps(fps)
    }

    /// Start preview at the current FPS
    pub fn play(&mut self) -> Result<(), EditorError> {
        self.player.play(self.player.fps() as i32)
    }

    pub fn stop(&mut self) {
        self.player.stop();
    }

    pub fn toggle(&mut self) {
        self.player.toggle();
    }

    /// Host-loop tick: drive the preview player
    pub fn tick(&mut self) -> Option<usize> {
        self.player.update(&self.store)
    }

    pub fn tick_at(&mut self, now: Instant) -> Option<usize> {
        self.player.update_at(now, &self.store)
    }

    // === Helpers ===

    fn reset_edit_state(&mut self) {
        self.stroke = None;
        self.history.clear_buffers();
    }

    fn emit_frames_changed(&self) {
        self.emitter.emit(FramesChangedEvent {
            num_frames: self.store.num_frames(),
            current: self.store.current_index(),
        });
    }

    fn emit_canvas(&self) {
        self.emitter.emit(CanvasRefreshEvent(self.store.current().clone()));
    }
}
