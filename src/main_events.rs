//! Input event routing: maps events polled from the bus onto `Editor` calls.
//!
//! Output events (canvas refresh, preview frames, color changes) are emitted
//! by the components themselves and pass through here unhandled.
//!
//! Failures of individual commands are logged and do not stop the loop:
//! a bad index from the timeline panel must not take the editor down.

use std::path::PathBuf;

use log::{debug, warn};

use crate::core::editor_events::*;
use crate::core::error::EditorError;
use crate::core::event_bus::{BoxedEvent, downcast_event};
use crate::core::player_events::*;
use crate::editor::Editor;

/// Result of handling an app event - may contain deferred actions
#[derive(Debug, Default)]
pub struct EventResult {
    pub load_project: Option<PathBuf>,
    pub save_project: Option<PathBuf>,
    pub export_frames: Option<PathBuf>,
    pub error: Option<EditorError>,
}

impl EventResult {
    fn from_outcome(outcome: Result<(), EditorError>) -> Self {
        let mut result = Self::default();
        if let Err(e) = outcome {
            warn!("{}", e);
            result.error = Some(e);
        }
        result
    }
}

/// Handle a single app event (called from the host loop).
/// Returns Some(result) if event was handled, None otherwise.
pub fn handle_app_event(event: &BoxedEvent, editor: &mut Editor) -> Option<EventResult> {
    // === Canvas ===
    if let Some(e) = downcast_event::<DrawPressedEvent>(event) {
        editor.draw_pressed(e.0);
        return Some(EventResult::default());
    }
    if let Some(e) = downcast_event::<DrawMovedEvent>(event) {
        editor.draw_moved(e.0);
        return Some(EventResult::default());
    }
    if let Some(e) = downcast_event::<DrawReleasedEvent>(event) {
        editor.draw_released(e.0);
        return Some(EventResult::default());
    }
    if downcast_event::<UndoEvent>(event).is_some() {
        editor.undo();
        return Some(EventResult::default());
    }
    if downcast_event::<RedoEvent>(event).is_some() {
        editor.redo();
        return Some(EventResult::default());
    }

    // === Tools ===
    if let Some(e) = downcast_event::<SelectToolEvent>(event) {
        editor.select_tool(e.0);
        return Some(EventResult::default());
    }
    if let Some(e) = downcast_event::<SetBrushSettingsEvent>(event) {
        editor.set_brush_settings(e.size, e.color);
        return Some(EventResult::default());
    }
    if let Some(e) = downcast_event::<SetPenColorEvent>(event) {
        editor.set_pen_color(e.0);
        return Some(EventResult::default());
    }

    // === Timeline ===
    if downcast_event::<AddFrameEvent>(event).is_some() {
        let index = editor.add_frame();
        debug!("AddFrame: new frame {}", index);
        return Some(EventResult::default());
    }
    if let Some(e) = downcast_event::<DeleteFrameEvent>(event) {
        return Some(EventResult::from_outcome(editor.delete_frame(e.0)));
    }
    if let Some(e) = downcast_event::<MoveFrameEvent>(event) {
        return Some(EventResult::from_outcome(editor.move_frame(e.from, e.to)));
    }
    if let Some(e) = downcast_event::<SetCurrentFrameEvent>(event) {
        return Some(EventResult::from_outcome(editor.set_current_frame(e.0)));
    }
    if let Some(e) = downcast_event::<ResizeCanvasEvent>(event) {
        return Some(EventResult::from_outcome(editor.resize_canvas(e.width, e.height)));
    }

    // === Playback ===
    if downcast_event::<PlayEvent>(event).is_some() {
        return Some(EventResult::from_outcome(editor.play()));
    }
    if downcast_event::<StopEvent>(event).is_some() {
        editor.stop();
        return Some(EventResult::default());
    }
    if downcast_event::<TogglePlayPauseEvent>(event).is_some() {
        editor.toggle();
        return Some(EventResult::default());
    }
    if let Some(e) = downcast_event::<SetFpsEvent>(event) {
        return Some(EventResult::from_outcome(editor.update_fps(e.0)));
    }

    // === Document ===
    if let Some(e) = downcast_event::<NewDocumentEvent>(event) {
        return Some(EventResult::from_outcome(editor.new_document(e.width, e.height)));
    }
    if let Some(e) = downcast_event::<SaveProjectEvent>(event) {
        return Some(EventResult {
            save_project: Some(e.0.clone()),
            ..Default::default()
        });
    }
    if let Some(e) = downcast_event::<LoadProjectEvent>(event) {
        return Some(EventResult {
            load_project: Some(e.0.clone()),
            ..Default::default()
        });
    }
    if let Some(e) = downcast_event::<ExportFramesEvent>(event) {
        return Some(EventResult {
            export_frames: Some(e.0.clone()),
            ..Default::default()
        });
    }

    None
}
