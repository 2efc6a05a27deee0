//! Canvas, tool and timeline events.

use std::path::PathBuf;

use crate::entities::frame::{Color, Frame, Point};
use crate::entities::tool::ToolKind;

// === Canvas Input (already in frame-pixel space) ===

#[derive(Clone, Debug)]
pub struct DrawPressedEvent(pub Point);

#[derive(Clone, Debug)]
pub struct DrawMovedEvent(pub Point);

#[derive(Clone, Debug)]
pub struct DrawReleasedEvent(pub Point);

#[derive(Clone, Debug)]
pub struct UndoEvent;

#[derive(Clone, Debug)]
pub struct RedoEvent;

// === Tools ===

#[derive(Clone, Debug)]
pub struct SelectToolEvent(pub ToolKind);

#[derive(Clone, Debug)]
pub struct SetBrushSettingsEvent {
    pub size: u32,
    pub color: Color,
}

#[derive(Clone, Debug)]
pub struct SetPenColorEvent(pub Color);

// === Timeline ===

#[derive(Clone, Debug)]
pub struct AddFrameEvent;

#[derive(Clone, Debug)]
pub struct DeleteFrameEvent(pub usize);

#[derive(Clone, Debug)]
pub struct MoveFrameEvent {
    pub from: usize,
    pub to: usize,
}

#[derive(Clone, Debug)]
pub struct SetCurrentFrameEvent(pub usize);

#[derive(Clone, Debug)]
pub struct ResizeCanvasEvent {
    pub width: u32,
    pub height: u32,
}

// === Document ===

#[derive(Clone, Debug)]
pub struct NewDocumentEvent {
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug)]
pub struct SaveProjectEvent(pub PathBuf);

#[derive(Clone, Debug)]
pub struct LoadProjectEvent(pub PathBuf);

#[derive(Clone, Debug)]
pub struct ExportFramesEvent(pub PathBuf);

// === Output ===

/// Canvas must redraw with this frame
#[derive(Clone, Debug)]
pub struct CanvasRefreshEvent(pub Frame);

/// Brush color shown in tool chrome changed
#[derive(Clone, Debug)]
pub struct ColorChangedEvent(pub Color);

#[derive(Clone, Debug)]
pub struct ToolChangedEvent(pub ToolKind);

/// Frame list changed (count or current index)
#[derive(Clone, Debug)]
pub struct FramesChangedEvent {
    pub num_frames: usize,
    pub current: usize,
}
