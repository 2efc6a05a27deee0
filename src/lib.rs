//! SPRITED - Frame-by-frame sprite animation editor library
//!
//! Re-exports all modules for use by binary targets.

// Core engine (frame store, history, events, player)
pub mod core;

// App modules
pub mod cli;
pub mod config;
pub mod editor;
pub mod entities;
pub mod main_events;
pub mod project_io;

// Re-export commonly used types from core
pub use core::error::EditorError;
pub use core::event_bus::{BoxedEvent, EditorEmitter, EventBus, EventEmitter, downcast_event};
pub use core::frame_store::FrameStore;
pub use core::history::EditHistory;
pub use core::player::Player;
pub use editor::Editor;

// Re-export entities
pub use entities::{Color, Frame, Point, Tool, ToolKind, Toolbox};
