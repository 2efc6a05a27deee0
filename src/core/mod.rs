//! Core engine modules - frame store, history, events, player
//!
//! These modules form the editing engine, independent of UI.

pub mod editor_events;
pub mod error;
pub mod event_bus;
pub mod frame_store;
pub mod history;
pub mod player;
pub mod player_events;

// Re-exports for convenience
pub use error::EditorError;
pub use event_bus::EventBus;
pub use frame_store::FrameStore;
pub use history::EditHistory;
pub use player::Player;
