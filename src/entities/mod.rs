//! Entities module - pixel frames and the drawing tools that edit them

pub mod frame;
pub mod tool;
pub mod toolbox;

pub use frame::{Color, Frame, Point};
pub use tool::{Effect, Tool, ToolKind};
pub use toolbox::Toolbox;
