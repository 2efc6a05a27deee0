//! Editing errors returned by the core API.
//!
//! Store-level index checks are preconditions (they panic, like slice
//! indexing). These errors cover what a collaborator can legitimately get
//! wrong through the `Editor` facade.

/// Editor operation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Playback rate must be a positive number of frames per second
    InvalidFps(i32),
    FrameIndexOutOfRange { index: usize, len: usize },
    /// The document must keep at least one frame
    LastFrame,
    /// A document load produced no frames
    EmptyDocument,
    InvalidDimensions { width: u32, height: u32 },
    /// Loaded frame does not match the canvas size
    DimensionMismatch { expected: (u32, u32), found: (u32, u32) },
}

impl std::fmt::Display for EditorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorError::InvalidFps(fps) => write!(f, "Invalid FPS: {} (must be > 0)", fps),
            EditorError::FrameIndexOutOfRange { index, len } => {
                write!(f, "Frame index {} out of range (frames: {})", index, len)
            }
            EditorError::LastFrame => write!(f, "Cannot remove the last frame"),
            EditorError::EmptyDocument => write!(f, "Document has no frames"),
            EditorError::InvalidDimensions { width, height } => {
                write!(f, "Invalid canvas size: {}x{}", width, height)
            }
            EditorError::DimensionMismatch { expected, found } => write!(
                f,
                "Frame size {}x{} does not match canvas {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
        }
    }
}

impl std::error::Error for EditorError {}

/// Check index against a frame count
pub fn check_index(index: usize, len: usize) -> Result<(), EditorError> {
    if index < len {
        Ok(())
    } else {
        Err(EditorError::FrameIndexOutOfRange { index, len })
    }
}

/// Check canvas dimensions are non-zero
pub fn check_dimensions(width: u32, height: u32) -> Result<(), EditorError> {
    if width == 0 || height == 0 {
        Err(EditorError::InvalidDimensions { width, height })
    } else {
        Ok(())
    }
}
