//! Player and playback events.

use crate::entities::frame::Frame;

// === Playback Control ===

#[derive(Clone, Debug)]
pub struct PlayEvent;

#[derive(Clone, Debug)]
pub struct StopEvent;

#[derive(Clone, Debug)]
pub struct TogglePlayPauseEvent;

#[derive(Clone, Debug)]
pub struct SetFpsEvent(pub i32);

// === Preview Output ===

/// One entry of a playback-cycle burst: show `frame` at `delay_ms` after the
/// cycle started.
#[derive(Clone, Debug)]
pub struct AnimationFrameEvent {
    pub index: usize,
    pub frame: Frame,
    pub delay_ms: u64,
    /// Playback generation that scheduled this frame
    pub generation: u64,
}

/// Frame whose presentation time has come (staggered by the player itself)
#[derive(Clone, Debug)]
pub struct PreviewFrameEvent {
    pub index: usize,
    pub frame: Frame,
}

/// Playback started (true) or stopped (false)
#[derive(Clone, Debug)]
pub struct PlaybackStateChangedEvent(pub bool);
