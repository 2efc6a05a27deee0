//! Playback scheduler for the animation preview
//!
//! **Architecture**: Player does NOT own the frames. It receives
//! `&FrameStore` when a cycle starts, so edits made between cycles show up
//! on the next pass.
//!
//! **Used by**: Editor (play/stop/toggle, host-loop tick), main_events
//!
//! # Timing Model
//!
//! FPS-based: each frame is visible for `frame_delay_ms(fps) = 1000 / fps`.
//! One outer tick (a cycle) lasts `num_frames * frame_delay_ms`.
//!
//! # Two-level scheduling
//!
//! At the start of every cycle the player emits a burst of
//! `AnimationFrameEvent { frame_i, delay = i * frame_delay }`, then presents
//! each frame itself when its offset is reached (`PreviewFrameEvent`). Hosts
//! may use either stream.
//!
//! # Cancellation
//!
//! `play()` and `stop()` bump the generation counter and drop pending
//! presentations, so no frame from a stale cycle is ever presented after
//! `stop()` returns.
//!
//! # Playback Loop
//!
//! `update()` is called by the host loop (typically 60Hz) and does all the
//! work; nothing runs between calls.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::{info, trace};

use super::error::EditorError;
use super::event_bus::EditorEmitter;
use super::frame_store::FrameStore;
use super::player_events::{AnimationFrameEvent, PlaybackStateChangedEvent, PreviewFrameEvent};
use crate::entities::frame::Frame;

/// Default preview rate
pub const DEFAULT_FPS: u32 = 12;

/// Milliseconds each frame stays visible. Rejects `fps <= 0`.
pub fn frame_delay_ms(fps: i32) -> Result<u64, EditorError> {
    if fps <= 0 {
        return Err(EditorError::InvalidFps(fps));
    }
    Ok(1000 / fps as u64)
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

/// Frame waiting for its presentation time
#[derive(Debug, Clone)]
struct PendingFrame {
    due: Instant,
    index: usize,
    frame: Frame,
    generation: u64,
}

/// Playback scheduler (does NOT own the frames)
#[derive(Debug)]
pub struct Player {
    fps: u32,
    state: PlaybackState,
    /// Timer handle: bumped on play/stop, stale pending frames are dropped
    generation: u64,
    /// Deadline of the next outer tick (None = start on next update)
    next_cycle_at: Option<Instant>,
    pending: VecDeque<PendingFrame>,
    emitter: EditorEmitter,
}

impl Player {
    pub fn new(emitter: EditorEmitter) -> Self {
        info!("Player initialized at {} fps", DEFAULT_FPS);
        Self {
            fps: DEFAULT_FPS,
            state: PlaybackState::Stopped,
            generation: 0,
            next_cycle_at: None,
            pending: VecDeque::new(),
            emitter,
        }
    }

    /// Check if playing
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Last accepted FPS
    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current per-frame delay
    pub fn delay_ms(&self) -> u64 {
        1000 / self.fps as u64
    }

    /// Outer tick length for `num_frames` frames
    pub fn cycle_period_ms(&self, num_frames: usize) -> u64 {
        num_frames as u64 * self.delay_ms()
    }

    /// Set FPS. Takes effect at the next cycle while playing.
    pub fn update_fps(&mut self, fps: i32) -> Result<(), EditorError> {
        frame_delay_ms(fps)?;
        self.fps = fps as u32;
        trace!("FPS set to {}", self.fps);
        Ok(())
    }

    /// Start playback at `fps` (Stopped -> Playing). Restarts the cycle if
    /// already playing.
    pub fn play(&mut self, fps: i32) -> Result<(), EditorError> {
        self.update_fps(fps)?;
        self.invalidate();
        self.state = PlaybackState::Playing;
        info!("Playback started at {} fps", self.fps);
        self.emitter.emit(PlaybackStateChangedEvent(true));
        Ok(())
    }

    /// Stop playback (always stops, doesn't toggle). Pending frames of the
    /// running cycle are cancelled.
    pub fn stop(&mut self) {
        if self.is_playing() {
            self.state = PlaybackState::Stopped;
            self.invalidate();
            info!("Playback stopped");
            self.emitter.emit(PlaybackStateChangedEvent(false));
        }
    }

    /// Play/pause using the last known FPS
    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.stop();
        } else {
            // fps was validated when stored
            let _ = self.play(self.fps as i32);
        }
    }

    /// Update playback state with the wall clock.
    pub fn update(&mut self, store: &FrameStore) -> Option<usize> {
        self.update_at(Instant::now(), store)
    }

    /// Update playback state at `now`.
    ///
    /// Starts a new cycle when the outer deadline has passed, then presents
    /// every due frame of the current generation. Returns the index of the
    /// last frame presented, if any.
    pub fn update_at(&mut self, now: Instant, store: &FrameStore) -> Option<usize> {
        if !self.is_playing() {
            return None;
        }

        let cycle_due = self.next_cycle_at.map(|t| now >= t).unwrap_or(true);
        if cycle_due && store.num_frames() > 0 {
            self.start_cycle(now, store);
        }

        self.present_due(now)
    }

    fn start_cycle(&mut self, now: Instant, store: &FrameStore) {
        let delay = self.delay_ms();
        let period = Duration::from_millis(self.cycle_period_ms(store.num_frames()));

        // Keep cadence when the host loop is slightly late, resync when far behind
        let cycle_start = match self.next_cycle_at {
            Some(deadline) if now.duration_since(deadline) < period => deadline,
            _ => now,
        };

        trace!(
            "Cycle start: {} frames, {} ms/frame, generation {}",
            store.num_frames(),
            delay,
            self.generation
        );

        for (index, frame) in store.frames().enumerate() {
            let delay_ms = index as u64 * delay;
            self.emitter.emit(AnimationFrameEvent {
                index,
                frame: frame.clone(),
                delay_ms,
                generation: self.generation,
            });
            self.pending.push_back(PendingFrame {
                due: cycle_start + Duration::from_millis(delay_ms),
                index,
                frame: frame.clone(),
                generation: self.generation,
            });
        }

        self.next_cycle_at = Some(cycle_start + period);
    }

    fn present_due(&mut self, now: Instant) -> Option<usize> {
        let mut presented = None;
        while let Some(next) = self.pending.front() {
            if next.due > now {
                break;
            }
            let Some(entry) = self.pending.pop_front() else {
                break;
            };
            if entry.generation != self.generation {
                continue;
            }
            presented = Some(entry.index);
            self.emitter.emit(PreviewFrameEvent {
                index: entry.index,
                frame: entry.frame,
            });
        }
        presented
    }

    /// Cancel the outer timer and every pending presentation
    fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.next_cycle_at = None;
        self.pending.clear();
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(EditorEmitter::dummy())
    }
}
