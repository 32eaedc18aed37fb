//! Small engine-side types: transport state, loop mode and progress.

use crate::config::LoopModeSetting;

/// The transport state of the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Playing,
    Paused,
}

impl Default for TransportState {
    fn default() -> Self {
        Self::Stopped
    }
}

/// What auto-advance does when a track finishes. Manual next/previous always
/// wrap.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopMode {
    /// Stop after the last entry of the playlist.
    NoLoop,
    /// Wrap around to the start of the playlist.
    LoopAll,
    /// Repeat the current song when it ends.
    LoopOne,
}

impl Default for LoopMode {
    fn default() -> Self {
        Self::LoopAll
    }
}

impl LoopMode {
    /// `NoLoop -> LoopAll -> LoopOne -> NoLoop`.
    pub fn cycle(self) -> Self {
        match self {
            Self::NoLoop => Self::LoopAll,
            Self::LoopAll => Self::LoopOne,
            Self::LoopOne => Self::NoLoop,
        }
    }
}

impl From<LoopModeSetting> for LoopMode {
    fn from(setting: LoopModeSetting) -> Self {
        match setting {
            LoopModeSetting::NoLoop => Self::NoLoop,
            LoopModeSetting::LoopAll => Self::LoopAll,
            LoopModeSetting::LoopOne => Self::LoopOne,
        }
    }
}

/// Progress of the loaded track as last published by `tick`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Progress {
    pub position: f64,
    pub duration: f64,
    /// `position / duration` clamped to `0.0..=1.0`; zero when the duration
    /// is unknown.
    pub ratio: f64,
}

impl Progress {
    pub fn new(position: f64, duration: f64) -> Self {
        let position = if position.is_finite() { position.max(0.0) } else { 0.0 };
        let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        let ratio = if duration > 0.0 {
            (position / duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            position,
            duration,
            ratio,
        }
    }

    /// `MM:SS / MM:SS`.
    pub fn label(&self) -> String {
        format!("{} / {}", format_mmss(self.position), format_mmss(self.duration))
    }
}

/// What a call to `tick` did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do (not playing, or still inside the start grace period).
    Idle,
    /// Progress was refreshed.
    Progress,
    /// The finished track was followed by another one.
    Advanced,
    /// Auto-advance stopped playback.
    Stopped,
}

/// Format seconds as `MM:SS`.
pub fn format_mmss(seconds: f64) -> String {
    let secs = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
