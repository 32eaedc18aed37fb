//! The backend capability shared by every audio adapter.
//!
//! The engine only talks to `Box<dyn Backend>`; it never knows which native
//! player sits underneath.

use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::error::Result;

/// Which adapter is driving playback.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BackendKind {
    /// Accurate position/duration, pause via a toggle primitive.
    Full,
    /// Mixer-style playback, duration from file metadata.
    Degraded,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => f.write_str("full"),
            Self::Degraded => f.write_str("degraded"),
        }
    }
}

/// Uniform operations over a concrete playback engine.
///
/// All calls are synchronous and may block briefly on device I/O.
pub trait Backend {
    fn kind(&self) -> BackendKind;

    /// Stop whatever is playing, load `path` and start it from position 0.
    fn load_and_play(&mut self, path: &Path) -> Result<()>;

    /// No-op unless playing.
    fn pause(&mut self);

    /// No-op unless paused.
    fn resume(&mut self);

    /// Halt playback and reset the position. Idempotent.
    fn stop(&mut self);

    /// Clamped to `0.0..=1.0`; failures are swallowed.
    fn set_volume(&mut self, volume: f32);

    /// True iff audio is actively playing (not paused, stopped or finished).
    fn is_busy(&self) -> bool;

    /// Elapsed time of the loaded track, `0.0` when unknown.
    fn position_seconds(&self) -> f64;

    /// Length of the loaded track, `0.0` when unknown. Adapters without a
    /// native duration query read it from `fallback_hint`'s metadata.
    fn duration_seconds(&self, fallback_hint: Option<&Path>) -> f64;
}

/// Failures reported by the native players underneath the adapters.
#[derive(Debug, Error)]
pub enum NativeError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("audio device unavailable: {0}")]
    Device(String),
}

/// Convert a native millisecond reading into seconds; negatives mean unknown.
pub(crate) fn ms_to_seconds(ms: i64) -> f64 {
    if ms > 0 { ms as f64 / 1000.0 } else { 0.0 }
}
