//! Error types for the playback engine and its backends.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by engine and backend operations.
///
/// Everything except `NoAudioBackend` is recoverable: the engine is left in
/// the state it had before the failing call.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The active playlist view has no entries.
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// The track reference does not resolve to a readable file.
    #[error("File not found: {}", .0.display())]
    ResourceMissing(PathBuf),

    /// The backend cannot decode the resource. `message` may carry a
    /// remediation hint.
    #[error("Could not play {}: {message}", path.display())]
    UnplayableFormat { path: PathBuf, message: String },

    /// Neither backend could be constructed.
    #[error("No audio backend available (full: {full}; degraded: {degraded})")]
    NoAudioBackend { full: String, degraded: String },

    /// Catch-all for adapter-reported failures.
    #[error("Audio backend error: {0}")]
    BackendError(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
