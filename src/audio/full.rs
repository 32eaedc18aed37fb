//! Full-featured adapter over a media-player style engine.
//!
//! The native player only knows a pause *toggle*. The adapter remembers the
//! last commanded state so that `pause()` and `resume()` behave as two
//! distinct, idempotent calls.

use std::path::Path;

use log::{debug, warn};

use crate::error::{PlaybackError, Result};

use super::types::{Backend, BackendKind, NativeError, ms_to_seconds};

/// Media-player style native engine (set media, play, toggle pause).
pub trait MediaPlayer {
    /// Replace the current media with `path` and start playing it. On error
    /// the current media keeps playing.
    fn open(&mut self, path: &Path) -> std::result::Result<(), NativeError>;
    fn toggle_pause(&mut self);
    fn stop(&mut self);
    fn set_volume_percent(&mut self, percent: u8);
    fn is_playing(&self) -> bool;
    /// Elapsed milliseconds, negative when unknown.
    fn time_ms(&self) -> i64;
    /// Media length in milliseconds, negative when unknown.
    fn length_ms(&self) -> i64;
}

pub struct FullBackend<P: MediaPlayer> {
    player: P,
    loaded: bool,
    paused: bool,
}

impl<P: MediaPlayer> FullBackend<P> {
    pub fn new(player: P) -> Self {
        Self {
            player,
            loaded: false,
            paused: false,
        }
    }
}

impl<P: MediaPlayer> Backend for FullBackend<P> {
    fn kind(&self) -> BackendKind {
        BackendKind::Full
    }

    /// A failed open leaves the previous track playing.
    fn load_and_play(&mut self, path: &Path) -> Result<()> {
        match self.player.open(path) {
            Ok(()) => {
                self.loaded = true;
                self.paused = false;
                debug!("full backend playing {}", path.display());
                Ok(())
            }
            Err(NativeError::Open { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Err(PlaybackError::ResourceMissing(path.to_path_buf()))
            }
            Err(NativeError::Decode(message)) => Err(PlaybackError::UnplayableFormat {
                path: path.to_path_buf(),
                message,
            }),
            Err(e) => Err(PlaybackError::BackendError(e.to_string())),
        }
    }

    fn pause(&mut self) {
        if self.loaded && !self.paused {
            self.player.toggle_pause();
            self.paused = true;
        }
    }

    fn resume(&mut self) {
        if self.loaded && self.paused {
            self.player.toggle_pause();
            self.paused = false;
        }
    }

    fn stop(&mut self) {
        self.player.stop();
        self.loaded = false;
        self.paused = false;
    }

    fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            warn!("ignoring NaN volume");
            return;
        }
        let percent = (volume.clamp(0.0, 1.0) * 100.0).round() as u8;
        self.player.set_volume_percent(percent);
    }

    fn is_busy(&self) -> bool {
        self.loaded && !self.paused && self.player.is_playing()
    }

    fn position_seconds(&self) -> f64 {
        if !self.loaded {
            return 0.0;
        }
        ms_to_seconds(self.player.time_ms())
    }

    fn duration_seconds(&self, _fallback_hint: Option<&Path>) -> f64 {
        if !self.loaded {
            return 0.0;
        }
        ms_to_seconds(self.player.length_ms())
    }
}
