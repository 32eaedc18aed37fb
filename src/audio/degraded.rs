//! Degraded adapter over a mixer-style engine.
//!
//! Mixers expose play/pause/unpause/stop/volume/busy/position but cannot
//! report a track's length, so the duration is read from file metadata.

use std::path::Path;
use std::time::Duration;

use log::{debug, warn};

use crate::error::{PlaybackError, Result};

use super::types::{Backend, BackendKind, NativeError, ms_to_seconds};

/// Appended to decode failures so the user knows how to get the file playing.
pub const DECODE_REMEDIATION: &str = "The fallback mixer could not decode this file. \
Convert it to mp3, flac, wav or ogg, or make the full backend available \
(set audio.backend = \"full\" in config.toml).";

/// Mixer-style native engine.
pub trait Mixer {
    /// Replace the loaded track with `path`, paused at position 0. On error
    /// the current track is kept.
    fn load(&mut self, path: &Path) -> std::result::Result<(), NativeError>;
    fn play(&mut self);
    fn pause(&mut self);
    fn unpause(&mut self);
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
    fn busy(&self) -> bool;
    /// Milliseconds since `play`, negative when unknown.
    fn pos_ms(&self) -> i64;
}

/// Metadata lookup used for the duration fallback.
pub type DurationLookup = fn(&Path) -> Option<Duration>;

pub struct DegradedBackend<M: Mixer> {
    mixer: M,
    duration_lookup: DurationLookup,
    loaded: bool,
    paused: bool,
}

impl<M: Mixer> DegradedBackend<M> {
    pub fn new(mixer: M, duration_lookup: DurationLookup) -> Self {
        Self {
            mixer,
            duration_lookup,
            loaded: false,
            paused: false,
        }
    }
}

impl<M: Mixer> Backend for DegradedBackend<M> {
    fn kind(&self) -> BackendKind {
        BackendKind::Degraded
    }

    /// A failed load leaves the previous track playing.
    fn load_and_play(&mut self, path: &Path) -> Result<()> {
        match self.mixer.load(path) {
            Ok(()) => {}
            Err(NativeError::Decode(raw)) => {
                warn!("mixer cannot decode {}: {raw}", path.display());
                return Err(PlaybackError::UnplayableFormat {
                    path: path.to_path_buf(),
                    message: format!("{DECODE_REMEDIATION}\n\nOriginal error: {raw}"),
                });
            }
            Err(NativeError::Open { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                return Err(PlaybackError::ResourceMissing(path.to_path_buf()));
            }
            Err(e) => return Err(PlaybackError::BackendError(e.to_string())),
        }
        self.mixer.play();
        self.loaded = true;
        self.paused = false;
        debug!("degraded backend playing {}", path.display());
        Ok(())
    }

    fn pause(&mut self) {
        if self.loaded && !self.paused {
            self.mixer.pause();
            self.paused = true;
        }
    }

    fn resume(&mut self) {
        if self.loaded && self.paused {
            self.mixer.unpause();
            self.paused = false;
        }
    }

    fn stop(&mut self) {
        self.mixer.stop();
        self.loaded = false;
        self.paused = false;
    }

    fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            warn!("ignoring NaN volume");
            return;
        }
        self.mixer.set_volume(volume.clamp(0.0, 1.0));
    }

    fn is_busy(&self) -> bool {
        self.loaded && !self.paused && self.mixer.busy()
    }

    fn position_seconds(&self) -> f64 {
        if !self.loaded {
            return 0.0;
        }
        ms_to_seconds(self.mixer.pos_ms())
    }

    fn duration_seconds(&self, fallback_hint: Option<&Path>) -> f64 {
        fallback_hint
            .and_then(self.duration_lookup)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}
