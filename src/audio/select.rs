//! One-time backend selection with construction-time fallback.

use log::{info, warn};

use crate::config::BackendPreference;
use crate::error::{PlaybackError, Result};
use crate::library::duration_for;

use super::degraded::DegradedBackend;
use super::full::FullBackend;
use super::native::{RodioMixer, RodioPlayer};
use super::types::{Backend, NativeError};

type Built = std::result::Result<Box<dyn Backend>, NativeError>;

const NOT_ATTEMPTED: &str = "not attempted";

/// Pick a backend according to `preference`.
///
/// `Auto` tries `full` first and falls back to `degraded` on any failure.
/// There is no later re-selection.
pub fn select_backend(
    preference: BackendPreference,
    full: impl FnOnce() -> Built,
    degraded: impl FnOnce() -> Built,
) -> Result<Box<dyn Backend>> {
    let full_reason = if preference == BackendPreference::Degraded {
        NOT_ATTEMPTED.to_string()
    } else {
        match full() {
            Ok(backend) => {
                info!("using full audio backend");
                return Ok(backend);
            }
            Err(e) => {
                warn!("full audio backend unavailable: {e}");
                e.to_string()
            }
        }
    };

    let degraded_reason = if preference == BackendPreference::Full {
        NOT_ATTEMPTED.to_string()
    } else {
        match degraded() {
            Ok(backend) => {
                info!("using degraded audio backend");
                return Ok(backend);
            }
            Err(e) => e.to_string(),
        }
    };

    Err(PlaybackError::NoAudioBackend {
        full: full_reason,
        degraded: degraded_reason,
    })
}

/// Open the rodio-based backend chosen by `preference`.
pub fn open_backend(preference: BackendPreference) -> Result<Box<dyn Backend>> {
    select_backend(
        preference,
        || {
            RodioPlayer::open_default()
                .map(|player| Box::new(FullBackend::new(player)) as Box<dyn Backend>)
        },
        || {
            RodioMixer::open_default().map(|mixer| {
                Box::new(DegradedBackend::new(mixer, duration_for)) as Box<dyn Backend>
            })
        },
    )
}
