//! Native players built on `rodio`.
//!
//! `RodioPlayer` plays the media-player role (toggle pause, decoder-reported
//! length); `RodioMixer` plays the mixer role (distinct pause/unpause, no
//! length).

use std::path::Path;
use std::time::Duration;

use rodio::{OutputStream, Sink};

use super::degraded::Mixer;
use super::full::MediaPlayer;
use super::sink::{create_sink, millis, open_stream};
use super::types::NativeError;

pub struct RodioPlayer {
    stream: OutputStream,
    sink: Option<Sink>,
    length: Option<Duration>,
    volume: f32,
}

impl RodioPlayer {
    pub fn open_default() -> Result<Self, NativeError> {
        Ok(Self {
            stream: open_stream()?,
            sink: None,
            length: None,
            volume: 1.0,
        })
    }
}

impl MediaPlayer for RodioPlayer {
    fn open(&mut self, path: &Path) -> Result<(), NativeError> {
        let (sink, length) = create_sink(&self.stream, path)?;
        sink.set_volume(self.volume);
        MediaPlayer::stop(self);
        sink.play();
        self.sink = Some(sink);
        self.length = length;
        Ok(())
    }

    fn toggle_pause(&mut self) {
        if let Some(ref s) = self.sink {
            if s.is_paused() {
                s.play();
            } else {
                s.pause();
            }
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.length = None;
    }

    fn set_volume_percent(&mut self, percent: u8) {
        self.volume = f32::from(percent.min(100)) / 100.0;
        if let Some(ref s) = self.sink {
            s.set_volume(self.volume);
        }
    }

    fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .map(|s| !s.is_paused() && !s.empty())
            .unwrap_or(false)
    }

    fn time_ms(&self) -> i64 {
        self.sink.as_ref().map(|s| millis(s.get_pos())).unwrap_or(-1)
    }

    fn length_ms(&self) -> i64 {
        self.length.map(millis).unwrap_or(-1)
    }
}

pub struct RodioMixer {
    stream: OutputStream,
    sink: Option<Sink>,
    volume: f32,
}

impl RodioMixer {
    pub fn open_default() -> Result<Self, NativeError> {
        Ok(Self {
            stream: open_stream()?,
            sink: None,
            volume: 1.0,
        })
    }
}

impl Mixer for RodioMixer {
    fn load(&mut self, path: &Path) -> Result<(), NativeError> {
        // Mixers don't report a length.
        let (sink, _) = create_sink(&self.stream, path)?;
        sink.set_volume(self.volume);
        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }
        Ok(())
    }

    fn play(&mut self) {
        if let Some(ref s) = self.sink {
            s.play();
        }
    }

    fn pause(&mut self) {
        if let Some(ref s) = self.sink {
            s.pause();
        }
    }

    fn unpause(&mut self) {
        if let Some(ref s) = self.sink {
            s.play();
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(ref s) = self.sink {
            s.set_volume(volume);
        }
    }

    fn busy(&self) -> bool {
        self.sink
            .as_ref()
            .map(|s| !s.is_paused() && !s.empty())
            .unwrap_or(false)
    }

    fn pos_ms(&self) -> i64 {
        self.sink.as_ref().map(|s| millis(s.get_pos())).unwrap_or(-1)
    }
}
