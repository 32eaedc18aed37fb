//! The playback engine: transport state machine, playlist cursor and the
//! polling tick.
//!
//! The engine owns exactly one backend, chosen at construction. All calls are
//! made from the host's thread; the host also decides how often `tick` runs.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::audio::{Backend, BackendKind, open_backend};
use crate::config::Settings;
use crate::error::{PlaybackError, Result};
use crate::library::{title_for, title_from_filename};

use super::state::{LoopMode, Progress, TickOutcome, TransportState};

/// Resolves a display title for a track.
pub type TitleLookup = fn(&Path) -> String;
/// Checks that a track reference points at a readable file.
pub type ExistsProbe = fn(&Path) -> bool;

const DEFAULT_START_GRACE: Duration = Duration::from_millis(1500);

fn file_exists(path: &Path) -> bool {
    path.is_file()
}

pub struct Engine {
    backend: Box<dyn Backend>,

    playlist: Vec<PathBuf>,
    cursor: usize,

    state: TransportState,
    volume: f32,
    loop_mode: LoopMode,

    /// Track handed to the backend by the last successful load.
    loaded: Option<PathBuf>,
    loaded_at: Option<Instant>,
    start_grace: Duration,
    failed_advances: usize,

    now_playing: Option<String>,
    progress: Progress,

    title_lookup: TitleLookup,
    exists: ExistsProbe,
}

impl Engine {
    /// Open the backend selected by `settings` and apply the configured
    /// volume, loop mode and start grace period.
    pub fn new(settings: &Settings) -> Result<Self> {
        let backend = open_backend(settings.audio.backend)?;
        info!("playback engine ready ({} backend)", backend.kind());
        Ok(Self::with_backend(backend, settings.audio.volume)
            .with_loop_mode(settings.playback.loop_mode.into())
            .with_start_grace(Duration::from_millis(settings.playback.start_grace_ms)))
    }

    /// Build an engine around an already constructed backend.
    pub fn with_backend(backend: Box<dyn Backend>, volume: f32) -> Self {
        let mut engine = Self {
            backend,
            playlist: Vec::new(),
            cursor: 0,
            state: TransportState::Stopped,
            volume: 0.0,
            loop_mode: LoopMode::default(),
            loaded: None,
            loaded_at: None,
            start_grace: DEFAULT_START_GRACE,
            failed_advances: 0,
            now_playing: None,
            progress: Progress::default(),
            title_lookup: title_for,
            exists: file_exists,
        };
        engine.set_volume(volume);
        engine
    }

    pub fn with_start_grace(mut self, grace: Duration) -> Self {
        self.start_grace = grace;
        self
    }

    pub fn with_loop_mode(mut self, mode: LoopMode) -> Self {
        self.loop_mode = mode;
        self
    }

    pub fn with_title_lookup(mut self, lookup: TitleLookup) -> Self {
        self.title_lookup = lookup;
        self
    }

    pub fn with_exists_probe(mut self, probe: ExistsProbe) -> Self {
        self.exists = probe;
        self
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn current_index(&self) -> usize {
        self.cursor
    }

    pub fn playlist(&self) -> &[PathBuf] {
        &self.playlist
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Title of the track loaded by the last successful play.
    pub fn now_playing(&self) -> Option<&str> {
        self.now_playing.as_deref()
    }

    /// Track loaded by the last successful play, if playback wasn't stopped.
    pub fn current_track(&self) -> Option<&Path> {
        self.loaded.as_deref()
    }

    /// Replace the playlist view and reset the cursor. Playback is left alone.
    pub fn select_playlist(&mut self, view: Vec<PathBuf>) {
        debug!("playlist view replaced ({} tracks)", view.len());
        self.playlist = view;
        self.cursor = 0;
        self.failed_advances = 0;
    }

    /// Play the entry under the cursor.
    ///
    /// On failure the transport state is left as it was.
    pub fn play_current(&mut self) -> Result<()> {
        if self.playlist.is_empty() {
            return Err(PlaybackError::EmptyPlaylist);
        }
        if self.cursor >= self.playlist.len() {
            self.cursor = 0;
        }

        let path = self.playlist[self.cursor].clone();
        if !(self.exists)(&path) {
            return Err(PlaybackError::ResourceMissing(path));
        }

        self.backend.load_and_play(&path)?;
        // Some backends reset their volume on load.
        self.backend.set_volume(self.volume);

        let title = self.resolve_title(&path);
        debug!("playing #{} {:?} ({})", self.cursor, title, path.display());

        self.state = TransportState::Playing;
        self.now_playing = Some(title);
        self.loaded = Some(path);
        self.loaded_at = Some(Instant::now());
        self.progress = Progress::default();
        Ok(())
    }

    fn resolve_title(&self, path: &Path) -> String {
        let title = (self.title_lookup)(path);
        if !title.trim().is_empty() {
            return title;
        }
        title_from_filename(path)
    }

    /// Move the cursor without touching playback. Clamped to the view.
    pub fn set_cursor(&mut self, index: usize) {
        self.cursor = index.min(self.playlist.len().saturating_sub(1));
    }

    /// Move the cursor to `index` and play it.
    pub fn select_index(&mut self, index: usize) -> Result<()> {
        if self.playlist.is_empty() {
            return Err(PlaybackError::EmptyPlaylist);
        }
        self.cursor = index;
        self.play_current()
    }

    /// Pause when playing, resume when paused, start playback when stopped.
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        match self.state {
            TransportState::Paused => {
                self.backend.resume();
                self.state = TransportState::Playing;
                Ok(())
            }
            TransportState::Playing => {
                self.backend.pause();
                self.state = TransportState::Paused;
                Ok(())
            }
            TransportState::Stopped => self.play_current(),
        }
    }

    /// Halt playback. Safe to call at any time.
    pub fn stop(&mut self) {
        self.backend.stop();
        self.state = TransportState::Stopped;
        self.progress = Progress::default();
        self.loaded = None;
        self.loaded_at = None;
        self.failed_advances = 0;
    }

    /// Advance the cursor (wrapping) and play. No-op on an empty playlist.
    pub fn next(&mut self) -> Result<()> {
        let len = self.playlist.len();
        if len == 0 {
            return Ok(());
        }
        let cur = if self.cursor < len { self.cursor } else { 0 };
        self.cursor = (cur + 1) % len;
        self.play_current()
    }

    /// Retreat the cursor (wrapping) and play. No-op on an empty playlist.
    pub fn previous(&mut self) -> Result<()> {
        let len = self.playlist.len();
        if len == 0 {
            return Ok(());
        }
        let cur = if self.cursor < len { self.cursor } else { 0 };
        self.cursor = (cur + len - 1) % len;
        self.play_current()
    }

    /// Clamp to `0.0..=1.0`, store and forward to the backend. NaN is ignored.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            warn!("ignoring NaN volume");
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        self.backend.set_volume(self.volume);
    }

    /// Nudge the volume by `delta`.
    pub fn change_volume(&mut self, delta: f32) {
        self.set_volume(self.volume + delta);
    }

    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.loop_mode = mode;
    }

    pub fn cycle_loop_mode(&mut self) -> LoopMode {
        self.loop_mode = self.loop_mode.cycle();
        self.loop_mode
    }

    /// Poll the backend. Publishes progress while the track plays and
    /// auto-advances once it has finished. Never fails.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != TransportState::Playing {
            return TickOutcome::Idle;
        }

        if self.backend.is_busy() {
            self.failed_advances = 0;
            self.refresh_progress();
            return TickOutcome::Progress;
        }

        if self.within_start_grace() {
            return TickOutcome::Idle;
        }

        self.auto_advance()
    }

    fn within_start_grace(&self) -> bool {
        self.loaded_at
            .map(|at| at.elapsed() < self.start_grace)
            .unwrap_or(false)
    }

    fn refresh_progress(&mut self) {
        let position = self.backend.position_seconds();
        let duration = self.backend.duration_seconds(self.loaded.as_deref());
        self.progress = Progress::new(position, duration);
    }

    fn auto_advance(&mut self) -> TickOutcome {
        let len = self.playlist.len();
        if len == 0 {
            debug!("track finished with an empty playlist view; stopping");
            self.stop();
            return TickOutcome::Stopped;
        }

        let result = match self.loop_mode {
            LoopMode::LoopOne => self.play_current(),
            LoopMode::NoLoop if self.cursor + 1 >= len => {
                debug!("end of playlist reached; stopping");
                self.stop();
                return TickOutcome::Stopped;
            }
            LoopMode::NoLoop | LoopMode::LoopAll => self.next(),
        };

        match result {
            Ok(()) => {
                self.failed_advances = 0;
                debug!("auto-advanced to #{}", self.cursor);
                TickOutcome::Advanced
            }
            Err(e) => {
                self.failed_advances += 1;
                warn!("auto-advance failed: {e}");
                if self.failed_advances >= len {
                    warn!("no playable track in the current view; stopping");
                    self.stop();
                    TickOutcome::Stopped
                } else {
                    TickOutcome::Idle
                }
            }
        }
    }
}
