//! Application model: the playlist store, the visible view, list selection
//! and the status message, wrapped around the playback engine.
//!
//! The runtime maps keys onto the methods here; the UI only reads.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::engine::{Engine, LoopMode, TickOutcome, TitleLookup};
use crate::error::Result;
use crate::library::{ALL, FAVOURITE, PlaylistStore, title_for};

/// What the text prompt is collecting.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Name of a playlist to create.
    NewPlaylist,
    /// Name of the playlist the selected track is added to.
    AddToPlaylist,
}

impl Prompt {
    pub fn label(self) -> &'static str {
        match self {
            Self::NewPlaylist => "New playlist",
            Self::AddToPlaylist => "Add to playlist",
        }
    }
}

/// Text being typed into a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub prompt: Prompt,
    pub buffer: String,
}

/// The main application model.
pub struct App {
    pub engine: Engine,
    pub store: PlaylistStore,

    /// Name of the playlist whose tracks are shown and handed to the engine.
    pub playlist: String,
    /// Snapshot of `playlist` taken when it was selected.
    pub view: Vec<PathBuf>,
    pub selected: usize,

    /// Last error or notice, shown in the status box.
    pub message: Option<String>,
    pub current_dir: Option<String>,
    /// Open prompt; keys go to it instead of the transport.
    pub input: Option<Input>,

    titles: HashMap<PathBuf, String>,
    title_lookup: TitleLookup,
}

impl App {
    /// Create an `App` showing the `All` playlist of `store`.
    pub fn new(engine: Engine, store: PlaylistStore) -> Self {
        Self::with_title_lookup(engine, store, title_for)
    }

    pub fn with_title_lookup(engine: Engine, store: PlaylistStore, lookup: TitleLookup) -> Self {
        let mut app = Self {
            engine,
            store,
            playlist: ALL.to_string(),
            view: Vec::new(),
            selected: 0,
            message: None,
            current_dir: None,
            input: None,
            titles: HashMap::new(),
            title_lookup: lookup,
        };
        app.select_playlist(ALL);
        app
    }

    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    pub fn has_tracks(&self) -> bool {
        !self.view.is_empty()
    }

    /// Cached display title of `path`.
    pub fn title(&self, path: &Path) -> &str {
        self.titles.get(path).map(String::as_str).unwrap_or("")
    }

    /// Index in `view` of the track the engine has loaded, if it is shown.
    pub fn now_playing_index(&self) -> Option<usize> {
        let current = self.engine.current_track()?;
        if self.view.get(self.engine.current_index()).map(PathBuf::as_path) == Some(current) {
            Some(self.engine.current_index())
        } else {
            self.view.iter().position(|p| p == current)
        }
    }

    /// Show `name` and hand its tracks to the engine. Unknown names are
    /// reported in the status box.
    pub fn select_playlist(&mut self, name: &str) {
        if !self.store.contains(name) {
            self.message = Some(format!("No playlist named {name:?}"));
            return;
        }
        self.playlist = name.to_string();
        self.load_view();
        self.engine.select_playlist(self.view.clone());
        self.selected = 0;
    }

    /// Switch to the playlist after the active one, wrapping around.
    pub fn next_playlist(&mut self) {
        let names = self.store.names();
        let pos = names.iter().position(|n| *n == self.playlist).unwrap_or(0);
        let next = names[(pos + 1) % names.len()].clone();
        self.select_playlist(&next);
        self.message = Some(format!("Playlist: {next}"));
    }

    fn load_view(&mut self) {
        self.view = self.store.tracks(&self.playlist);
        for path in &self.view {
            if !self.titles.contains_key(path) {
                self.titles.insert(path.clone(), (self.title_lookup)(path));
            }
        }
        if self.selected >= self.view.len() {
            self.selected = self.view.len().saturating_sub(1);
        }
    }

    /// Re-read the active playlist after an edit without moving playback:
    /// the engine cursor stays on the loaded track while it is in the view.
    /// Otherwise a removal at or before the cursor shifts it back by one.
    fn refresh_view(&mut self, removed: Option<usize>) {
        let cursor = self.engine.current_index();
        self.load_view();
        self.engine.select_playlist(self.view.clone());

        let playing = self
            .engine
            .current_track()
            .and_then(|t| self.view.iter().position(|p| p == t));
        let cursor = match (playing, removed) {
            (Some(pos), _) => pos,
            (None, Some(index)) if index <= cursor && cursor > 0 => cursor - 1,
            (None, _) => cursor,
        };
        self.engine.set_cursor(cursor);
    }

    /// Create an empty playlist named `name`.
    pub fn create_playlist(&mut self, name: &str) {
        self.message = Some(match self.store.create(name) {
            Ok(name) => {
                info!("created playlist {name:?}");
                format!("Playlist '{name}' created")
            }
            Err(e) => e.to_string(),
        });
    }

    /// Delete the active playlist and fall back to `All`.
    pub fn delete_current_playlist(&mut self) {
        let name = self.playlist.clone();
        match self.store.delete(&name) {
            Ok(()) => {
                info!("deleted playlist {name:?}");
                self.select_playlist(ALL);
                self.message = Some(format!("Playlist '{name}' deleted"));
            }
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    /// Add the selected track to playlist `name`.
    pub fn add_selected_to(&mut self, name: &str) {
        let Some(path) = self.view.get(self.selected).cloned() else {
            return;
        };
        let name = name.trim();
        match self.store.add(name, &path) {
            Ok(true) => {
                self.message = Some(format!("Added to '{name}'"));
                if self.playlist == name {
                    self.refresh_view(None);
                }
            }
            Ok(false) => self.message = Some(format!("Already in '{name}'")),
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    /// Remove the selected track from the active playlist.
    pub fn remove_selected(&mut self) {
        let index = self.selected;
        let Some(path) = self.view.get(index).cloned() else {
            return;
        };
        let name = self.playlist.clone();
        match self.store.remove(&name, &path) {
            Ok(true) => {
                self.refresh_view(Some(index));
                self.message = Some(format!("Removed from '{name}'"));
            }
            Ok(false) => {}
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    pub fn begin_input(&mut self, prompt: Prompt) {
        if prompt == Prompt::AddToPlaylist && !self.has_tracks() {
            return;
        }
        self.input = Some(Input {
            prompt,
            buffer: String::new(),
        });
    }

    pub fn push_input_char(&mut self, c: char) {
        if let Some(input) = self.input.as_mut() {
            input.buffer.push(c);
        }
    }

    pub fn pop_input_char(&mut self) {
        if let Some(input) = self.input.as_mut() {
            input.buffer.pop();
        }
    }

    pub fn cancel_input(&mut self) {
        self.input = None;
    }

    /// Close the prompt and run its action on the typed text.
    pub fn submit_input(&mut self) {
        let Some(input) = self.input.take() else {
            return;
        };
        match input.prompt {
            Prompt::NewPlaylist => self.create_playlist(&input.buffer),
            Prompt::AddToPlaylist => self.add_selected_to(&input.buffer),
        }
    }

    /// Move selection down one row.
    pub fn next(&mut self) {
        if self.selected + 1 < self.view.len() {
            self.selected += 1;
        }
    }

    /// Move selection up one row.
    pub fn prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn play_selected(&mut self) {
        let result = self.engine.select_index(self.selected);
        self.report(result);
    }

    pub fn toggle_play_pause(&mut self) {
        let result = self.engine.toggle_play_pause();
        self.report(result);
    }

    pub fn stop(&mut self) {
        self.engine.stop();
        self.message = None;
    }

    pub fn next_track(&mut self) {
        let result = self.engine.next();
        self.report(result);
    }

    pub fn previous_track(&mut self) {
        let result = self.engine.previous();
        self.report(result);
    }

    pub fn change_volume(&mut self, delta: f32) {
        self.engine.change_volume(delta);
        self.message = Some(format!("Volume: {:.0}%", self.engine.volume() * 100.0));
    }

    pub fn cycle_loop_mode(&mut self) {
        let mode = self.engine.cycle_loop_mode();
        self.message = Some(format!("Loop: {}", loop_mode_label(mode)));
    }

    /// Add or remove the selected track from `Favourite`.
    pub fn toggle_favourite(&mut self) {
        let Some(path) = self.view.get(self.selected).cloned() else {
            return;
        };
        let now_favourite = self.store.toggle_favourite(&path);
        let title = self.title(&path).to_string();
        self.message = Some(if now_favourite {
            format!("Added to {FAVOURITE}: {title}")
        } else {
            format!("Removed from {FAVOURITE}: {title}")
        });
        if self.playlist == FAVOURITE {
            let removed = (!now_favourite).then_some(self.selected);
            self.refresh_view(removed);
        }
    }

    /// Drive the engine once and keep the selection on the playing track.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.engine.tick();
        match outcome {
            TickOutcome::Advanced => {
                self.selected = self.engine.current_index();
                self.message = None;
            }
            TickOutcome::Stopped => {
                info!("playback stopped by auto-advance");
                self.message = Some("Playback stopped".to_string());
            }
            TickOutcome::Idle | TickOutcome::Progress => {}
        }
        outcome
    }

    /// Follow the engine cursor on success, surface the error otherwise.
    fn report(&mut self, result: Result<()>) {
        match result {
            Ok(()) => {
                self.selected = self.engine.current_index();
                self.message = None;
            }
            Err(e) => {
                warn!("{e}");
                self.message = Some(e.to_string());
            }
        }
    }
}

pub fn loop_mode_label(mode: LoopMode) -> &'static str {
    match mode {
        LoopMode::NoLoop => "No-loop",
        LoopMode::LoopAll => "Loop-around",
        LoopMode::LoopOne => "Repeat-one",
    }
}
