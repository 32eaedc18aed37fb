//! In-memory playlists keyed by name.
//!
//! The store owns every playlist; the engine only ever sees copies handed out
//! by [`PlaylistStore::tracks`].

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Library playlist: every known track.
pub const ALL: &str = "All";
/// Built-in favourites playlist.
pub const FAVOURITE: &str = "Favourite";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Playlist name cannot be empty")]
    EmptyName,
    #[error("Playlist '{0}' already exists")]
    AlreadyExists(String),
    #[error("Playlist '{0}' does not exist")]
    NotFound(String),
    #[error("Playlist '{0}' is built in and cannot be changed this way")]
    Protected(String),
}

#[derive(Debug, Clone)]
struct Playlist {
    name: String,
    tracks: Vec<PathBuf>,
}

/// Ordered collection of named playlists. `All` and `Favourite` always exist
/// and come first.
#[derive(Debug, Clone)]
pub struct PlaylistStore {
    playlists: Vec<Playlist>,
}

impl Default for PlaylistStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaylistStore {
    pub fn new() -> Self {
        Self {
            playlists: vec![
                Playlist {
                    name: ALL.to_string(),
                    tracks: Vec::new(),
                },
                Playlist {
                    name: FAVOURITE.to_string(),
                    tracks: Vec::new(),
                },
            ],
        }
    }

    fn is_builtin(name: &str) -> bool {
        name == ALL || name == FAVOURITE
    }

    fn get(&self, name: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Playlist> {
        self.playlists.iter_mut().find(|p| p.name == name)
    }

    /// Playlist names in creation order, built-ins first.
    pub fn names(&self) -> Vec<String> {
        self.playlists.iter().map(|p| p.name.clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Copy of the tracks in `name`; empty when the playlist does not exist.
    pub fn tracks(&self, name: &str) -> Vec<PathBuf> {
        self.get(name).map(|p| p.tracks.clone()).unwrap_or_default()
    }

    pub fn len(&self, name: &str) -> usize {
        self.get(name).map(|p| p.tracks.len()).unwrap_or(0)
    }

    /// Create an empty user playlist. The name is trimmed.
    pub fn create(&mut self, name: &str) -> Result<String, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if self.contains(name) {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }
        self.playlists.push(Playlist {
            name: name.to_string(),
            tracks: Vec::new(),
        });
        Ok(name.to_string())
    }

    pub fn delete(&mut self, name: &str) -> Result<(), StoreError> {
        if Self::is_builtin(name) {
            return Err(StoreError::Protected(name.to_string()));
        }
        let before = self.playlists.len();
        self.playlists.retain(|p| p.name != name);
        if self.playlists.len() == before {
            return Err(StoreError::NotFound(name.to_string()));
        }
        Ok(())
    }

    /// Add a track to the library (`All`). Returns `false` for duplicates.
    pub fn add_to_library(&mut self, path: &Path) -> bool {
        match self.get_mut(ALL) {
            Some(all) if !all.tracks.iter().any(|t| t == path) => {
                all.tracks.push(path.to_path_buf());
                true
            }
            _ => false,
        }
    }

    /// Add `path` to a user playlist or `Favourite`. Returns `false` when it
    /// was already present.
    pub fn add(&mut self, name: &str, path: &Path) -> Result<bool, StoreError> {
        if name == ALL {
            return Err(StoreError::Protected(name.to_string()));
        }
        let playlist = self
            .get_mut(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        if playlist.tracks.iter().any(|t| t == path) {
            return Ok(false);
        }
        playlist.tracks.push(path.to_path_buf());
        Ok(true)
    }

    /// Remove `path` from a user playlist or `Favourite`. Returns `false`
    /// when it was not present.
    pub fn remove(&mut self, name: &str, path: &Path) -> Result<bool, StoreError> {
        if name == ALL {
            return Err(StoreError::Protected(name.to_string()));
        }
        let playlist = self
            .get_mut(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        let before = playlist.tracks.len();
        playlist.tracks.retain(|t| t != path);
        Ok(playlist.tracks.len() != before)
    }

    pub fn is_favourite(&self, path: &Path) -> bool {
        self.get(FAVOURITE)
            .map(|p| p.tracks.iter().any(|t| t == path))
            .unwrap_or(false)
    }

    /// Flip favourite membership. Returns the new membership.
    pub fn toggle_favourite(&mut self, path: &Path) -> bool {
        let result = if self.is_favourite(path) {
            self.remove(FAVOURITE, path).map(|_| false)
        } else {
            self.add(FAVOURITE, path)
        };
        result.unwrap_or(false)
    }
}
