//! Application model: `App` and `LibraryStatus`.
//!
//! The `App` struct holds the loaded library, the list selection, the
//! filter state and the modal player.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, warn};

use crate::actions::{self, DeleteOutcome};
use crate::audio::AudioBackend;
use crate::config::{ActionSettings, LibrarySettings};
use crate::error::LibraryError;
use crate::library::{self, Track, TrackList};
use crate::playback::{DecoderFactory, PlaybackController};

/// Outcome of the last library load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LibraryStatus {
    /// Nothing loaded yet.
    #[default]
    NotLoaded,
    Loaded,
    /// The music directory exists but may not be read.
    PermissionDenied,
    /// The music directory is missing.
    Unavailable,
    /// Any other read failure.
    Error(String),
}

impl From<&LibraryError> for LibraryStatus {
    fn from(e: &LibraryError) -> Self {
        match e {
            LibraryError::PermissionDenied { .. } => LibraryStatus::PermissionDenied,
            LibraryError::Unavailable { .. } => LibraryStatus::Unavailable,
            LibraryError::Io { .. } => LibraryStatus::Error(e.to_string()),
        }
    }
}

/// The main application model.
pub struct App<F: DecoderFactory = AudioBackend> {
    pub library: TrackList,
    pub library_status: LibraryStatus,
    pub root: PathBuf,
    /// Selected position in the current (possibly filtered) view.
    pub selected: usize,
    pub filter_mode: bool,
    pub player: PlaybackController<F>,
    /// One-line feedback for the last action.
    pub message: Option<String>,
}

impl<F: DecoderFactory> App<F> {
    pub fn new(root: PathBuf, player: PlaybackController<F>) -> Self {
        Self {
            library: TrackList::default(),
            library_status: LibraryStatus::NotLoaded,
            root,
            selected: 0,
            filter_mode: false,
            player,
            message: None,
        }
    }

    /// (Re)load the library from `root`. An unreadable root leaves an empty
    /// list and an explicit status instead of an error.
    pub fn load(&mut self, settings: &LibrarySettings) {
        match library::load(&self.root, settings) {
            Ok(tracks) => {
                self.library.replace(tracks);
                self.library_status = LibraryStatus::Loaded;
                self.message = Some(format!("{} songs", self.library.snapshot().len()));
            }
            Err(e) => {
                self.library.replace(Vec::new());
                self.library_status = LibraryStatus::from(&e);
                self.message = Some(e.to_string());
            }
        }
        self.ensure_selected_visible();
    }

    /// Return true if the current view has any tracks.
    pub fn has_tracks(&self) -> bool {
        !self.library.is_empty()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.library.get(self.selected)
    }

    /// Enter filter mode: keystrokes edit the query.
    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
    }
    /// Leave filter mode, keeping the query applied.
    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }
    /// Clear the active filter and restore the full list.
    pub fn clear_filter(&mut self) {
        self.filter_mode = false;
        self.library.apply_filter("");
        self.ensure_selected_visible();
    }
    /// Append a character to the filter query and refresh view.
    pub fn push_filter_char(&mut self, c: char) {
        let mut query = self.library.query().to_string();
        query.push(c);
        self.set_filter(&query);
    }
    /// Remove the last character from the filter query and refresh view.
    pub fn pop_filter_char(&mut self) {
        let mut query = self.library.query().to_string();
        query.pop();
        self.set_filter(&query);
    }

    fn set_filter(&mut self, query: &str) {
        self.library.apply_filter(query);
        self.selected = 0;
    }

    /// Keep `selected` inside the current view.
    fn ensure_selected_visible(&mut self) {
        let len = self.library.len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Move selection to the next visible track, wrapping to the top.
    pub fn next(&mut self) {
        let len = self.library.len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move selection to the previous visible track, wrapping to the bottom.
    pub fn prev(&mut self) {
        let len = self.library.len();
        if len > 0 {
            self.selected = if self.selected == 0 {
                len - 1
            } else {
                self.selected - 1
            };
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.library.len().saturating_sub(1);
    }

    /// Open the player on the selected track, with the current view as its
    /// next/previous queue.
    pub fn open_selected(&mut self, now: Instant) {
        if !self.has_tracks() {
            return;
        }
        let queue = self.library.visible();
        if let Err(e) = self.player.open(queue, self.selected, now) {
            self.message = Some(e.to_string());
        }
    }

    pub fn close_player(&mut self) {
        self.player.close();
    }

    pub fn share_selected(&mut self, settings: &ActionSettings) {
        let Some(track) = self.selected_track().cloned() else {
            return;
        };
        self.message = Some(match actions::share(&track, settings) {
            Ok(_) => format!("Shared \"{}\"", track.title),
            Err(e) => {
                warn!(error = %e, "share failed");
                e.to_string()
            }
        });
    }

    /// Delete the selected track's file and drop it from the list.
    ///
    /// The entry stays when the file could not be removed. A player bound
    /// to that file is closed first.
    pub fn delete_selected(&mut self) {
        let Some(track) = self.selected_track().cloned() else {
            return;
        };
        if self.player.is_bound_to(&track.path) {
            self.player.close();
        }

        match actions::delete_file(&track.path) {
            Ok(outcome) => {
                self.library.remove_visible(self.selected);
                self.ensure_selected_visible();
                info!(title = %track.title, ?outcome, "track removed from library");
                self.message = Some(match outcome {
                    DeleteOutcome::Deleted => format!("Deleted \"{}\"", track.title),
                    DeleteOutcome::AlreadyMissing => {
                        format!("\"{}\" was already gone", track.title)
                    }
                });
            }
            Err(e) => {
                warn!(error = %e, "delete failed");
                self.message = Some(e.to_string());
            }
        }
    }
}
