//! Domain error types.
//!
//! Every failure the player can recover from has a variant here so the UI
//! can show it instead of crashing. Terminal and IO setup failures in the
//! runtime are carried by `anyhow` instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the music library.
#[derive(Error, Debug)]
pub enum LibraryError {
    /// The music root exists but cannot be read.
    #[error("permission denied reading {}", path.display())]
    PermissionDenied { path: PathBuf },
    /// The music root does not exist or is not a directory.
    #[error("music directory unavailable: {}", path.display())]
    Unavailable { path: PathBuf },
    /// Any other IO failure while probing the root.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors raised by the decoder or the audio thread.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),
    #[error("failed to open {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },
    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("no track loaded")]
    NotLoaded,
    #[error("audio thread is gone")]
    Disconnected,
}

/// Errors raised by per-track actions (share, delete).
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("failed to delete {}: {source}", path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to launch share command `{program}`: {source}")]
    Share {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("share command is empty")]
    NoCommand,
    #[error("cannot build a file URI for {}", path.display())]
    InvalidPath { path: PathBuf },
}
