//! Commands and shared state exchanged with the audio thread.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::PlaybackError;

pub(super) type Reply<T> = Sender<Result<T, PlaybackError>>;

#[derive(Debug)]
pub(super) enum AudioCmd {
    /// Load `path` paused at the start; replies with the total duration when known.
    Open {
        path: PathBuf,
        reply: Reply<Option<Duration>>,
    },
    /// Start or resume. Restarts from the beginning once the track has ended;
    /// replies once the sink is running.
    Play { reply: Reply<()> },
    Pause,
    /// Jump to an absolute position, keeping the paused/playing state.
    Seek {
        position: Duration,
        reply: Reply<()>,
    },
    /// Stop and unload the current track.
    Stop,
    /// Stop and leave the thread.
    Quit,
}

/// Runtime playback information published by the audio thread.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    /// Position inside the loaded track.
    pub position: Duration,
    /// Set once the loaded track played to its end.
    pub finished: bool,
}

pub(super) type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
