use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::PlaybackError;
use crate::library::Track;

use super::decoder::{Decoder, DecoderFactory};

/// Where the open player is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlayerState {
    /// No decoder, nothing open.
    #[default]
    Idle,
    /// A source was assigned and is being prepared.
    Loading,
    Playing,
    Paused,
    /// The current track could not be played. Next/previous/close still work.
    Failed(String),
}

/// Icon shown on the play/pause button.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransportIcon {
    Play,
    Pause,
}

/// Everything the player popup renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerView {
    pub title: String,
    pub state: PlayerState,
    pub icon: TransportIcon,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub scrubbing: bool,
    /// Position of the open track in the captured queue.
    pub index: usize,
    pub queue_len: usize,
}

impl PlayerView {
    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.queue_len
    }
}

struct Session {
    queue: Vec<Track>,
    index: usize,
}

/// Self-rescheduling position refresh; `None` on the controller means cancelled.
struct ReadoutCycle {
    next_due: Instant,
}

/// Drives one decoder for the modal player.
///
/// The queue is captured when the player opens, so later filtering or
/// deletions in the list do not move next/previous under the user.
pub struct PlaybackController<F: DecoderFactory> {
    factory: F,
    decoder: Option<F::Decoder>,
    session: Option<Session>,
    state: PlayerState,
    position: Duration,
    duration: Option<Duration>,
    scrubbing: bool,
    readout: Option<ReadoutCycle>,
    readout_interval: Duration,
}

impl<F: DecoderFactory> PlaybackController<F> {
    pub fn new(factory: F, readout_interval: Duration) -> Self {
        Self {
            factory,
            decoder: None,
            session: None,
            state: PlayerState::Idle,
            position: Duration::ZERO,
            duration: None,
            scrubbing: false,
            readout: None,
            readout_interval: readout_interval.max(Duration::from_millis(1)),
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn is_scrubbing(&self) -> bool {
        self.scrubbing
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.session.as_ref().and_then(|s| s.queue.get(s.index))
    }

    /// True when the open player is bound to `path`.
    pub fn is_bound_to(&self, path: &Path) -> bool {
        self.current_track().is_some_and(|t| t.path == path)
    }

    pub fn icon(&self) -> TransportIcon {
        match self.state {
            PlayerState::Playing => TransportIcon::Pause,
            _ => TransportIcon::Play,
        }
    }

    /// Open the player on `queue[index]` and start playing it.
    ///
    /// A failure leaves the player open in `Failed` so the user can skip
    /// to another track or close it.
    pub fn open(
        &mut self,
        queue: Vec<Track>,
        index: usize,
        now: Instant,
    ) -> Result<(), PlaybackError> {
        if index >= queue.len() {
            debug!(index, len = queue.len(), "open ignored: index out of range");
            return Ok(());
        }
        self.session = Some(Session { queue, index });
        self.load_current(now)
    }

    /// Advance to the next track of the captured queue. No wraparound:
    /// returns `false` and changes nothing at the last track.
    pub fn next(&mut self, now: Instant) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.index + 1 >= session.queue.len() {
            return false;
        }
        session.index += 1;
        let _ = self.load_current(now);
        true
    }

    /// Step back to the previous track; `false` at the first one.
    pub fn previous(&mut self, now: Instant) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.index == 0 {
            return false;
        }
        session.index -= 1;
        let _ = self.load_current(now);
        true
    }

    fn load_current(&mut self, now: Instant) -> Result<(), PlaybackError> {
        let Some(track) = self.current_track().cloned() else {
            return Ok(());
        };

        self.state = PlayerState::Loading;
        self.position = Duration::ZERO;
        self.duration = None;
        self.scrubbing = false;
        self.readout = Some(ReadoutCycle {
            next_due: now + self.readout_interval,
        });

        let result = self.start(&track);
        match &result {
            Ok(()) => {
                info!(title = %track.title, path = %track.path.display(), "playing");
                self.state = PlayerState::Playing;
            }
            Err(e) => {
                warn!(path = %track.path.display(), error = %e, "playback failed");
                self.state = PlayerState::Failed(e.to_string());
            }
        }
        result
    }

    fn start(&mut self, track: &Track) -> Result<(), PlaybackError> {
        if self.decoder.is_none() {
            self.decoder = Some(self.factory.create()?);
        }
        let Some(decoder) = self.decoder.as_mut() else {
            return Err(PlaybackError::Disconnected);
        };
        self.duration = decoder.open(&track.path)?;
        decoder.play()
    }

    /// Play/pause button.
    pub fn toggle(&mut self) {
        let Some(decoder) = self.decoder.as_mut() else {
            return;
        };
        let result = match self.state {
            PlayerState::Playing => decoder.pause().map(|_| PlayerState::Paused),
            PlayerState::Paused => decoder.play().map(|_| PlayerState::Playing),
            _ => return,
        };
        self.scrubbing = false;
        self.apply(result);
    }

    /// The user grabbed the seek bar: playback pauses until `end_scrub`.
    pub fn begin_scrub(&mut self) {
        if self.scrubbing {
            return;
        }
        let Some(decoder) = self.decoder.as_mut() else {
            return;
        };
        let result = match self.state {
            PlayerState::Playing => decoder.pause().map(|_| PlayerState::Paused),
            PlayerState::Paused => Ok(PlayerState::Paused),
            _ => return,
        };
        self.scrubbing = true;
        self.apply(result);
    }

    /// Move the seek bar to `position` (clamped to the track length).
    pub fn scrub_to(&mut self, position: Duration) {
        if !self.scrubbing {
            return;
        }
        let Some(decoder) = self.decoder.as_mut() else {
            return;
        };
        let position = match self.duration {
            Some(total) => position.min(total),
            None => position,
        };
        match decoder.seek(position) {
            Ok(()) => self.position = position,
            Err(e) => {
                self.scrubbing = false;
                self.apply(Err(e));
            }
        }
    }

    /// The user released the seek bar: playback resumes.
    pub fn end_scrub(&mut self) {
        if !self.scrubbing {
            return;
        }
        self.scrubbing = false;
        let Some(decoder) = self.decoder.as_mut() else {
            return;
        };
        let result = decoder.play().map(|_| PlayerState::Playing);
        self.apply(result);
    }

    /// Keyboard scrubbing: starts a scrub if needed and moves relative to
    /// the current position.
    pub fn seek_by(&mut self, delta: Duration, forward: bool) {
        self.begin_scrub();
        let target = if forward {
            self.position.saturating_add(delta)
        } else {
            self.position.saturating_sub(delta)
        };
        self.scrub_to(target);
    }

    fn apply(&mut self, result: Result<PlayerState, PlaybackError>) {
        match result {
            Ok(state) => {
                debug!(?state, "player state");
                self.state = state;
            }
            Err(e) => {
                warn!(error = %e, "player command failed");
                self.state = PlayerState::Failed(e.to_string());
            }
        }
    }

    /// Close the player: stop and release the decoder and cancel the readout.
    pub fn close(&mut self) {
        if let Some(mut decoder) = self.decoder.take() {
            decoder.stop();
        }
        self.session = None;
        self.readout = None;
        self.state = PlayerState::Idle;
        self.position = Duration::ZERO;
        self.duration = None;
        self.scrubbing = false;
        debug!("player closed");
    }

    /// Run the position readout if it is due. Returns whether anything was
    /// refreshed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let interval = self.readout_interval;
        let Some(cycle) = self.readout.as_mut() else {
            return false;
        };
        if now < cycle.next_due {
            return false;
        }
        cycle.next_due += interval;
        if cycle.next_due <= now {
            cycle.next_due = now + interval;
        }

        if self.scrubbing {
            return true;
        }
        let Some(decoder) = self.decoder.as_ref() else {
            return true;
        };
        if !matches!(self.state, PlayerState::Playing | PlayerState::Paused) {
            return true;
        }

        let mut position = decoder.position();
        if let Some(total) = self.duration {
            position = position.min(total);
        }
        self.position = position;

        if self.state == PlayerState::Playing && decoder.is_finished() {
            debug!("track ended");
            self.state = PlayerState::Paused;
            if let Some(total) = self.duration {
                self.position = total;
            }
        }
        true
    }

    pub fn view(&self) -> Option<PlayerView> {
        let session = self.session.as_ref()?;
        let track = session.queue.get(session.index)?;
        Some(PlayerView {
            title: track.title.clone(),
            state: self.state.clone(),
            icon: self.icon(),
            position: self.position,
            duration: self.duration,
            scrubbing: self.scrubbing,
            index: session.index,
            queue_len: session.queue.len(),
        })
    }
}
