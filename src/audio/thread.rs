use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, warn};

use crate::error::PlaybackError;

use super::sink::create_sink_at;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// How often the thread refreshes the shared position while idle on the channel.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Spawn the audio thread. `ready` receives `Ok(())` once the output device
/// is open, or the reason it could not be opened (the thread then exits).
pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    ready: Sender<Result<(), PlaybackError>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                let _ = ready.send(Err(PlaybackError::NoOutputDevice(e.to_string())));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);
        let _ = ready.send(Ok(()));

        let mut state = ThreadState {
            stream,
            playback_info,
            path: None,
            sink: None,
            offset: Duration::ZERO,
            paused: true,
        };

        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(AudioCmd::Open { path, reply }) => {
                    let _ = reply.send(state.open(path));
                }
                Ok(AudioCmd::Play { reply }) => {
                    let _ = reply.send(state.play());
                }
                Ok(AudioCmd::Pause) => state.pause(),
                Ok(AudioCmd::Seek { position, reply }) => {
                    let _ = reply.send(state.seek(position));
                }
                Ok(AudioCmd::Stop) => state.stop(),
                Ok(AudioCmd::Quit) => {
                    state.stop();
                    break;
                }
                Err(RecvTimeoutError::Timeout) => state.publish_progress(),
                Err(RecvTimeoutError::Disconnected) => {
                    state.stop();
                    break;
                }
            }
        }
        debug!("audio thread exiting");
    })
}

struct ThreadState {
    stream: OutputStream,
    playback_info: PlaybackHandle,
    path: Option<PathBuf>,
    sink: Option<Sink>,
    // Position the current sink started from; `Sink::get_pos` counts from zero
    // after a skip.
    offset: Duration,
    paused: bool,
}

impl ThreadState {
    fn open(&mut self, path: PathBuf) -> Result<Option<Duration>, PlaybackError> {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.path = None;
        self.offset = Duration::ZERO;
        self.paused = true;
        self.update_info(|info| {
            info.position = Duration::ZERO;
            info.finished = false;
        });

        let (sink, total) = create_sink_at(&self.stream, &path, Duration::ZERO).inspect_err(
            |e| warn!(path = %path.display(), error = %e, "failed to prepare track"),
        )?;
        debug!(path = %path.display(), ?total, "track prepared");
        self.sink = Some(sink);
        self.path = Some(path);
        Ok(total)
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let Some(sink) = self.sink.as_ref() else {
            return Err(PlaybackError::NotLoaded);
        };
        if sink.empty() {
            // Like a finished media player, starting again plays from the top.
            self.rebuild_at(Duration::ZERO)
                .inspect_err(|e| error!(error = %e, "failed to restart track"))?;
        }
        let Some(sink) = self.sink.as_ref() else {
            return Err(PlaybackError::NotLoaded);
        };
        sink.play();
        self.paused = false;
        self.update_info(|info| info.finished = false);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
            self.paused = true;
            let position = self.offset + s.get_pos();
            self.update_info(|info| info.position = position);
        }
    }

    fn seek(&mut self, position: Duration) -> Result<(), PlaybackError> {
        if self.sink.is_none() {
            return Err(PlaybackError::NotLoaded);
        }
        // Scrubbing: rebuild the current sink and skip into the file.
        // This uses `Source::skip_duration` (works for common formats).
        self.rebuild_at(position)?;
        if !self.paused {
            if let Some(s) = self.sink.as_ref() {
                s.play();
            }
        }
        self.update_info(|info| {
            info.position = position;
            info.finished = false;
        });
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.path = None;
        self.offset = Duration::ZERO;
        self.paused = true;
        self.update_info(|info| *info = Default::default());
    }

    fn rebuild_at(&mut self, position: Duration) -> Result<(), PlaybackError> {
        let Some(path) = self.path.clone() else {
            return Err(PlaybackError::NotLoaded);
        };
        let (sink, _) = create_sink_at(&self.stream, &path, position)?;
        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }
        self.offset = position;
        Ok(())
    }

    fn publish_progress(&mut self) {
        let Some(s) = self.sink.as_ref() else {
            return;
        };
        let position = self.offset + s.get_pos();
        let ended = !self.paused && s.empty();
        if ended {
            self.paused = true;
            debug!("track finished");
        }
        self.update_info(|info| {
            info.position = position;
            if ended {
                info.finished = true;
            }
        });
    }

    fn update_info(&self, f: impl FnOnce(&mut PlaybackInfo)) {
        if let Ok(mut info) = self.playback_info.lock() {
            f(&mut info);
        }
    }
}
