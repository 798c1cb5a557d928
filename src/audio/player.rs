use std::path::Path;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use crate::error::PlaybackError;
use crate::playback::{Decoder, DecoderFactory};

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// Handle to one audio thread and its output stream.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    join: Option<JoinHandle<()>>,
}

impl AudioPlayer {
    /// Spawn the audio thread and wait until the output device is open.
    pub fn spawn() -> Result<Self, PlaybackError> {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let join = spawn_audio_thread(rx, playback_info.clone(), ready_tx);
        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = join.join();
                return Err(e);
            }
            Err(_) => return Err(PlaybackError::Disconnected),
        }

        Ok(Self {
            tx,
            playback: playback_info,
            join: Some(join),
        })
    }

    fn send(&self, cmd: AudioCmd) -> Result<(), PlaybackError> {
        self.tx.send(cmd).map_err(|_| PlaybackError::Disconnected)
    }

    fn info(&self) -> PlaybackInfo {
        self.playback
            .lock()
            .map(|info| info.clone())
            .unwrap_or_default()
    }
}

impl Decoder for AudioPlayer {
    fn open(&mut self, path: &Path) -> Result<Option<Duration>, PlaybackError> {
        let (reply, rx) = mpsc::channel();
        self.send(AudioCmd::Open {
            path: path.to_path_buf(),
            reply,
        })?;
        rx.recv().map_err(|_| PlaybackError::Disconnected)?
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let (reply, rx) = mpsc::channel();
        self.send(AudioCmd::Play { reply })?;
        rx.recv().map_err(|_| PlaybackError::Disconnected)?
    }

    fn pause(&mut self) -> Result<(), PlaybackError> {
        self.send(AudioCmd::Pause)
    }

    fn seek(&mut self, position: Duration) -> Result<(), PlaybackError> {
        let (reply, rx) = mpsc::channel();
        self.send(AudioCmd::Seek { position, reply })?;
        rx.recv().map_err(|_| PlaybackError::Disconnected)?
    }

    fn position(&self) -> Duration {
        self.info().position
    }

    fn is_finished(&self) -> bool {
        self.info().finished
    }

    fn stop(&mut self) {
        let _ = self.send(AudioCmd::Stop);
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        let _ = self.tx.send(AudioCmd::Quit);
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
        debug!("audio player released");
    }
}

/// Creates rodio-backed decoders for the playback controller.
#[derive(Debug, Default, Clone, Copy)]
pub struct AudioBackend;

impl DecoderFactory for AudioBackend {
    type Decoder = AudioPlayer;

    fn create(&self) -> Result<AudioPlayer, PlaybackError> {
        AudioPlayer::spawn()
    }
}
