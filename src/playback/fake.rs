//! In-memory decoder used by the controller and app tests.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use crate::error::PlaybackError;

use super::decoder::{Decoder, DecoderFactory};

#[derive(Debug, Default)]
pub(crate) struct FakeState {
    pub events: Vec<String>,
    pub loaded: Option<PathBuf>,
    pub playing: bool,
    pub position: Duration,
    pub finished: bool,
    pub created: usize,
    pub released: usize,
    pub broken: Vec<PathBuf>,
    pub no_device: bool,
    pub fail_play: bool,
}

#[derive(Clone, Default)]
pub(crate) struct FakeFactory {
    pub state: Rc<RefCell<FakeState>>,
}

impl FakeFactory {
    pub fn events(&self) -> Vec<String> {
        self.state.borrow().events.clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        f(&mut self.state.borrow_mut())
    }
}

pub(crate) struct FakeDecoder {
    state: Rc<RefCell<FakeState>>,
}

impl DecoderFactory for FakeFactory {
    type Decoder = FakeDecoder;

    fn create(&self) -> Result<FakeDecoder, PlaybackError> {
        let mut s = self.state.borrow_mut();
        if s.no_device {
            return Err(PlaybackError::NoOutputDevice("fake".to_string()));
        }
        s.created += 1;
        s.events.push("create".to_string());
        Ok(FakeDecoder {
            state: self.state.clone(),
        })
    }
}

impl Decoder for FakeDecoder {
    fn open(&mut self, path: &Path) -> Result<Option<Duration>, PlaybackError> {
        let mut s = self.state.borrow_mut();
        s.events.push(format!("open {}", path.display()));
        s.playing = false;
        s.position = Duration::ZERO;
        s.finished = false;
        if s.broken.iter().any(|p| p == path) {
            s.loaded = None;
            return Err(PlaybackError::Decode {
                path: path.to_path_buf(),
                reason: "corrupt".to_string(),
            });
        }
        s.loaded = Some(path.to_path_buf());
        Ok(Some(Duration::from_secs(180)))
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let mut s = self.state.borrow_mut();
        s.events.push("play".to_string());
        if s.fail_play {
            return Err(PlaybackError::NotLoaded);
        }
        s.playing = true;
        s.finished = false;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlaybackError> {
        let mut s = self.state.borrow_mut();
        s.events.push("pause".to_string());
        s.playing = false;
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<(), PlaybackError> {
        let mut s = self.state.borrow_mut();
        s.events.push(format!("seek {}", position.as_secs()));
        s.position = position;
        Ok(())
    }

    fn position(&self) -> Duration {
        self.state.borrow().position
    }

    fn is_finished(&self) -> bool {
        self.state.borrow().finished
    }

    fn stop(&mut self) {
        let mut s = self.state.borrow_mut();
        s.events.push("stop".to_string());
        s.playing = false;
        s.loaded = None;
    }
}

impl Drop for FakeDecoder {
    fn drop(&mut self) {
        let mut s = self.state.borrow_mut();
        s.released += 1;
        s.events.push("release".to_string());
    }
}
