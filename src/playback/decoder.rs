use std::path::Path;
use std::time::Duration;

use crate::error::PlaybackError;

/// A single-track audio decoder.
///
/// `open` is synchronous: when it returns `Ok` the track is prepared and
/// paused at the start. Opening again replaces whatever was loaded.
pub trait Decoder {
    /// Load `path`, returning its total duration when known.
    fn open(&mut self, path: &Path) -> Result<Option<Duration>, PlaybackError>;
    /// Start or resume. After the track ended this restarts it.
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self) -> Result<(), PlaybackError>;
    /// Jump to `position`, keeping the playing/paused state.
    fn seek(&mut self, position: Duration) -> Result<(), PlaybackError>;
    fn position(&self) -> Duration;
    /// True once the loaded track played to its end.
    fn is_finished(&self) -> bool;
    fn stop(&mut self);
}

/// Builds decoders on demand; the controller creates one when the player
/// opens and drops it on close.
pub trait DecoderFactory {
    type Decoder: Decoder;

    fn create(&self) -> Result<Self::Decoder, PlaybackError>;
}
