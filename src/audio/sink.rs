//! Utilities for creating `rodio` sinks from file paths.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::PlaybackError;

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
///
/// Also returns the total duration of the file when it can be determined.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), PlaybackError> {
    let file = File::open(path).map_err(|e| PlaybackError::Open {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let source = Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    // Some decoders (mp3 in particular) cannot tell their length up front.
    let total = source.total_duration().or_else(|| tagged_duration(path));

    let sink = Sink::connect_new(handle.mixer());
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    sink.append(source.skip_duration(start_at));
    sink.pause();
    Ok((sink, total))
}

fn tagged_duration(path: &Path) -> Option<Duration> {
    let tagged = lofty::read_from_path(path).ok()?;
    let d = tagged.properties().duration();
    (!d.is_zero()).then_some(d)
}
