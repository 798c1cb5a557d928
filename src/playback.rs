//! The modal player: one decoder, one open track, a queue captured when the
//! player opened and a periodic position readout.

mod controller;
mod decoder;

pub use controller::{PlaybackController, PlayerState, PlayerView, TransportIcon};
pub use decoder::{Decoder, DecoderFactory};

#[cfg(test)]
pub(crate) mod fake;
