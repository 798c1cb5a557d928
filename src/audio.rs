//! rodio-backed decoder.
//!
//! rodio's output stream has to stay on the thread that opened it, so each
//! `AudioPlayer` owns a dedicated audio thread and talks to it over a
//! channel. Dropping the player stops playback and joins the thread.

mod player;
mod sink;
mod thread;
mod types;

pub use player::{AudioBackend, AudioPlayer};
