//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive runtime
//! behavior and helpers to resolve the paths the player works with.

mod load;
mod schema;

pub use load::{default_log_path, default_music_dir};
pub use schema::*;
