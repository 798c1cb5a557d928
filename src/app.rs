//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the current library,
//! selection, filter and the open player.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
