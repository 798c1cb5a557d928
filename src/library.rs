//! Music library: scanning the music directory and the filtered track list
//! the UI presents.

mod list;
mod model;
mod scan;

pub use list::TrackList;
pub use model::Track;
pub use scan::load;

#[cfg(test)]
mod tests;
