mod actions;
mod app;
mod audio;
mod config;
mod error;
mod library;
mod logging;
mod playback;
mod runtime;
mod ui;

fn main() -> anyhow::Result<()> {
    runtime::run()
}
