use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::AudioBackend;
use crate::config::{self, LibrarySettings};
use crate::logging;
use crate::playback::PlaybackController;

mod event_loop;
mod settings;

/// Parsed command line: `cadenza [--dump-config] [MUSIC_DIR]`.
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    dir: Option<PathBuf>,
    dump_config: bool,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut parsed = Self::default();
        for arg in args {
            if arg == "--dump-config" {
                parsed.dump_config = true;
            } else if parsed.dir.is_none() {
                parsed.dir = Some(PathBuf::from(arg));
            }
        }
        parsed
    }
}

/// Pick the music directory: command line, then `library.root`, then the
/// XDG music dir, then the current directory.
fn resolve_root(cli_dir: Option<PathBuf>, library: &LibrarySettings) -> PathBuf {
    cli_dir
        .or_else(|| library.root.clone())
        .or_else(config::default_music_dir)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn run() -> anyhow::Result<()> {
    let args = Args::parse(env::args().skip(1));
    let (settings, config_warning) = settings::load_settings();

    if args.dump_config {
        print!("{}", settings.to_toml().context("rendering settings")?);
        return Ok(());
    }

    // Logging setup failure does not stop the player.
    let _log_guard = match logging::init(&settings.logging) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("cadenza: logging disabled: {e:#}");
            None
        }
    };
    if let Some(msg) = config_warning {
        warn!("{msg}");
    }

    let root = resolve_root(args.dir, &settings.library);
    info!(root = %root.display(), "starting");

    let player = PlaybackController::new(
        AudioBackend,
        Duration::from_millis(settings.playback.readout_interval_ms),
    );
    let mut app = App::new(root, player);
    app.load(&settings.library);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(&mut terminal, &settings, &mut app, &mut state)
    };

    // Stop and join the audio thread before handing the terminal back.
    app.close_player();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("shutdown");
    run_result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Args {
        Args::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parse_reads_dir_and_flag_in_any_order() {
        assert_eq!(args(&[]), Args::default());
        assert_eq!(
            args(&["--dump-config", "/music"]),
            Args {
                dir: Some(PathBuf::from("/music")),
                dump_config: true,
            }
        );
        assert_eq!(args(&["/music", "/other"]).dir, Some(PathBuf::from("/music")));
    }

    #[test]
    fn command_line_dir_wins_over_configured_root() {
        let library = LibrarySettings {
            root: Some(PathBuf::from("/configured")),
            ..LibrarySettings::default()
        };
        assert_eq!(
            resolve_root(Some(PathBuf::from("/cli")), &library),
            PathBuf::from("/cli")
        );
        assert_eq!(resolve_root(None, &library), PathBuf::from("/configured"));
    }
}
