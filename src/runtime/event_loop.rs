use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::App;
use crate::config;
use crate::playback::DecoderFactory;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// When the last keyboard scrub step happened; the scrub is released
    /// once `scrub_release_ms` passes without another one.
    pub last_scrub: Option<Instant>,
}

/// Main terminal event loop: drives the player readout, draws the UI and
/// handles input. Returns `Ok(())` when shutdown is requested.
pub fn run<F: DecoderFactory>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<F>,
    state: &mut EventLoopState,
) -> anyhow::Result<()> {
    loop {
        let now = Instant::now();
        app.player.tick(now);
        release_idle_scrub(settings, app, state, now);

        terminal.draw(|f| ui::draw(f, app, settings))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, state, Instant::now()) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn release_idle_scrub<F: DecoderFactory>(
    settings: &config::Settings,
    app: &mut App<F>,
    state: &mut EventLoopState,
    now: Instant,
) {
    let Some(at) = state.last_scrub else {
        return;
    };
    let release_after = Duration::from_millis(settings.playback.scrub_release_ms);
    if now.saturating_duration_since(at) >= release_after {
        state.last_scrub = None;
        app.player.end_scrub();
    }
}

/// Route one key press. Returns `true` when the app should quit.
fn handle_key_event<F: DecoderFactory>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App<F>,
    state: &mut EventLoopState,
    now: Instant,
) -> bool {
    if app.player.is_open() {
        state.pending_gg = false;
        handle_player_key(key, settings, app, state, now);
        return false;
    }

    if app.filter_mode {
        state.pending_gg = false;
        handle_filter_key(key, app, now);
        return false;
    }

    match key.code {
        KeyCode::Char('q') => {
            debug!("quit requested");
            return true;
        }
        KeyCode::Char('/') => {
            state.pending_gg = false;
            app.enter_filter_mode();
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            app.select_last();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.pending_gg = false;
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.pending_gg = false;
            app.prev();
        }
        KeyCode::Enter => {
            state.pending_gg = false;
            app.open_selected(now);
        }
        KeyCode::Char('S') => {
            state.pending_gg = false;
            app.share_selected(&settings.actions);
        }
        KeyCode::Char('D') => {
            state.pending_gg = false;
            app.delete_selected();
        }
        KeyCode::Char('R') => {
            state.pending_gg = false;
            app.load(&settings.library);
        }
        KeyCode::Char(_) => {
            // g pending should clear on any other printable char
            state.pending_gg = false;
        }
        _ => {}
    }

    false
}

fn handle_filter_key<F: DecoderFactory>(key: KeyEvent, app: &mut App<F>, now: Instant) {
    match key.code {
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Backspace => app.pop_filter_char(),
        KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::CONTROL) => app.next(),
        KeyCode::Char('k') if key.modifiers.contains(KeyModifiers::CONTROL) => app.prev(),
        KeyCode::Down => app.next(),
        KeyCode::Up => app.prev(),
        KeyCode::Char(c) => {
            if !c.is_control() {
                app.push_filter_char(c);
            }
        }
        KeyCode::Enter => {
            if !app.has_tracks() {
                return;
            }
            app.exit_filter_mode();
            app.open_selected(now);
        }
        _ => {}
    }
}

fn handle_player_key<F: DecoderFactory>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App<F>,
    state: &mut EventLoopState,
    now: Instant,
) {
    let scrub_step = Duration::from_secs(settings.playback.scrub_seconds);
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            state.last_scrub = None;
            app.close_player();
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => {
            state.last_scrub = None;
            app.player.toggle();
        }
        KeyCode::Char('l') => {
            state.last_scrub = None;
            app.player.next(now);
        }
        KeyCode::Char('h') => {
            state.last_scrub = None;
            app.player.previous(now);
        }
        KeyCode::Char('L') => {
            app.player.seek_by(scrub_step, true);
            state.last_scrub = app.player.is_scrubbing().then_some(now);
        }
        KeyCode::Char('H') => {
            app.player.seek_by(scrub_step, false);
            state.last_scrub = app.player.is_scrubbing().then_some(now);
        }
        KeyCode::Enter => {
            state.last_scrub = None;
            app.player.end_scrub();
        }
        _ => {}
    }
}
