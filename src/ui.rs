//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, LibraryStatus};
use crate::config::Settings;
use crate::playback::{DecoderFactory, PlayerState, PlayerView, TransportIcon};

const LIST_CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter", "open player"),
    ("/", "filter"),
    ("S", "share"),
    ("D", "delete"),
    ("R", "reload"),
    ("q", "quit"),
];

const FILTER_CONTROLS: &[(&str, &str)] = &[
    ("type", "filter"),
    ("ctrl-j/k", "up/down"),
    ("enter", "accept"),
    ("esc", "clear"),
];

fn controls_line(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Render the player controls help text, incorporating scrub seconds.
fn player_controls_text(scrub_seconds: u64) -> String {
    [
        "[space/p] play/pause".to_string(),
        "[h/l] prev/next song".to_string(),
        format!("[H/L] scrub -/+{scrub_seconds}s"),
        "[enter] release scrub".to_string(),
        "[esc/q] close".to_string(),
    ]
    .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Fraction of the track already played, in `0.0..=1.0`.
fn progress_ratio(position: Duration, duration: Option<Duration>) -> f64 {
    match duration {
        Some(total) if !total.is_zero() => {
            (position.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
        }
        _ => 0.0,
    }
}

fn icon_symbol(icon: TransportIcon) -> &'static str {
    match icon {
        TransportIcon::Play => "▶",
        TransportIcon::Pause => "⏸",
    }
}

fn state_text(view: &PlayerView) -> String {
    let text = match &view.state {
        PlayerState::Idle => "Idle".to_string(),
        PlayerState::Loading => "Loading...".to_string(),
        PlayerState::Playing => "Playing".to_string(),
        PlayerState::Paused if view.scrubbing => "Scrubbing".to_string(),
        PlayerState::Paused => "Paused".to_string(),
        PlayerState::Failed(reason) => format!("Error: {reason}"),
    };
    format!("{} {}", icon_symbol(view.icon), text)
}

fn library_status_text<F: DecoderFactory>(app: &App<F>) -> String {
    match &app.library_status {
        LibraryStatus::NotLoaded => "LIBRARY: not loaded".to_string(),
        LibraryStatus::Loaded => {
            let total = app.library.snapshot().len();
            if app.library.is_filtered() {
                format!("LIBRARY: {}/{} songs", app.library.len(), total)
            } else {
                format!("LIBRARY: {total} songs")
            }
        }
        LibraryStatus::PermissionDenied => "LIBRARY: permission denied".to_string(),
        LibraryStatus::Unavailable => "LIBRARY: unavailable".to_string(),
        LibraryStatus::Error(_) => "LIBRARY: error".to_string(),
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width: width.min(r.width),
        height: height.min(r.height),
    }
}

/// Window of list rows to render so the selection stays near the middle.
///
/// Returns `(start, end, selected_in_window)`.
fn visible_window(total: usize, selected: usize, height: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

fn padded_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw<F: DecoderFactory>(frame: &mut Frame, app: &App<F>, settings: &Settings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(settings.ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cadenza ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status = {
        let mut parts: Vec<String> = vec![library_status_text(app)];

        let q = app.library.query();
        if app.filter_mode || !q.is_empty() {
            let mut filter_part = String::from("FILTER:");
            if !q.is_empty() {
                filter_part.push(' ');
                filter_part.push_str(q);
            }
            parts.push(filter_part);
        }

        if let Some(view) = app.player.view() {
            parts.push(format!("Song: {} [{}]", view.title, format_mmss(view.position)));
        }

        parts.push(format!("Dir: {}", app.root.display()));

        if let Some(msg) = &app.message {
            parts.push(msg.clone());
        }
        parts.join(" • ")
    };
    let status_par = Paragraph::new(status)
        .block(padded_block(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    draw_list(frame, app, settings, chunks[2]);

    if let Some(view) = app.player.view() {
        draw_player(frame, &view, chunks[2]);
    }

    let footer_text = if app.player.is_open() {
        player_controls_text(settings.playback.scrub_seconds)
    } else if app.filter_mode {
        controls_line(FILTER_CONTROLS)
    } else {
        controls_line(LIST_CONTROLS)
    };
    let footer = Paragraph::new(footer_text)
        .block(padded_block(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

fn draw_list<F: DecoderFactory>(frame: &mut Frame, app: &App<F>, settings: &Settings, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" tracks ");

    if app.library.is_empty() {
        let text = match app.library_status {
            LibraryStatus::PermissionDenied => settings.ui.permission_denied_text.as_str(),
            _ => settings.ui.empty_text.as_str(),
        };
        let empty = Paragraph::new(text)
            .alignment(Alignment::Center)
            .italic()
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(empty, area);
        return;
    }

    // Only build ListItems for the rows that fit.
    let total = app.library.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let (start, end, selected_in_window) = visible_window(total, app.selected, list_height);

    let items: Vec<ListItem> = app
        .library
        .iter()
        .skip(start)
        .take(end - start)
        .map(|track| ListItem::new(track.title.as_str()))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(selected_in_window));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Modal player popup, drawn over the list.
fn draw_player(frame: &mut Frame, view: &PlayerView, list_area: Rect) {
    let popup_area = centered_rect_sized(64, 8, list_area);
    frame.render_widget(Clear, popup_area);

    let block = padded_block(" player ");
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let title = Paragraph::new(Line::from(view.title.as_str()).bold());
    frame.render_widget(title, rows[0]);

    let state = Paragraph::new(state_text(view));
    frame.render_widget(state, rows[1]);

    let total = view
        .duration
        .map(format_mmss)
        .unwrap_or_else(|| "--:--".to_string());
    let gauge = Gauge::default()
        .ratio(progress_ratio(view.position, view.duration))
        .label(format!("{} / {}", format_mmss(view.position), total));
    frame.render_widget(gauge, rows[2]);

    let mut nav = format!("{}/{}", view.index + 1, view.queue_len);
    if !view.has_previous() {
        nav.push_str(" • first");
    }
    if !view.has_next() {
        nav.push_str(" • last");
    }
    frame.render_widget(Paragraph::new(nav).dim(), rows[3]);
}
