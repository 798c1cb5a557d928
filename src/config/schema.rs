use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cadenza/config.toml` or `~/.config/cadenza/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CADENZA__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub ui: UiSettings,
    pub actions: ActionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Music directory used when none is passed on the command line.
    pub root: Option<PathBuf>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Directory names whose contents are system sounds rather than music
    /// (ringtones, alarms...). Matched case-insensitively on any path component.
    pub excluded_dirs: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: None,
            extensions: vec![
                "mp3".into(),
                "flac".into(),
                "wav".into(),
                "ogg".into(),
                "m4a".into(),
            ],
            excluded_dirs: vec![
                "Ringtones".into(),
                "Notifications".into(),
                "Alarms".into(),
                "Podcasts".into(),
            ],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// How often the open player refreshes its position (milliseconds).
    pub readout_interval_ms: u64,
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Idle time after the last scrub key before playback resumes (milliseconds).
    pub scrub_release_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            readout_interval_ms: 1000,
            scrub_seconds: 5,
            scrub_release_ms: 600,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Shown instead of the list when nothing matches.
    pub empty_text: String,
    /// Shown when the music directory cannot be read.
    pub permission_denied_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ cadenza ~ ".to_string(),
            empty_text: "No songs found".to_string(),
            permission_denied_text: "Cannot read the music directory (permission denied)"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ActionSettings {
    /// Program and arguments used to share a track.
    ///
    /// Arguments may contain `{uri}`, `{path}`, `{mime}` and `{title}`.
    /// When no argument has a placeholder the URI is appended.
    pub share_command: Vec<String>,
    /// MIME hint handed to the share command.
    pub share_mime: String,
}

impl Default for ActionSettings {
    fn default() -> Self {
        Self {
            share_command: vec!["xdg-open".to_string(), "{uri}".to_string()],
            share_mime: "audio/*".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive used when `CADENZA_LOG` is not set.
    pub level: String,
    /// Log file; defaults to `$XDG_STATE_HOME/cadenza/cadenza.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
