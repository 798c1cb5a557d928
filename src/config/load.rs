use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads the optional config file first and then applies
/// environment variables (prefix `CADENZA__`) on top, falling back to struct
/// defaults for anything left unset.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("CADENZA")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.playback.readout_interval_ms == 0 {
            return Err("playback.readout_interval_ms must be >= 1".to_string());
        }
        let program = self.actions.share_command.first().map(|s| s.trim());
        if program.is_none_or(str::is_empty) {
            return Err("actions.share_command needs a program".to_string());
        }
        Ok(())
    }

    /// Render the effective settings as TOML (used by `--dump-config`).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Resolve the config path from `CADENZA_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("CADENZA_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/cadenza/config.toml`
/// or `~/.config/cadenza/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("cadenza").join("config.toml"))
}

/// Default log file under `$XDG_STATE_HOME/cadenza/` or `~/.local/state/cadenza/`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("cadenza").join("cadenza.log"))
}

/// Music directory fallback: `$XDG_MUSIC_DIR`, then `~/Music`, whichever
/// exists first.
pub fn default_music_dir() -> Option<PathBuf> {
    let xdg = env::var_os("XDG_MUSIC_DIR").map(PathBuf::from);
    let home = env::var_os("HOME").map(|home| PathBuf::from(home).join("Music"));
    [xdg, home].into_iter().flatten().find(|dir| dir.is_dir())
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(dir) = env::var_os(var) {
        Some(PathBuf::from(dir))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
