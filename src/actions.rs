//! Per-track actions offered from the list: share and delete.

use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, info, warn};
use url::Url;

use crate::config::ActionSettings;
use crate::error::ActionError;
use crate::library::Track;

/// Title handed to the share command (a chooser may show it).
pub const SHARE_TITLE: &str = "Share Music";

/// What a share target receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub uri: String,
    pub path: String,
    pub mime: String,
    pub title: String,
}

impl ShareRequest {
    pub fn for_track(track: &Track, mime: &str) -> Result<Self, ActionError> {
        let absolute = if track.path.is_absolute() {
            track.path.clone()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&track.path))
                .unwrap_or_else(|_| track.path.clone())
        };
        let uri = Url::from_file_path(&absolute).map_err(|_| ActionError::InvalidPath {
            path: track.path.clone(),
        })?;
        Ok(Self {
            uri: uri.to_string(),
            path: absolute.display().to_string(),
            mime: mime.to_string(),
            title: SHARE_TITLE.to_string(),
        })
    }
}

/// Expand `{uri}`, `{path}`, `{mime}` and `{title}` in the configured
/// command. When no argument uses a placeholder the URI is appended.
pub fn share_argv(command: &[String], request: &ShareRequest) -> Result<Vec<String>, ActionError> {
    let program = command
        .first()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .ok_or(ActionError::NoCommand)?;

    let mut used_placeholder = false;
    let mut argv = vec![program.to_string()];
    for arg in &command[1..] {
        let expanded = arg
            .replace("{uri}", &request.uri)
            .replace("{path}", &request.path)
            .replace("{mime}", &request.mime)
            .replace("{title}", &request.title);
        used_placeholder |= expanded != *arg;
        argv.push(expanded);
    }
    if !used_placeholder {
        argv.push(request.uri.clone());
    }
    Ok(argv)
}

/// Hand `track` to the configured share command and return its pid.
///
/// The command runs detached; only a failure to launch it is reported. A
/// background thread waits on the child so it never lingers as a zombie.
pub fn share(track: &Track, settings: &ActionSettings) -> Result<u32, ActionError> {
    let request = ShareRequest::for_track(track, &settings.share_mime)?;
    let argv = share_argv(&settings.share_command, &request)?;

    let mut child = Command::new(&argv[0])
        .args(&argv[1..])
        .env("CADENZA_SHARE_MIME", &request.mime)
        .env("CADENZA_SHARE_TITLE", &request.title)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| ActionError::Share {
            program: argv[0].clone(),
            source,
        })?;

    let pid = child.id();
    info!(program = %argv[0], pid, uri = %request.uri, "share launched");

    let reaper = thread::Builder::new()
        .name("share-reaper".to_string())
        .spawn(move || match child.wait() {
            Ok(status) => debug!(pid, %status, "share command exited"),
            Err(e) => warn!(pid, error = %e, "failed to wait for share command"),
        });
    if let Err(e) = reaper {
        warn!(pid, error = %e, "could not start share reaper");
    }
    Ok(pid)
}

/// Result of a successful delete.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The file was already gone; the entry should still leave the list.
    AlreadyMissing,
}

/// Remove the file behind a track.
pub fn delete_file(path: &Path) -> Result<DeleteOutcome, ActionError> {
    match fs::remove_file(path) {
        Ok(()) => {
            info!(path = %path.display(), "file deleted");
            Ok(DeleteOutcome::Deleted)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "file already missing");
            Ok(DeleteOutcome::AlreadyMissing)
        }
        Err(source) => Err(ActionError::Delete {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn request() -> ShareRequest {
        ShareRequest::for_track(&Track::new("My Song", "/music/My Song.mp3"), "audio/*").unwrap()
    }

    #[test]
    fn share_request_uses_percent_encoded_file_uri() {
        let r = request();
        assert_eq!(r.uri, "file:///music/My%20Song.mp3");
        assert_eq!(r.path, "/music/My Song.mp3");
        assert_eq!(r.mime, "audio/*");
        assert_eq!(r.title, SHARE_TITLE);
    }

    #[test]
    fn share_argv_expands_placeholders() {
        let cmd = vec![
            "kdeconnect-cli".to_string(),
            "--share".to_string(),
            "{path}".to_string(),
            "--mime={mime}".to_string(),
        ];
        assert_eq!(
            share_argv(&cmd, &request()).unwrap(),
            vec![
                "kdeconnect-cli",
                "--share",
                "/music/My Song.mp3",
                "--mime=audio/*"
            ]
        );
    }

    #[test]
    fn share_argv_appends_uri_without_placeholders() {
        let cmd = vec!["xdg-open".to_string()];
        assert_eq!(
            share_argv(&cmd, &request()).unwrap(),
            vec!["xdg-open", "file:///music/My%20Song.mp3"]
        );
    }

    #[test]
    fn share_argv_rejects_empty_command() {
        assert!(matches!(
            share_argv(&[], &request()),
            Err(ActionError::NoCommand)
        ));
        assert!(matches!(
            share_argv(&[" ".to_string()], &request()),
            Err(ActionError::NoCommand)
        ));
    }

    #[test]
    fn share_reports_missing_program() {
        let settings = ActionSettings {
            share_command: vec!["/nonexistent/cadenza-share-helper".to_string()],
            ..ActionSettings::default()
        };
        let err = share(&Track::new("x", "/music/x.mp3"), &settings).unwrap_err();
        assert!(matches!(err, ActionError::Share { .. }));
    }

    /// Linux keeps `/proc/<pid>` for a child until it has been waited on.
    #[cfg(target_os = "linux")]
    #[test]
    fn share_reaps_finished_commands() {
        use std::path::PathBuf;
        use std::time::{Duration, Instant};

        let settings = ActionSettings {
            share_command: vec!["true".to_string()],
            ..ActionSettings::default()
        };
        let pids: Vec<u32> = (0..3)
            .map(|_| share(&Track::new("x", "/music/x.mp3"), &settings).unwrap())
            .collect();

        let deadline = Instant::now() + Duration::from_secs(5);
        let lingering = |pid: &u32| PathBuf::from(format!("/proc/{pid}")).exists();
        while pids.iter().any(lingering) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(20));
        }
        let left: Vec<&u32> = pids.iter().filter(|&p| lingering(p)).collect();
        assert!(left.is_empty(), "unreaped share commands: {left:?}");
    }

    #[test]
    fn delete_file_removes_and_tolerates_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        fs::write(&path, b"x").unwrap();

        assert_eq!(delete_file(&path).unwrap(), DeleteOutcome::Deleted);
        assert!(!path.exists());
        assert_eq!(delete_file(&path).unwrap(), DeleteOutcome::AlreadyMissing);
    }

    #[test]
    fn delete_file_reports_failures() {
        let dir = tempdir().unwrap();
        // Removing a directory with remove_file fails with something other than NotFound.
        let err = delete_file(dir.path()).unwrap_err();
        assert!(matches!(err, ActionError::Delete { .. }));
    }
}
