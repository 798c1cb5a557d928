use std::fs;
use std::io;
use std::path::Path;

use lofty::prelude::{Accessor, TaggedFileExt};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::LibraryError;

use super::model::Track;

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Directories holding ringtones, alarms and the like are not music.
fn is_excluded_dir(path: &Path, settings: &LibrarySettings) -> bool {
    let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
        return false;
    };
    settings
        .excluded_dirs
        .iter()
        .any(|d| d.trim().eq_ignore_ascii_case(name))
}

fn tag_title(path: &Path) -> Option<String> {
    let tagged = lofty::read_from_path(path).ok()?;
    let tag = tagged.primary_tag().or_else(|| tagged.first_tag())?;
    let title = tag.title()?;
    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Check that `root` is a readable directory.
fn check_root_access(root: &Path) -> Result<(), LibraryError> {
    let meta = match fs::metadata(root) {
        Ok(m) => m,
        Err(e) => return Err(classify(root, e)),
    };
    if !meta.is_dir() {
        return Err(LibraryError::Unavailable {
            path: root.to_path_buf(),
        });
    }
    fs::read_dir(root).map(|_| ()).map_err(|e| classify(root, e))
}

fn classify(root: &Path, e: io::Error) -> LibraryError {
    let path = root.to_path_buf();
    match e.kind() {
        io::ErrorKind::PermissionDenied => LibraryError::PermissionDenied { path },
        io::ErrorKind::NotFound => LibraryError::Unavailable { path },
        _ => LibraryError::Io { path, source: e },
    }
}

/// Load the library under `root`, reporting an unreadable or missing root
/// as an error instead of an empty list.
pub fn load(root: &Path, settings: &LibrarySettings) -> Result<Vec<Track>, LibraryError> {
    if let Err(e) = check_root_access(root) {
        warn!(root = %root.display(), error = %e, "music directory not readable");
        return Err(e);
    }
    let tracks = scan(root, settings);
    info!(root = %root.display(), count = tracks.len(), "library loaded");
    Ok(tracks)
}

/// Walk `dir` and collect every music file, sorted by title.
///
/// Entries that cannot be read are skipped.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            if !settings.include_hidden && is_hidden(e.path()) {
                return false;
            }
            !(e.file_type().is_dir() && is_excluded_dir(e.path(), settings))
        })
        .filter_map(|e| match e {
            Ok(e) => Some(e),
            Err(err) => {
                debug!(error = %err, "skipping unreadable entry");
                None
            }
        })
    {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, settings) {
            continue;
        }

        let title = tag_title(path).unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("UNKNOWN")
                .to_string()
        });

        tracks.push(Track::new(title, path));
    }

    sort_by_title(&mut tracks);
    tracks
}

/// Title ascending, case-insensitive; the path breaks ties.
fn sort_by_title(tracks: &mut [Track]) {
    tracks.sort_by_cached_key(|t| (t.title.to_lowercase(), t.path.clone()));
}
