use super::*;
use crate::config::{ActionSettings, LibrarySettings};
use crate::error::LibraryError;
use crate::playback::fake::FakeFactory;
use crate::playback::{PlaybackController, PlayerState};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::tempdir;

fn app_for(root: &Path) -> (App<FakeFactory>, FakeFactory) {
    let fake = FakeFactory::default();
    let player = PlaybackController::new(fake.clone(), Duration::from_secs(1));
    let mut app = App::new(root.to_path_buf(), player);
    app.load(&LibrarySettings::default());
    (app, fake)
}

fn write_songs(dir: &Path, names: &[&str]) {
    for name in names {
        fs::write(dir.join(format!("{name}.mp3")), b"not real").unwrap();
    }
}

fn titles(app: &App<FakeFactory>) -> Vec<String> {
    app.library.iter().map(|t| t.title.clone()).collect()
}

#[test]
fn load_yields_every_song_sorted_by_title() {
    let dir = tempdir().unwrap();
    write_songs(dir.path(), &["delta", "Alpha", "charlie", "Bravo"]);

    let (app, _) = app_for(dir.path());
    assert_eq!(app.library_status, LibraryStatus::Loaded);
    assert_eq!(titles(&app), vec!["Alpha", "Bravo", "charlie", "delta"]);
}

#[test]
fn missing_root_is_an_explicit_state_with_empty_list() {
    let dir = tempdir().unwrap();
    let (app, _) = app_for(&dir.path().join("gone"));
    assert_eq!(app.library_status, LibraryStatus::Unavailable);
    assert!(!app.has_tracks());
    assert!(app.message.is_some());
}

#[test]
fn library_errors_map_to_explicit_statuses() {
    let path = std::path::PathBuf::from("/music");
    assert_eq!(
        LibraryStatus::from(&LibraryError::PermissionDenied { path: path.clone() }),
        LibraryStatus::PermissionDenied
    );
    assert_eq!(
        LibraryStatus::from(&LibraryError::Unavailable { path: path.clone() }),
        LibraryStatus::Unavailable
    );
    let io = LibraryError::Io {
        path,
        source: std::io::Error::other("boom"),
    };
    assert!(matches!(LibraryStatus::from(&io), LibraryStatus::Error(msg) if msg.contains("boom")));
}

#[cfg(unix)]
#[test]
fn unreadable_root_loads_as_permission_denied() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    write_songs(&locked, &["hidden"]);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    let readable = fs::read_dir(&locked).is_ok();

    let (app, _) = app_for(&locked);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    // Privileged users read through the mode bits; nothing to check then.
    if !readable {
        assert_eq!(app.library_status, LibraryStatus::PermissionDenied);
        assert!(!app.has_tracks());
        assert!(app.message.as_deref().unwrap().contains("permission denied"));
    }
}

#[test]
fn reload_picks_up_new_files() {
    let dir = tempdir().unwrap();
    write_songs(dir.path(), &["one"]);
    let (mut app, _) = app_for(dir.path());
    assert_eq!(app.library.len(), 1);

    write_songs(dir.path(), &["two"]);
    app.load(&LibrarySettings::default());
    assert_eq!(titles(&app), vec!["one", "two"]);
}

#[test]
fn filter_then_clear_restores_full_list() {
    let dir = tempdir().unwrap();
    write_songs(dir.path(), &["Alpha", "Beta", "Gamma"]);
    let (mut app, _) = app_for(dir.path());

    app.enter_filter_mode();
    for c in "zz".chars() {
        app.push_filter_char(c);
    }
    assert!(!app.has_tracks());
    assert_eq!(app.selected_track(), None);

    app.pop_filter_char();
    app.pop_filter_char();
    app.push_filter_char('A');
    assert_eq!(titles(&app), vec!["Alpha", "Beta", "Gamma"]);
    app.push_filter_char('m');
    assert_eq!(titles(&app), vec!["Gamma"]);

    app.clear_filter();
    assert!(!app.filter_mode);
    assert_eq!(app.library.len(), 3);
}

#[test]
fn open_selected_captures_the_visible_list() {
    let dir = tempdir().unwrap();
    write_songs(dir.path(), &["Alpha", "Beta", "Gamma", "Delta"]);
    let (mut app, _) = app_for(dir.path());

    app.push_filter_char('t');
    // Beta, Delta
    app.next();
    let now = Instant::now();
    app.open_selected(now);
    assert_eq!(app.player.view().unwrap().title, "Delta");

    // Changing the filter afterwards does not change the player's queue.
    app.clear_filter();
    assert!(app.player.previous(now));
    assert_eq!(app.player.view().unwrap().title, "Beta");
    assert!(!app.player.previous(now));
}

#[test]
fn next_from_opened_track_moves_one_down_then_stops() {
    let dir = tempdir().unwrap();
    write_songs(dir.path(), &["a", "b", "c"]);
    let (mut app, _) = app_for(dir.path());
    let now = Instant::now();

    app.selected = 1;
    app.open_selected(now);
    assert!(app.player.next(now));
    assert_eq!(app.player.view().unwrap().title, "c");
    assert!(!app.player.next(now));
    assert_eq!(app.player.view().unwrap().title, "c");
}

#[test]
fn delete_selected_removes_one_entry_and_the_file() {
    let dir = tempdir().unwrap();
    write_songs(dir.path(), &["a", "b", "c"]);
    let (mut app, _) = app_for(dir.path());

    app.selected = 1;
    app.delete_selected();

    assert_eq!(titles(&app), vec!["a", "c"]);
    assert!(!dir.path().join("b.mp3").exists());
    assert!(dir.path().join("a.mp3").exists());
    assert_eq!(app.library.snapshot().len(), 2);
}

#[test]
fn deleting_last_entry_clamps_selection() {
    let dir = tempdir().unwrap();
    write_songs(dir.path(), &["a", "b"]);
    let (mut app, _) = app_for(dir.path());

    app.select_last();
    app.delete_selected();
    assert_eq!(app.selected, 0);
    assert_eq!(app.selected_track().unwrap().title, "a");
}

#[test]
fn deleting_the_playing_track_closes_the_player() {
    let dir = tempdir().unwrap();
    write_songs(dir.path(), &["a", "b"]);
    let (mut app, fake) = app_for(dir.path());

    app.open_selected(Instant::now());
    assert!(app.player.is_open());

    app.delete_selected();
    assert!(!app.player.is_open());
    assert_eq!(app.player.state(), &PlayerState::Idle);
    assert_eq!(fake.with(|s| s.released), 1);
}

#[test]
fn failed_delete_keeps_the_entry() {
    let dir = tempdir().unwrap();
    // A directory with an audio extension is not scanned, so build the list by hand.
    let bogus = dir.path().join("folder.mp3");
    fs::create_dir(&bogus).unwrap();
    let fake = FakeFactory::default();
    let mut app = App::new(
        dir.path().to_path_buf(),
        PlaybackController::new(fake, Duration::from_secs(1)),
    );
    app.library
        .replace(vec![crate::library::Track::new("folder", bogus.clone())]);

    app.delete_selected();
    assert_eq!(app.library.len(), 1);
    assert!(bogus.exists());
    assert!(app.message.as_deref().unwrap().contains("failed to delete"));
}

#[test]
fn share_failure_is_reported_in_message() {
    let dir = tempdir().unwrap();
    write_songs(dir.path(), &["a"]);
    let (mut app, _) = app_for(dir.path());

    let settings = ActionSettings {
        share_command: vec!["/nonexistent/cadenza-share-helper".to_string()],
        ..ActionSettings::default()
    };
    app.share_selected(&settings);
    assert!(
        app.message
            .as_deref()
            .unwrap()
            .contains("failed to launch share command")
    );
}

#[test]
fn selection_wraps_like_the_list() {
    let dir = tempdir().unwrap();
    write_songs(dir.path(), &["a", "b", "c"]);
    let (mut app, _) = app_for(dir.path());

    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);
    app.select_last();
    assert_eq!(app.selected, 2);
    app.select_first();
    assert_eq!(app.selected, 0);
}
