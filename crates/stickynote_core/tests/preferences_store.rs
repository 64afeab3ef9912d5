use std::sync::mpsc::TryRecvError;
use stickynote_core::{
    DefaultsStore, NoteId, Preferences, PreferencesChange, SqliteDefaultsStore, WindowFrame,
};

fn open(path: &std::path::Path) -> Preferences {
    Preferences::load(Box::new(SqliteDefaultsStore::open(path).unwrap()))
}

#[test]
fn committed_values_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("defaults.sqlite3");
    let id = NoteId::new_v4();
    let frame = WindowFrame::new(30.0, 40.0, 280.0, 220.0);

    {
        let mut prefs = open(&path);
        prefs.set_default_font_size(20.0);
        prefs.set_default_color_theme(" dark ");
        prefs.set_auto_save_enabled(false);
        prefs.set_auto_save_interval(2);
        prefs.set_window_position(id, frame);
    }

    let prefs = open(&path);
    assert_eq!(prefs.default_font_size(), 20.0);
    assert_eq!(prefs.default_color_theme().name(), "Dark");
    assert!(!prefs.auto_save_enabled());
    assert_eq!(prefs.auto_save_interval(), 5);
    assert_eq!(prefs.window_position(id), Some(frame));
}

#[test]
fn reset_restores_and_persists_builtin_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("defaults.sqlite3");
    let id = NoteId::new_v4();

    {
        let mut prefs = open(&path);
        let events = prefs.subscribe();
        prefs.set_default_font_size(30.0);
        prefs.set_window_position(id, WindowFrame::default());
        prefs.reset_to_defaults();

        assert_eq!(events.try_recv(), Ok(PreferencesChange::DefaultFontSize(30.0)));
        assert_eq!(events.try_recv(), Ok(PreferencesChange::Reset));
        assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
    }

    let prefs = open(&path);
    assert_eq!(prefs.default_font_size(), 14.0);
    assert_eq!(prefs.default_color_theme().name(), "Yellow");
    assert!(prefs.auto_save_enabled());
    assert_eq!(prefs.auto_save_interval(), 30);
    assert!(prefs.window_position(id).is_some());
}

#[test]
fn garbage_in_store_loads_as_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("defaults.sqlite3");
    {
        let mut store = SqliteDefaultsStore::open(&path).unwrap();
        store.set("default_font_size", "huge").unwrap();
        store.set("default_color_theme", "Chartreuse").unwrap();
        store.set("auto_save_enabled", "maybe").unwrap();
        store.set("auto_save_interval", "-3").unwrap();
        store.set("window_positions", "[not a map").unwrap();
    }

    let prefs = open(&path);
    assert_eq!(prefs.default_font_size(), 14.0);
    assert_eq!(prefs.default_color_theme().name(), "Yellow");
    assert!(prefs.auto_save_enabled());
    assert_eq!(prefs.auto_save_interval(), 30);
    assert!(prefs.window_positions().is_empty());
}
