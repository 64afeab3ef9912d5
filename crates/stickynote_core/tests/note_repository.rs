use std::fs;
use stickynote_core::{
    note_file_name, FileNoteRepository, NoteRecord, NoteRepository, StorageConfig, StorageError,
    WindowFrame,
};

fn repository() -> (tempfile::TempDir, FileNoteRepository) {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileNoteRepository::new(StorageConfig::under(dir.path()));
    (dir, repo)
}

#[test]
fn save_then_load_returns_identical_record() {
    let (_dir, repo) = repository();
    let mut record = NoteRecord::new("groceries\n- milk\n- ünïcödé ✓", 18.0, "Blue");
    record.frame = WindowFrame::new(12.5, 40.0, 320.0, 240.0);
    record.theme_customized = true;

    let path = repo.save(&record).unwrap();
    assert_eq!(path, repo.note_path(record.id));
    assert_eq!(repo.load(&path).unwrap(), record);
}

#[test]
fn directories_are_created_lazily_on_first_save() {
    let (dir, repo) = repository();
    let config = repo.config().clone();
    assert!(!config.save_dir.exists());
    assert!(repo.list_note_files().unwrap().is_empty());

    repo.save(&NoteRecord::new("x", 14.0, "Yellow")).unwrap();
    assert!(config.save_dir.is_dir());
    assert!(config.save_dir.starts_with(dir.path()));
}

#[test]
fn overwrite_keeps_previous_generation_in_backup_dir() {
    let (_dir, repo) = repository();
    let mut record = NoteRecord::new("first draft", 14.0, "Yellow");
    repo.save(&record).unwrap();

    record.text = "second draft".to_string();
    repo.save(&record).unwrap();

    let backup = repo.load(&repo.backup_path(record.id)).unwrap();
    assert_eq!(backup.text, "first draft");
    assert_eq!(repo.load(&repo.note_path(record.id)).unwrap().text, "second draft");
}

#[test]
fn listing_ignores_foreign_and_temporary_files() {
    let (_dir, repo) = repository();
    let a = NoteRecord::new("a", 14.0, "Yellow");
    let b = NoteRecord::new("b", 14.0, "Pink");
    repo.save(&a).unwrap();
    repo.save(&b).unwrap();

    let save_dir = repo.config().save_dir.clone();
    fs::write(save_dir.join("readme.txt"), "not a note").unwrap();
    fs::write(save_dir.join("note_garbage.json"), "{}").unwrap();
    fs::write(save_dir.join(format!(".{}.tmp", note_file_name(a.id))), "partial").unwrap();
    fs::create_dir(save_dir.join("nested")).unwrap();

    let files = repo.list_note_files().unwrap();
    assert_eq!(files.len(), 2);
    let mut names: Vec<String> = files
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    let sorted = {
        let mut copy = names.clone();
        copy.sort();
        copy
    };
    assert_eq!(names, sorted);
    names.retain(|name| name == &note_file_name(a.id) || name == &note_file_name(b.id));
    assert_eq!(names.len(), 2);
}

#[test]
fn corrupted_file_is_invalid_format_and_can_be_quarantined() {
    let (_dir, repo) = repository();
    let record = NoteRecord::new("ok", 14.0, "Yellow");
    let path = repo.save(&record).unwrap();
    fs::write(&path, b"{ \"id\": truncated").unwrap();

    let err = repo.load(&path).unwrap_err();
    assert!(matches!(err, StorageError::InvalidFormat { .. }));
    assert_eq!(err.code(), 1001);

    let moved_to = repo.quarantine(&path).unwrap();
    assert!(!path.exists());
    assert!(moved_to.is_file());
    assert!(moved_to.to_string_lossy().ends_with(".json.corrupt"));
    assert!(repo.list_note_files().unwrap().is_empty());
}

#[test]
fn id_mismatch_between_name_and_content_is_rejected() {
    let (_dir, repo) = repository();
    let record = NoteRecord::new("mine", 14.0, "Yellow");
    let other = NoteRecord::new("theirs", 14.0, "Yellow");
    let path = repo.save(&record).unwrap();
    fs::write(&path, serde_json::to_vec(&other).unwrap()).unwrap();

    assert!(matches!(
        repo.load(&path),
        Err(StorageError::InvalidFormat { .. })
    ));
}

#[test]
fn missing_file_is_file_not_found() {
    let (_dir, repo) = repository();
    let record = NoteRecord::new("ghost", 14.0, "Yellow");
    let err = repo.load(&repo.note_path(record.id)).unwrap_err();
    assert!(matches!(err, StorageError::FileNotFound(_)));
    assert_eq!(err.code(), 1000);
}

#[test]
fn delete_archives_file_and_is_idempotent() {
    let (_dir, repo) = repository();
    let record = NoteRecord::new("bye", 14.0, "Green");
    repo.save(&record).unwrap();
    assert!(repo.exists(record.id));

    repo.delete(record.id).unwrap();
    assert!(!repo.exists(record.id));
    assert_eq!(repo.load(&repo.backup_path(record.id)).unwrap().text, "bye");

    repo.delete(record.id).unwrap();
}

#[test]
fn files_written_without_customization_flags_still_load() {
    let (_dir, repo) = repository();
    let record = NoteRecord::new("legacy", 14.0, "White");
    let path = repo.note_path(record.id);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let legacy = serde_json::json!({
        "id": record.id,
        "text": "legacy",
        "font_size": 14.0,
        "theme": "White",
        "frame": { "x": 0.0, "y": 0.0, "width": 250.0, "height": 200.0 }
    });
    fs::write(&path, serde_json::to_vec_pretty(&legacy).unwrap()).unwrap();

    let loaded = repo.load(&path).unwrap();
    assert_eq!(loaded, record);
}

#[test]
fn fractional_frames_read_back_bit_exact() {
    let (_dir, repo) = repository();
    let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        (seed >> 11) as f64 / (1u64 << 53) as f64
    };

    let mut record = NoteRecord::new("frames", 14.0, "Yellow");
    for _ in 0..500 {
        record.frame = WindowFrame::new(
            next() * 1.0e8,
            next() * 1.0e8,
            150.0 + next() * 1_000.0,
            100.0 + next() * 1_000.0,
        );
        let path = repo.save(&record).unwrap();
        assert_eq!(repo.load(&path).unwrap(), record);
    }

    record.frame = WindowFrame::new(
        99643463.28940527,
        33214487.76313509,
        300.28940527141094,
        200.6626732069999,
    );
    let path = repo.save(&record).unwrap();
    assert_eq!(repo.load(&path).unwrap().frame, record.frame);
}
