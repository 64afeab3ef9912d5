#![allow(dead_code)]

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use stickynote_core::{
    ColorTheme, FileNoteRepository, HeadlessPresenter, ManualClock, MemoryDefaultsStore,
    NoteFailure, NoteId, NoteManager, NotePresenter, NoteRecord, NoteRepository, Preferences,
    SharedPreferences, StorageConfig, StorageError, StorageResult, WindowFrame,
};

/// File repository that records every save and can fail chosen notes.
#[derive(Clone)]
pub struct CountingRepository {
    inner: FileNoteRepository,
    pub saves: Arc<Mutex<Vec<NoteId>>>,
    pub failing: Arc<Mutex<HashSet<NoteId>>>,
}

impl CountingRepository {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            inner: FileNoteRepository::new(config),
            saves: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }

    pub fn take_saves(&self) -> Vec<NoteId> {
        std::mem::take(&mut *self.saves.lock().unwrap())
    }

    pub fn fail(&self, id: NoteId) {
        self.failing.lock().unwrap().insert(id);
    }

    pub fn heal(&self, id: NoteId) {
        self.failing.lock().unwrap().remove(&id);
    }
}

impl NoteRepository for CountingRepository {
    fn save(&self, record: &NoteRecord) -> StorageResult<PathBuf> {
        if self.failing.lock().unwrap().contains(&record.id) {
            return Err(StorageError::from_io(
                self.inner.note_path(record.id),
                io::Error::from(io::ErrorKind::StorageFull),
            ));
        }
        self.saves.lock().unwrap().push(record.id);
        self.inner.save(record)
    }

    fn load(&self, path: &Path) -> StorageResult<NoteRecord> {
        self.inner.load(path)
    }

    fn list_note_files(&self) -> StorageResult<Vec<PathBuf>> {
        self.inner.list_note_files()
    }

    fn delete(&self, id: NoteId) -> StorageResult<()> {
        self.inner.delete(id)
    }

    fn quarantine(&self, path: &Path) -> StorageResult<PathBuf> {
        self.inner.quarantine(path)
    }

    fn note_path(&self, id: NoteId) -> PathBuf {
        self.inner.note_path(id)
    }
}

/// Headless presenter that also keeps every reported failure message.
#[derive(Default)]
pub struct RecordingPresenter {
    pub windows: HeadlessPresenter,
    pub failures: Vec<String>,
}

impl NotePresenter for RecordingPresenter {
    fn create_window(&mut self, record: &NoteRecord, theme: &ColorTheme) {
        self.windows.create_window(record, theme);
    }

    fn destroy_window(&mut self, id: NoteId) {
        self.windows.destroy_window(id);
    }

    fn update_window_font_size(&mut self, id: NoteId, size: f32) {
        self.windows.update_window_font_size(id, size);
    }

    fn update_window_theme(&mut self, id: NoteId, theme: &ColorTheme) {
        self.windows.update_window_theme(id, theme);
    }

    fn window_frame(&self, id: NoteId) -> Option<WindowFrame> {
        self.windows.window_frame(id)
    }

    fn report_failure(&mut self, failure: &NoteFailure) {
        self.failures.push(failure.user_message());
    }
}

pub type TestManager = NoteManager<CountingRepository, RecordingPresenter>;

pub struct Fixture {
    pub dir: tempfile::TempDir,
    pub config: StorageConfig,
    pub repo: CountingRepository,
    pub prefs: SharedPreferences,
    pub clock: Arc<ManualClock>,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig::under(dir.path());
        Self {
            repo: CountingRepository::new(config.clone()),
            config,
            dir,
            prefs: Preferences::load(Box::new(MemoryDefaultsStore::new())).into_shared(),
            clock: Arc::new(ManualClock::new()),
        }
    }

    /// A manager sharing this fixture's repository counters, prefs and clock.
    pub fn manager(&self) -> TestManager {
        NoteManager::with_clock(
            self.repo.clone(),
            RecordingPresenter::default(),
            Arc::clone(&self.prefs),
            self.clock.clone(),
        )
    }

    pub fn note_files(&self) -> Vec<PathBuf> {
        FileNoteRepository::new(self.config.clone())
            .list_note_files()
            .unwrap()
    }
}
