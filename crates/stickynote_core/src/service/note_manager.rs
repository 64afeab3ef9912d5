//! Note collection manager.
//!
//! # Responsibility
//! - Own the live set of note records and their sync state.
//! - Drive creation/removal, save passes, startup restore and auto-save.
//! - Apply reversible theme previews and batch appearance changes.
//! - Mediate between preferences, the note repository and the presenter.
//!
//! # Invariants
//! - The manager holds the only authoritative copy of each live record;
//!   presenters address notes by `NoteId` only.
//! - A note leaves `Created`/`Dirty` only after a write that reads back
//!   identical; failed writes keep it pending for the next pass.
//! - Theme previews never touch records, so they never dirty a note; revert
//!   always restores the committed theme.
//! - Explicit per-note appearance choices are persisted: recording a
//!   customization dirties the note even when the value itself is unchanged.
//! - Storage failures are reported and logged, never raised, and never
//!   block work on other notes.
//!
//! # Concurrency
//! All methods take `&mut self`. Hosts that use threads wrap the manager in
//! one `Mutex` (see `AutoSaveDriver`), which serializes every operation,
//! including auto-save ticks.

use crate::config::{
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, FONT_SIZE_STEP, NOTE_DID_BECOME_ACTIVE,
    NOTE_WILL_CLOSE, PREFERENCES_DID_CHANGE,
};
use crate::model::note::{clamp_font_size, NoteId, NoteRecord, NoteState, WindowFrame};
use crate::model::theme::{ColorTheme, ThemeRegistry};
use crate::prefs::preferences::{Preferences, PreferencesChange, SharedPreferences};
use crate::repo::note_repo::{NoteRepository, StorageError};
use crate::service::presenter::{MenuAction, MenuOutcome, NoteFailure, NotePresenter};
use crate::service::scheduler::{AutoSaveTick, AutoSaveTimer, Clock, SystemClock};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Offset between successive new-note windows.
const CASCADE_STEP: f64 = 24.0;
/// New-note windows wrap back to the origin after this many steps.
const CASCADE_SLOTS: usize = 10;

/// Outcome of one save pass.
#[derive(Debug, Default)]
pub struct SaveReport {
    /// Notes written and verified, in collection order.
    pub written: Vec<NoteId>,
    /// Notes that stay pending because their write failed.
    pub failures: Vec<NoteFailure>,
}

impl SaveReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of startup restore.
#[derive(Debug, Default)]
pub struct RestoreReport {
    /// Restored notes in file-enumeration order.
    pub restored: Vec<NoteId>,
    /// Files skipped because their note was already live.
    pub already_live: Vec<NoteId>,
    /// Unreadable files (corrupted ones were moved to `quarantined`).
    pub failures: Vec<NoteFailure>,
    pub quarantined: Vec<PathBuf>,
}

#[derive(Debug)]
struct ManagedNote {
    record: NoteRecord,
    state: NoteState,
}

impl ManagedNote {
    fn mark_dirty(&mut self) {
        if self.state == NoteState::Synced {
            self.state = NoteState::Dirty;
        }
    }

    /// Records an explicit font choice; a flipped flag must be persisted.
    fn customize_font_size(&mut self) {
        if !self.record.font_size_customized {
            self.record.font_size_customized = true;
            self.mark_dirty();
        }
    }

    fn customize_theme(&mut self) {
        if !self.record.theme_customized {
            self.record.theme_customized = true;
            self.mark_dirty();
        }
    }
}

/// Owner of every live note.
pub struct NoteManager<R: NoteRepository, P: NotePresenter> {
    repo: R,
    presenter: P,
    preferences: SharedPreferences,
    preference_events: Receiver<PreferencesChange>,
    clock: Arc<dyn Clock>,
    notes: Vec<ManagedNote>,
    preview: Option<ColorTheme>,
    auto_save: AutoSaveTimer,
}

impl<R: NoteRepository, P: NotePresenter> NoteManager<R, P> {
    /// Creates a manager using the wall clock.
    pub fn new(repo: R, presenter: P, preferences: SharedPreferences) -> Self {
        Self::with_clock(repo, presenter, preferences, Arc::new(SystemClock))
    }

    /// Creates a manager with an explicit time source.
    ///
    /// Subscribes to preference changes immediately; auto-save stays off
    /// until `enable_auto_save` or `sync_auto_save_with_preferences`.
    pub fn with_clock(
        repo: R,
        presenter: P,
        preferences: SharedPreferences,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let preference_events = lock_preferences(&preferences).subscribe();
        Self {
            repo,
            presenter,
            preferences,
            preference_events,
            clock,
            notes: Vec::new(),
            preview: None,
            auto_save: AutoSaveTimer::new(),
        }
    }

    // ----- collection queries -----

    pub fn has_notes(&self) -> bool {
        !self.notes.is_empty()
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Live records in creation/restore order.
    pub fn all_notes(&self) -> Vec<&NoteRecord> {
        self.notes.iter().map(|note| &note.record).collect()
    }

    pub fn note_ids(&self) -> Vec<NoteId> {
        self.notes.iter().map(|note| note.record.id).collect()
    }

    pub fn note(&self, id: NoteId) -> Option<&NoteRecord> {
        self.find(id).map(|note| &note.record)
    }

    pub fn note_state(&self, id: NoteId) -> Option<NoteState> {
        self.find(id).map(|note| note.state)
    }

    /// Notes that the next save pass would write.
    pub fn dirty_count(&self) -> usize {
        self.notes
            .iter()
            .filter(|note| note.state.needs_save())
            .count()
    }

    /// Theme currently shown for a note, preview overlay included.
    pub fn displayed_theme(&self, id: NoteId) -> Option<&ColorTheme> {
        let note = self.find(id)?;
        Some(
            self.preview
                .as_ref()
                .unwrap_or_else(|| note.record.color_theme()),
        )
    }

    pub fn is_previewing(&self) -> bool {
        self.preview.is_some()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn preferences(&self) -> &SharedPreferences {
        &self.preferences
    }

    // ----- lifecycle -----

    /// Creates an empty note seeded from current preference defaults.
    pub fn create_new_note(&mut self) -> NoteId {
        self.create_new_note_with_text("")
    }

    /// Creates a note with `text`, styled with current preference defaults.
    ///
    /// During a theme preview the window shows the preview until revert.
    pub fn create_new_note_with_text(&mut self, text: impl Into<String>) -> NoteId {
        let (font_size, theme) = {
            let prefs = self.prefs();
            (prefs.default_font_size(), prefs.default_color_theme())
        };

        let id = self.allocate_id();
        let mut record = NoteRecord::with_id(id, text, font_size, theme.name());
        record.frame = self.cascade_frame();

        let shown = self.preview.as_ref().unwrap_or(theme);
        self.presenter.create_window(&record, shown);
        self.notes.push(ManagedNote {
            record,
            state: NoteState::Created,
        });
        info!(
            "event=note_create module=manager status=ok note_id={} count={}",
            id,
            self.notes.len()
        );
        id
    }

    /// Removes a live note, archives its file and tears down its window.
    ///
    /// Returns `false` (and changes nothing) when `id` is not live. Archive
    /// failures are reported; the note still leaves the live set.
    pub fn remove_note(&mut self, id: NoteId) -> bool {
        let Some(index) = self.index_of(id) else {
            debug!("event=note_remove module=manager status=skip note_id={id}");
            return false;
        };
        self.notes.remove(index);
        self.presenter.destroy_window(id);

        if let Err(error) = self.repo.delete(id) {
            warn!(
                "event=note_remove module=manager status=error note_id={} error_code={} error={}",
                id,
                error.code(),
                error
            );
            self.report(NoteFailure {
                note_id: Some(id),
                error,
            });
        }
        self.prefs().remove_window_position(id);

        info!(
            "event=note_remove module=manager status=ok note_id={} count={}",
            id,
            self.notes.len()
        );
        true
    }

    // ----- inbound presenter events -----

    /// Records edited text. Returns `false` for unknown notes.
    pub fn on_note_text_changed(&mut self, id: NoteId, text: impl Into<String>) -> bool {
        let text = text.into();
        let Some(note) = self.find_mut(id) else {
            return false;
        };
        if note.record.text != text {
            note.record.text = text;
            note.mark_dirty();
        }
        true
    }

    /// The user closed a note window; same as `remove_note`.
    pub fn on_note_closed(&mut self, id: NoteId) -> bool {
        debug!("event={NOTE_WILL_CLOSE} module=manager note_id={id}");
        self.remove_note(id)
    }

    pub fn on_note_became_active(&mut self, id: NoteId) {
        debug!("event={NOTE_DID_BECOME_ACTIVE} module=manager note_id={id}");
    }

    /// Routes a menu command; presentation-only commands are `Unhandled`.
    pub fn on_menu_action(&mut self, action: MenuAction) -> MenuOutcome {
        match action {
            MenuAction::NewNote => {
                self.create_new_note();
            }
            MenuAction::IncreaseFontSize => {
                self.increase_font_size_for_all_notes();
            }
            MenuAction::DecreaseFontSize => {
                self.decrease_font_size_for_all_notes();
            }
            MenuAction::SaveAll => {
                self.save_all_notes();
            }
            MenuAction::ShowPreferences
            | MenuAction::Bold
            | MenuAction::Italic
            | MenuAction::Underline => return MenuOutcome::Unhandled,
        }
        MenuOutcome::Handled
    }

    // ----- persistence -----

    /// Writes every `Created`/`Dirty` note and verifies each write.
    ///
    /// Window frames are captured from the presenter first; a moved window
    /// counts as a change. Failed notes stay pending and are reported.
    ///
    /// Passes cannot overlap: this takes `&mut self`, and threaded hosts
    /// share the manager through one `Mutex`.
    pub fn save_all_notes(&mut self) -> SaveReport {
        let started_at = Instant::now();

        self.capture_window_frames();

        let mut report = SaveReport::default();
        for note in self.notes.iter_mut().filter(|note| note.state.needs_save()) {
            match write_verified(&self.repo, &note.record) {
                Ok(()) => {
                    note.state = NoteState::Synced;
                    report.written.push(note.record.id);
                }
                Err(error) => {
                    warn!(
                        "event=note_save module=manager status=error note_id={} error_code={} error={}",
                        note.record.id,
                        error.code(),
                        error
                    );
                    report.failures.push(NoteFailure {
                        note_id: Some(note.record.id),
                        error,
                    });
                }
            }
        }

        if !report.written.is_empty() {
            let frames: Vec<(NoteId, WindowFrame)> = self
                .notes
                .iter()
                .filter(|note| report.written.contains(&note.record.id))
                .map(|note| (note.record.id, note.record.frame))
                .collect();
            self.prefs().set_window_positions(frames);
        }

        for failure in &report.failures {
            self.presenter.report_failure(failure);
        }

        if report.written.is_empty() && report.failures.is_empty() {
            debug!("event=notes_save module=manager status=noop");
        } else {
            info!(
                "event=notes_save module=manager status={} written={} failed={} duration_ms={}",
                if report.is_clean() { "ok" } else { "partial" },
                report.written.len(),
                report.failures.len(),
                started_at.elapsed().as_millis()
            );
        }
        report
    }

    /// Loads every note file in the save directory and opens a window for each.
    ///
    /// Unparseable files are moved to the backup directory and skipped;
    /// one bad file never aborts the restore. Notes already live are skipped.
    pub fn restore_notes_from_disk(&mut self) -> RestoreReport {
        let mut report = RestoreReport::default();
        let paths = match self.repo.list_note_files() {
            Ok(paths) => paths,
            Err(error) => {
                warn!(
                    "event=notes_restore module=manager status=error error_code={} error={}",
                    error.code(),
                    error
                );
                let failure = NoteFailure {
                    note_id: None,
                    error,
                };
                self.report(failure);
                return report;
            }
        };

        for path in paths {
            debug!(
                "event=note_restore module=manager status=start path={}",
                path.display()
            );
            let mut record = match self.repo.load(&path) {
                Ok(record) => record,
                Err(error) => {
                    warn!(
                        "event=note_restore module=manager status=error path={} error_code={} error={}",
                        path.display(),
                        error.code(),
                        error
                    );
                    if matches!(error, StorageError::InvalidFormat { .. }) {
                        match self.repo.quarantine(&path) {
                            Ok(moved_to) => report.quarantined.push(moved_to),
                            Err(move_error) => warn!(
                                "event=note_quarantine module=manager status=error path={} error={}",
                                path.display(),
                                move_error
                            ),
                        }
                    }
                    report.failures.push(NoteFailure {
                        note_id: None,
                        error,
                    });
                    continue;
                }
            };

            if self.find(record.id).is_some() {
                report.already_live.push(record.id);
                continue;
            }

            let mut changed = record.normalize();
            if !record.frame.is_valid() {
                record.frame = self
                    .prefs()
                    .window_position(record.id)
                    .filter(WindowFrame::is_valid)
                    .unwrap_or_default();
                changed = true;
            }

            let shown = self
                .preview
                .as_ref()
                .unwrap_or_else(|| record.color_theme());
            self.presenter.create_window(&record, shown);
            report.restored.push(record.id);
            self.notes.push(ManagedNote {
                record,
                state: if changed {
                    NoteState::Dirty
                } else {
                    NoteState::Synced
                },
            });
        }

        for failure in &report.failures {
            self.presenter.report_failure(failure);
        }
        info!(
            "event=notes_restore module=manager status=ok restored={} failed={} quarantined={}",
            report.restored.len(),
            report.failures.len(),
            report.quarantined.len()
        );
        report
    }

    // ----- auto-save -----

    /// Starts (or restarts) auto-save with the preferences interval.
    pub fn enable_auto_save(&mut self) {
        let seconds = self.prefs().auto_save_interval();
        self.auto_save
            .start(Duration::from_secs(seconds), self.clock.now());
        info!("event=autosave module=manager status=enabled interval_s={seconds}");
    }

    pub fn disable_auto_save(&mut self) {
        if self.auto_save.is_running() {
            self.auto_save.stop();
            info!("event=autosave module=manager status=disabled");
        }
    }

    pub fn is_auto_save_running(&self) -> bool {
        self.auto_save.is_running()
    }

    /// Matches the timer to the preferences' enabled flag.
    pub fn sync_auto_save_with_preferences(&mut self) {
        if self.prefs().auto_save_enabled() {
            self.enable_auto_save();
        } else {
            self.disable_auto_save();
        }
    }

    /// Applies pending preference changes, then runs a save pass if due.
    ///
    /// Returns the pass report when one ran.
    pub fn poll_auto_save(&mut self) -> Option<SaveReport> {
        self.process_preference_changes();
        if !self.auto_save.is_due(self.clock.now()) {
            return None;
        }
        let report = self.save_all_notes();
        self.auto_save.rearm(self.clock.now());
        Some(report)
    }

    /// Drains preference notifications and reacts to each.
    pub fn process_preference_changes(&mut self) {
        let changes: Vec<PreferencesChange> = self.preference_events.try_iter().collect();
        let mut appearance_changed = false;
        for change in changes {
            debug!("event={PREFERENCES_DID_CHANGE} module=manager change={change:?}");
            match change {
                PreferencesChange::AutoSaveEnabled(true) => self.enable_auto_save(),
                PreferencesChange::AutoSaveEnabled(false) => self.disable_auto_save(),
                PreferencesChange::AutoSaveInterval(_) => {
                    if self.auto_save.is_running() {
                        self.enable_auto_save();
                    }
                }
                PreferencesChange::DefaultFontSize(_) | PreferencesChange::DefaultColorTheme(_) => {
                    appearance_changed = true;
                }
                PreferencesChange::Reset => {
                    self.sync_auto_save_with_preferences();
                    appearance_changed = true;
                }
            }
        }
        if appearance_changed {
            self.apply_preferences_to_all_notes();
        }
    }

    // ----- appearance -----

    /// Steps every note's font size up by one step. Returns notes changed.
    pub fn increase_font_size_for_all_notes(&mut self) -> usize {
        self.step_font_size_for_all(FONT_SIZE_STEP)
    }

    /// Steps every note's font size down by one step. Returns notes changed.
    pub fn decrease_font_size_for_all_notes(&mut self) -> usize {
        self.step_font_size_for_all(-FONT_SIZE_STEP)
    }

    pub fn increase_font_size(&mut self, id: NoteId) -> bool {
        self.step_font_size(id, FONT_SIZE_STEP)
    }

    pub fn decrease_font_size(&mut self, id: NoteId) -> bool {
        self.step_font_size(id, -FONT_SIZE_STEP)
    }

    /// Sets one note's font size (clamped) as an explicit customization.
    ///
    /// The customization is recorded even when the size is unchanged.
    /// Returns `true` when the size changed.
    pub fn set_note_font_size(&mut self, id: NoteId, size: f32) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.notes[index].customize_font_size();
        self.set_font_size_at(index, size)
    }

    /// Sets one note's theme as an explicit customization.
    ///
    /// Unknown names resolve to the default theme. The customization is
    /// recorded even when the theme is unchanged. While a preview is active
    /// the window keeps showing the preview until revert.
    pub fn set_note_theme(&mut self, id: NoteId, name: &str) -> bool {
        let theme = ThemeRegistry::resolve(name);
        let previewing = self.preview.is_some();
        let Some(note) = self.find_mut(id) else {
            return false;
        };
        note.customize_theme();
        if note.record.theme == theme.name() {
            return false;
        }
        note.record.theme = theme.name().to_string();
        note.mark_dirty();
        if !previewing {
            self.presenter.update_window_theme(id, theme);
        }
        true
    }

    /// Pushes preference defaults onto notes that have not been customized.
    ///
    /// Explicit per-note font sizes and themes are preserved. An active
    /// theme preview is reverted first. Returns notes changed.
    pub fn apply_preferences_to_all_notes(&mut self) -> usize {
        self.revert_theme_preview();
        let (font_size, theme) = {
            let prefs = self.prefs();
            (prefs.default_font_size(), prefs.default_color_theme())
        };

        let mut changed = 0;
        for note in &mut self.notes {
            let id = note.record.id;
            let mut touched = false;
            if !note.record.font_size_customized && note.record.font_size != font_size {
                note.record.font_size = font_size;
                self.presenter.update_window_font_size(id, font_size);
                touched = true;
            }
            if !note.record.theme_customized && note.record.theme != theme.name() {
                note.record.theme = theme.name().to_string();
                self.presenter.update_window_theme(id, theme);
                touched = true;
            }
            if touched {
                note.mark_dirty();
                changed += 1;
            }
        }
        debug!("event=prefs_apply module=manager changed={changed}");
        changed
    }

    /// Shows `theme` on every window without committing it.
    ///
    /// A second preview replaces the first; revert always returns to the
    /// committed themes.
    pub fn preview_theme_on_all_notes(&mut self, theme: &ColorTheme) {
        for note in &self.notes {
            self.presenter.update_window_theme(note.record.id, theme);
        }
        self.preview = Some(theme.clone());
        debug!(
            "event=theme_preview module=manager status=start theme={}",
            theme.name()
        );
    }

    /// Restores committed themes. No-op (returns `false`) without a preview.
    pub fn revert_theme_preview(&mut self) -> bool {
        if self.preview.take().is_none() {
            return false;
        }
        for note in &self.notes {
            self.presenter
                .update_window_theme(note.record.id, note.record.color_theme());
        }
        debug!("event=theme_preview module=manager status=reverted");
        true
    }

    // ----- internals -----

    fn prefs(&self) -> MutexGuard<'_, Preferences> {
        lock_preferences(&self.preferences)
    }

    fn find(&self, id: NoteId) -> Option<&ManagedNote> {
        self.notes.iter().find(|note| note.record.id == id)
    }

    fn find_mut(&mut self, id: NoteId) -> Option<&mut ManagedNote> {
        self.notes.iter_mut().find(|note| note.record.id == id)
    }

    fn index_of(&self, id: NoteId) -> Option<usize> {
        self.notes.iter().position(|note| note.record.id == id)
    }

    /// Random ID unused by live notes and by files in the save directory.
    fn allocate_id(&self) -> NoteId {
        loop {
            let id = Uuid::new_v4();
            if self.find(id).is_none() && !self.repo.exists(id) {
                return id;
            }
        }
    }

    fn cascade_frame(&self) -> WindowFrame {
        let slot = (self.notes.len() % CASCADE_SLOTS) as f64;
        WindowFrame::new(
            slot * CASCADE_STEP,
            slot * CASCADE_STEP,
            DEFAULT_WINDOW_WIDTH,
            DEFAULT_WINDOW_HEIGHT,
        )
    }

    fn capture_window_frames(&mut self) {
        for note in &mut self.notes {
            if let Some(frame) = self.presenter.window_frame(note.record.id) {
                if frame != note.record.frame && frame.is_valid() {
                    note.record.frame = frame;
                    note.mark_dirty();
                }
            }
        }
    }

    fn step_font_size_for_all(&mut self, delta: f32) -> usize {
        let mut changed = 0;
        for index in 0..self.notes.len() {
            let current = self.notes[index].record.font_size;
            if self.set_font_size_at(index, current + delta) {
                changed += 1;
            }
        }
        changed
    }

    fn step_font_size(&mut self, id: NoteId, delta: f32) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let current = self.notes[index].record.font_size;
        self.set_font_size_at(index, current + delta)
    }

    fn set_font_size_at(&mut self, index: usize, size: f32) -> bool {
        let clamped = clamp_font_size(size);
        let note = &mut self.notes[index];
        if note.record.font_size == clamped {
            return false;
        }
        note.record.font_size = clamped;
        note.customize_font_size();
        note.mark_dirty();
        self.presenter
            .update_window_font_size(note.record.id, clamped);
        true
    }

    fn report(&mut self, failure: NoteFailure) {
        self.presenter.report_failure(&failure);
    }
}

impl<R, P> AutoSaveTick for NoteManager<R, P>
where
    R: NoteRepository + 'static,
    P: NotePresenter + 'static,
{
    fn auto_save_tick(&mut self) {
        self.poll_auto_save();
    }
}

fn lock_preferences(preferences: &SharedPreferences) -> MutexGuard<'_, Preferences> {
    preferences.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Saves `record` and confirms the file reads back identically.
fn write_verified<R: NoteRepository>(repo: &R, record: &NoteRecord) -> Result<(), StorageError> {
    let path = repo.save(record)?;
    let stored = repo.load(&path)?;
    if &stored != record {
        return Err(StorageError::InvalidFormat {
            path,
            message: "read-back does not match the written note".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use crate::prefs::defaults_store::MemoryDefaultsStore;
    use crate::repo::note_repo::FileNoteRepository;
    use crate::service::presenter::HeadlessPresenter;

    fn manager(dir: &std::path::Path) -> NoteManager<FileNoteRepository, HeadlessPresenter> {
        let prefs = Preferences::load(Box::new(MemoryDefaultsStore::new())).into_shared();
        NoteManager::new(
            FileNoteRepository::new(StorageConfig::under(dir)),
            HeadlessPresenter::new(),
            prefs,
        )
    }

    #[test]
    fn new_notes_cascade_and_start_created() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager(dir.path());
        let first = manager.create_new_note();
        let second = manager.create_new_note_with_text("two");

        assert_eq!(manager.note_state(first), Some(NoteState::Created));
        assert_ne!(
            manager.note(first).unwrap().frame,
            manager.note(second).unwrap().frame
        );
        assert_eq!(manager.presenter().window_count(), 2);
    }

    #[test]
    fn text_edit_on_synced_note_marks_dirty_only_when_changed() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager(dir.path());
        let id = manager.create_new_note_with_text("same");
        manager.save_all_notes();

        assert!(manager.on_note_text_changed(id, "same"));
        assert_eq!(manager.note_state(id), Some(NoteState::Synced));
        assert!(manager.on_note_text_changed(id, "different"));
        assert_eq!(manager.note_state(id), Some(NoteState::Dirty));
        assert!(!manager.on_note_text_changed(NoteId::new_v4(), "ghost"));
    }

    #[test]
    fn moved_window_is_saved_on_next_pass() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager(dir.path());
        let id = manager.create_new_note();
        manager.save_all_notes();

        let moved = WindowFrame::new(400.0, 300.0, 320.0, 260.0);
        manager.presenter_mut().move_window(id, moved);
        let report = manager.save_all_notes();
        assert_eq!(report.written, vec![id]);
        assert_eq!(manager.note(id).unwrap().frame, moved);
        assert_eq!(
            manager.preferences().lock().unwrap().window_position(id),
            Some(moved)
        );
    }
}
