//! Note file repository contracts and file-system implementation.
//!
//! # Responsibility
//! - Serialize note records to one JSON file per note in the save directory.
//! - Keep the previous generation of each file in the backup directory.
//! - Enumerate, load and archive note files; quarantine unparseable ones.
//!
//! # Invariants
//! - File names are `<NOTE_FILE_PREFIX><uuid>.<NOTE_FILE_EXTENSION>`; other
//!   files in the save directory are ignored.
//! - Writes go to a temp file first and are renamed into place, so a crash
//!   never leaves a half-written primary file.
//! - Backup failures never block the primary write.
//! - Directories are created lazily on first write.

use crate::config::{
    StorageConfig, CORRUPT_FILE_SUFFIX, ERROR_CODE_DISK_FULL, ERROR_CODE_FILE_NOT_FOUND,
    ERROR_CODE_INVALID_FORMAT, ERROR_CODE_IO, ERROR_CODE_NETWORK_ERROR,
    ERROR_CODE_PERMISSION_DENIED, NOTE_FILE_EXTENSION, NOTE_FILE_PREFIX,
};
use crate::model::note::{NoteId, NoteRecord};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

static NOTE_FILE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^{}([0-9a-fA-F]{{8}}-[0-9a-fA-F]{{4}}-[0-9a-fA-F]{{4}}-[0-9a-fA-F]{{4}}-[0-9a-fA-F]{{12}})\.{}$",
        regex::escape(NOTE_FILE_PREFIX),
        regex::escape(NOTE_FILE_EXTENSION)
    ))
    .expect("valid note file name regex")
});

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence failure, classified so callers can tell kinds apart.
#[derive(Debug)]
pub enum StorageError {
    FileNotFound(PathBuf),
    /// File exists but is not a valid note (corrupted or foreign content).
    InvalidFormat { path: PathBuf, message: String },
    PermissionDenied { path: PathBuf, source: io::Error },
    DiskFull { path: PathBuf, source: io::Error },
    /// Reserved for remote storage backends.
    NetworkError(String),
    /// Any other I/O failure.
    Io { path: PathBuf, source: io::Error },
}

impl StorageError {
    /// Classifies an I/O error raised while touching `path`.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::FileNotFound(path),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, source },
            _ if is_disk_full(&source) => Self::DiskFull { path, source },
            _ => Self::Io { path, source },
        }
    }

    /// Stable numeric code shared with the host UI.
    pub fn code(&self) -> i64 {
        match self {
            Self::FileNotFound(_) => ERROR_CODE_FILE_NOT_FOUND,
            Self::InvalidFormat { .. } => ERROR_CODE_INVALID_FORMAT,
            Self::PermissionDenied { .. } => ERROR_CODE_PERMISSION_DENIED,
            Self::DiskFull { .. } => ERROR_CODE_DISK_FULL,
            Self::NetworkError(_) => ERROR_CODE_NETWORK_ERROR,
            Self::Io { .. } => ERROR_CODE_IO,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::FileNotFound(path)
            | Self::InvalidFormat { path, .. }
            | Self::PermissionDenied { path, .. }
            | Self::DiskFull { path, .. }
            | Self::Io { path, .. } => Some(path),
            Self::NetworkError(_) => None,
        }
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileNotFound(path) => write!(f, "file not found: {}", path.display()),
            Self::InvalidFormat { path, message } => {
                write!(f, "invalid note file {}: {message}", path.display())
            }
            Self::PermissionDenied { path, source } => {
                write!(f, "permission denied for {}: {source}", path.display())
            }
            Self::DiskFull { path, source } => {
                write!(f, "disk full while writing {}: {source}", path.display())
            }
            Self::NetworkError(message) => write!(f, "network error: {message}"),
            Self::Io { path, source } => write!(f, "i/o error on {}: {source}", path.display()),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PermissionDenied { source, .. }
            | Self::DiskFull { source, .. }
            | Self::Io { source, .. } => Some(source),
            Self::FileNotFound(_) | Self::InvalidFormat { .. } | Self::NetworkError(_) => None,
        }
    }
}

fn is_disk_full(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::StorageFull || err.raw_os_error().is_some_and(is_disk_full_code)
}

#[cfg(unix)]
fn is_disk_full_code(code: i32) -> bool {
    // ENOSPC
    code == 28
}

#[cfg(windows)]
fn is_disk_full_code(code: i32) -> bool {
    // ERROR_HANDLE_DISK_FULL, ERROR_DISK_FULL
    matches!(code, 39 | 112)
}

#[cfg(not(any(unix, windows)))]
fn is_disk_full_code(_code: i32) -> bool {
    false
}

/// File name for a note: `<prefix><uuid>.<ext>`.
pub fn note_file_name(id: NoteId) -> String {
    format!(
        "{NOTE_FILE_PREFIX}{}.{NOTE_FILE_EXTENSION}",
        id.as_hyphenated()
    )
}

/// Extracts the note ID from a conforming file name.
pub fn parse_note_file_name(name: &str) -> Option<NoteId> {
    let caps = NOTE_FILE_NAME_RE.captures(name)?;
    Uuid::parse_str(caps.get(1)?.as_str()).ok()
}

/// Persistence contract used by the note manager.
pub trait NoteRepository: Send {
    /// Writes `record` and returns the primary file path.
    fn save(&self, record: &NoteRecord) -> StorageResult<PathBuf>;
    /// Reads one note file.
    fn load(&self, path: &Path) -> StorageResult<NoteRecord>;
    /// Conforming note files, sorted by file name.
    fn list_note_files(&self) -> StorageResult<Vec<PathBuf>>;
    /// Archives the note file to the backup directory. Missing files are a no-op.
    fn delete(&self, id: NoteId) -> StorageResult<()>;
    /// Moves an unparseable file out of the save directory; returns its new path.
    fn quarantine(&self, path: &Path) -> StorageResult<PathBuf>;
    /// Primary path the note would be written to.
    fn note_path(&self, id: NoteId) -> PathBuf;

    fn exists(&self, id: NoteId) -> bool {
        self.note_path(id).is_file()
    }
}

/// JSON-file repository rooted at a save/backup directory pair.
#[derive(Debug, Clone)]
pub struct FileNoteRepository {
    config: StorageConfig,
}

impl FileNoteRepository {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Path of the previous generation of a note file.
    pub fn backup_path(&self, id: NoteId) -> PathBuf {
        self.config.backup_dir.join(note_file_name(id))
    }

    fn ensure_dir(dir: &Path) -> StorageResult<()> {
        fs::create_dir_all(dir).map_err(|err| StorageError::from_io(dir, err))
    }

    fn backup_existing(&self, primary: &Path, id: NoteId) {
        let target = self.backup_path(id);
        let result = Self::ensure_dir(&self.config.backup_dir).and_then(|()| {
            fs::copy(primary, &target)
                .map(|_| ())
                .map_err(|err| StorageError::from_io(&target, err))
        });
        if let Err(err) = result {
            warn!(
                "event=note_backup module=repo status=error note_id={} error_code={} error={}",
                id,
                err.code(),
                err
            );
        }
    }

    /// Moves `from` to `to`, falling back to copy+remove across devices.
    fn relocate(from: &Path, to: &Path) -> StorageResult<()> {
        if fs::rename(from, to).is_ok() {
            return Ok(());
        }
        fs::copy(from, to).map_err(|err| StorageError::from_io(to, err))?;
        fs::remove_file(from).map_err(|err| StorageError::from_io(from, err))
    }
}

impl NoteRepository for FileNoteRepository {
    fn save(&self, record: &NoteRecord) -> StorageResult<PathBuf> {
        Self::ensure_dir(&self.config.save_dir)?;
        let path = self.note_path(record.id);

        if path.is_file() {
            self.backup_existing(&path, record.id);
        }

        let encoded = serde_json::to_vec_pretty(record).map_err(|err| {
            StorageError::InvalidFormat {
                path: path.clone(),
                message: format!("serialization failed: {err}"),
            }
        })?;

        let tmp_path = self
            .config
            .save_dir
            .join(format!(".{}.tmp", note_file_name(record.id)));
        let write_result = File::create(&tmp_path)
            .and_then(|mut file| {
                file.write_all(&encoded)?;
                file.sync_all()
            })
            .map_err(|err| StorageError::from_io(&tmp_path, err));
        if let Err(err) = write_result {
            let _ = fs::remove_file(&tmp_path);
            return Err(err);
        }

        if let Err(err) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StorageError::from_io(&path, err));
        }

        debug!(
            "event=note_write module=repo status=ok note_id={} bytes={}",
            record.id,
            encoded.len()
        );
        Ok(path)
    }

    fn load(&self, path: &Path) -> StorageResult<NoteRecord> {
        let raw = fs::read(path).map_err(|err| StorageError::from_io(path, err))?;
        let record: NoteRecord =
            serde_json::from_slice(&raw).map_err(|err| StorageError::InvalidFormat {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;

        let expected_id = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(parse_note_file_name);
        if let Some(expected_id) = expected_id {
            if expected_id != record.id {
                return Err(StorageError::InvalidFormat {
                    path: path.to_path_buf(),
                    message: format!(
                        "identifier mismatch: file name has {expected_id}, content has {}",
                        record.id
                    ),
                });
            }
        }

        Ok(record)
    }

    fn list_note_files(&self) -> StorageResult<Vec<PathBuf>> {
        let dir = &self.config.save_dir;
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StorageError::from_io(dir, err)),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| StorageError::from_io(dir, err))?;
            let path = entry.path();
            let conforming = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| NOTE_FILE_NAME_RE.is_match(name));
            if conforming && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths)
    }

    fn delete(&self, id: NoteId) -> StorageResult<()> {
        let primary = self.note_path(id);
        if !primary.is_file() {
            return Ok(());
        }
        Self::ensure_dir(&self.config.backup_dir)?;
        Self::relocate(&primary, &self.backup_path(id))
    }

    fn quarantine(&self, path: &Path) -> StorageResult<PathBuf> {
        Self::ensure_dir(&self.config.backup_dir)?;
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown");
        let target = self
            .config
            .backup_dir
            .join(format!("{name}.{CORRUPT_FILE_SUFFIX}"));
        Self::relocate(path, &target)?;
        Ok(target)
    }

    fn note_path(&self, id: NoteId) -> PathBuf {
        self.config.save_dir.join(note_file_name(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_round_trips_through_parser() {
        let id = Uuid::new_v4();
        let name = note_file_name(id);
        assert!(name.starts_with(NOTE_FILE_PREFIX));
        assert!(name.ends_with(".json"));
        assert_eq!(parse_note_file_name(&name), Some(id));
    }

    #[test]
    fn parser_rejects_foreign_names() {
        assert_eq!(parse_note_file_name("note_abc.json"), None);
        assert_eq!(parse_note_file_name("readme.txt"), None);
        let id = Uuid::new_v4();
        assert_eq!(parse_note_file_name(&format!(".note_{id}.json.tmp")), None);
        assert_eq!(parse_note_file_name(&format!("note_{id}.json.corrupt")), None);
    }

    #[test]
    fn io_errors_are_classified_by_kind() {
        let not_found = StorageError::from_io("/x", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(not_found, StorageError::FileNotFound(_)));
        assert_eq!(not_found.code(), ERROR_CODE_FILE_NOT_FOUND);

        let denied =
            StorageError::from_io("/x", io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(denied.code(), ERROR_CODE_PERMISSION_DENIED);

        let full = StorageError::from_io("/x", io::Error::from(io::ErrorKind::StorageFull));
        assert_eq!(full.code(), ERROR_CODE_DISK_FULL);
    }

    #[cfg(unix)]
    #[test]
    fn enospc_is_disk_full() {
        let err = StorageError::from_io("/x", io::Error::from_raw_os_error(28));
        assert!(matches!(err, StorageError::DiskFull { .. }));
    }
}
