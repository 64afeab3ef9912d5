//! Headless StickyNote host.
//!
//! # Responsibility
//! - Act as a composition root: wire preferences, note storage and the note
//!   manager without a windowing system.
//! - Offer scriptable commands over the same core operations a GUI host uses.

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::warn;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use stickynote_core::config::DEFAULTS_DB_FILE_NAME;
use stickynote_core::{
    core_version, default_log_level, init_logging, DefaultsStore, FileNoteRepository,
    HeadlessPresenter, MemoryDefaultsStore, NoteFailure, NoteId, NoteManager, Preferences,
    SqliteDefaultsStore, StorageConfig, ThemeRegistry,
};

type Manager = NoteManager<FileNoteRepository, HeadlessPresenter>;

const LIST_PREVIEW_CHARS: usize = 40;

#[derive(Debug, Parser)]
#[command(name = "stickynote", version, about = "Manage sticky notes from the command line")]
struct Cli {
    /// Data directory holding notes, backups, defaults and logs.
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List live notes.
    List,
    /// Create a note.
    New { text: String },
    /// Replace a note's text.
    Edit { id: String, text: String },
    /// Remove a note (its file is archived to the backup directory).
    Remove { id: String },
    /// Step font size for one note, or all notes.
    Font {
        direction: FontDirection,
        #[arg(long)]
        note: Option<String>,
    },
    /// Set a note's theme.
    Theme { id: String, name: String },
    /// List available themes.
    Themes,
    /// Show or change preferences.
    #[command(subcommand)]
    Prefs(PrefsCommand),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FontDirection {
    Up,
    Down,
}

#[derive(Debug, Subcommand)]
enum PrefsCommand {
    Show,
    Set(PrefsSet),
    Reset,
}

#[derive(Debug, Args)]
struct PrefsSet {
    #[arg(long)]
    font_size: Option<f32>,
    #[arg(long)]
    theme: Option<String>,
    #[arg(long)]
    auto_save: Option<bool>,
    /// Seconds between auto-save passes.
    #[arg(long)]
    interval: Option<u64>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let data_dir = match resolve_data_dir(cli.data_dir.as_deref()) {
        Ok(dir) => dir,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::FAILURE;
        }
    };

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    if let Err(err) = init_logging(&level, data_dir.join("logs")) {
        eprintln!("warning: logging disabled: {err}");
    }

    let mut manager = build_manager(&data_dir);
    let restore = manager.restore_notes_from_disk();
    print_failures(&restore.failures);

    let mut exit = match run(&mut manager, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    };

    let report = manager.save_all_notes();
    if !report.is_clean() {
        print_failures(&report.failures);
        exit = ExitCode::FAILURE;
    }
    exit
}

fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf, String> {
    let dir = match explicit {
        Some(dir) => dir.to_path_buf(),
        None => std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".stickynote"))
            .ok_or_else(|| "HOME is not set; pass --data-dir".to_string())?,
    };
    if dir.is_absolute() {
        return Ok(dir);
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(dir))
        .map_err(|err| format!("cannot resolve data directory: {err}"))
}

fn build_manager(data_dir: &Path) -> Manager {
    let store: Box<dyn DefaultsStore> =
        match SqliteDefaultsStore::open(data_dir.join(DEFAULTS_DB_FILE_NAME)) {
            Ok(store) => Box::new(store),
            Err(err) => {
                warn!("event=cli_start module=cli status=degraded error={err}");
                eprintln!("warning: preferences will not persist: {err}");
                Box::new(MemoryDefaultsStore::new())
            }
        };
    let preferences = Preferences::load(store).into_shared();
    NoteManager::new(
        FileNoteRepository::new(StorageConfig::under(data_dir)),
        HeadlessPresenter::new(),
        preferences,
    )
}

fn run(manager: &mut Manager, command: Command) -> Result<(), String> {
    match command {
        Command::List => {
            for record in manager.all_notes() {
                println!(
                    "{}  {:>4.1}pt  {:<6}  {}",
                    record.id,
                    record.font_size,
                    record.theme,
                    preview_line(&record.text)
                );
            }
            println!("{} note(s), core {}", manager.note_count(), core_version());
        }
        Command::New { text } => {
            let id = manager.create_new_note_with_text(text);
            println!("{id}");
        }
        Command::Edit { id, text } => {
            let id = resolve_note(manager, &id)?;
            manager.on_note_text_changed(id, text);
        }
        Command::Remove { id } => {
            let id = resolve_note(manager, &id)?;
            manager.on_note_closed(id);
        }
        Command::Font { direction, note } => {
            let changed = match (direction, note) {
                (FontDirection::Up, None) => manager.increase_font_size_for_all_notes(),
                (FontDirection::Down, None) => manager.decrease_font_size_for_all_notes(),
                (direction, Some(note)) => {
                    let id = resolve_note(manager, &note)?;
                    let changed = match direction {
                        FontDirection::Up => manager.increase_font_size(id),
                        FontDirection::Down => manager.decrease_font_size(id),
                    };
                    usize::from(changed)
                }
            };
            println!("{changed} note(s) changed");
        }
        Command::Theme { id, name } => {
            let theme = ThemeRegistry::theme(&name).map_err(|err| err.to_string())?;
            let id = resolve_note(manager, &id)?;
            manager.set_note_theme(id, theme.name());
        }
        Command::Themes => {
            for theme in ThemeRegistry::all_themes() {
                println!(
                    "{:<6}  bg={}  text={}  {}",
                    theme.name(),
                    theme.background_color().to_hex(),
                    theme.text_color().to_hex(),
                    theme.accessibility_description()
                );
            }
        }
        Command::Prefs(PrefsCommand::Show) => print_preferences(manager),
        Command::Prefs(PrefsCommand::Set(set)) => {
            {
                let mut prefs = manager
                    .preferences()
                    .lock()
                    .map_err(|_| "preferences lock poisoned".to_string())?;
                if let Some(size) = set.font_size {
                    prefs.set_default_font_size(size);
                }
                if let Some(theme) = set.theme.as_deref() {
                    prefs.set_default_color_theme(theme);
                }
                if let Some(enabled) = set.auto_save {
                    prefs.set_auto_save_enabled(enabled);
                }
                if let Some(seconds) = set.interval {
                    prefs.set_auto_save_interval(seconds);
                }
            }
            manager.process_preference_changes();
            print_preferences(manager);
        }
        Command::Prefs(PrefsCommand::Reset) => {
            manager
                .preferences()
                .lock()
                .map_err(|_| "preferences lock poisoned".to_string())?
                .reset_to_defaults();
            manager.process_preference_changes();
            print_preferences(manager);
        }
    }
    Ok(())
}

/// First line of `text`, cut to `LIST_PREVIEW_CHARS` characters.
fn preview_line(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or("");
    first_line.chars().take(LIST_PREVIEW_CHARS).collect()
}

/// Accepts a full ID or any unambiguous prefix of its hyphenated form.
fn resolve_note(manager: &Manager, input: &str) -> Result<NoteId, String> {
    if let Ok(id) = NoteId::parse_str(input) {
        return manager
            .note(id)
            .map(|record| record.id)
            .ok_or_else(|| format!("no note with id {id}"));
    }
    let needle = input.trim().to_ascii_lowercase();
    let matches: Vec<NoteId> = manager
        .note_ids()
        .into_iter()
        .filter(|id| !needle.is_empty() && id.to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(format!("no note matches `{input}`")),
        _ => Err(format!("`{input}` matches {} notes", matches.len())),
    }
}

fn print_preferences(manager: &Manager) {
    let Ok(prefs) = manager.preferences().lock() else {
        eprintln!("error: preferences lock poisoned");
        return;
    };
    let values = prefs.values();
    println!("default_font_size   = {}", values.default_font_size);
    println!("default_color_theme = {}", values.default_color_theme);
    println!("auto_save_enabled   = {}", values.auto_save_enabled);
    println!("auto_save_interval  = {}s", values.auto_save_interval);
}

fn print_failures(failures: &[NoteFailure]) {
    for failure in failures {
        eprintln!("warning: {}", failure.user_message());
    }
}
