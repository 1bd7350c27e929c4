//! formdeck command-line entry point.

use clap::{Parser, Subcommand, ValueEnum};
use formdeck_app::{AppError, EditorConfig, EditorSession, FocusTarget, KeyChord, ShortcutRegistry};
use formdeck_core::storage::{
    AutoSaveManager, FileStorage, LAST_QUESTIONNAIRE_KEY, MemoryStorage, Storage, StorageError,
};
use formdeck_core::{InstanceId, WidgetRegistry};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "formdeck", version, about = "Questionnaire editor")]
struct Cli {
    /// Editor configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the widget palette and keyboard shortcuts
    Palette,
    /// Preview an exported questionnaire, or the last one saved to the store
    Show { file: Option<PathBuf> },
    /// Replay key presses against an exported questionnaire
    Replay {
        file: PathBuf,
        /// Comma-separated chords, e.g. "ArrowDown,Ctrl+C,Ctrl+V"
        #[arg(long, value_delimiter = ',')]
        keys: Vec<String>,
        /// Element holding focus while the keys are pressed
        #[arg(long, value_enum, default_value_t = Focus::Body)]
        focus: Focus,
        /// Write the edited document here
        #[arg(long)]
        out: Option<PathBuf>,
        /// Also save the result to the questionnaire store
        #[arg(long)]
        store: bool,
    },
    /// Summarize answers for a choice widget
    Stats {
        file: PathBuf,
        id: String,
        #[arg(long, value_delimiter = ';')]
        answers: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Focus {
    Body,
    Item,
    Input,
    Textarea,
}

impl From<Focus> for FocusTarget {
    fn from(focus: Focus) -> Self {
        match focus {
            Focus::Body => FocusTarget::Body,
            Focus::Item => FocusTarget::SortableItem,
            Focus::Input => FocusTarget::TextInput,
            Focus::Textarea => FocusTarget::TextArea,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = EditorConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Palette => {
            print_palette();
            Ok(())
        }
        Command::Show { file } => {
            let session = match file {
                Some(file) => open_file::<FileStorage>(&config, &file)?,
                None => open_last_saved(&config)?,
            };
            for line in session.render_preview() {
                println!("{}\n", line);
            }
            Ok(())
        }
        Command::Replay {
            file,
            keys,
            focus,
            out,
            store,
        } => replay(&config, &file, &keys, focus.into(), out.as_deref(), store),
        Command::Stats { file, id, answers } => {
            let session = open_file::<MemoryStorage>(&config, &file)?;
            let id = InstanceId::from(id);
            match session.statistics(&id, &answers) {
                Some(counts) => {
                    for stat in counts {
                        println!("{}\t{}", stat.count, stat.label);
                    }
                }
                None if session.document().get(&id).is_none() => {
                    return Err(AppError::UnknownComponent(id.to_string()));
                }
                None => println!("No statistics for this component"),
            }
            Ok(())
        }
    }
}

fn print_palette() {
    let registry = WidgetRegistry::builtin();
    for group in registry.groups() {
        println!("{}", group.label);
        for plugin in group.plugins() {
            println!("  {:<20} {}", plugin.kind(), plugin.title());
        }
    }
    println!("\nShortcuts");
    for shortcut in ShortcutRegistry::all() {
        println!("  {:<20} {}", shortcut.format(), shortcut.description);
    }
}

fn open_file<S: Storage>(config: &EditorConfig, file: &Path) -> Result<EditorSession<S>, AppError> {
    let text = std::fs::read_to_string(file)?;
    let mut session = EditorSession::new(WidgetRegistry::builtin(), config.history_options());
    session.import_json(&text)?;
    Ok(session)
}

fn file_storage(config: &EditorConfig) -> Result<FileStorage, AppError> {
    let storage = match &config.storage_dir {
        Some(dir) => FileStorage::new(dir.clone())?,
        None => FileStorage::default_location()?,
    };
    Ok(storage)
}

fn open_last_saved(config: &EditorConfig) -> Result<EditorSession<FileStorage>, AppError> {
    let manager = AutoSaveManager::new(Arc::new(file_storage(config)?));
    let mut session = EditorSession::new(WidgetRegistry::builtin(), config.history_options())
        .with_autosave(manager);
    if !pollster::block_on(session.open_last()) {
        return Err(StorageError::NotFound(LAST_QUESTIONNAIRE_KEY.to_string()).into());
    }
    Ok(session)
}

fn replay(
    config: &EditorConfig,
    file: &Path,
    keys: &[String],
    focus: FocusTarget,
    out: Option<&Path>,
    store: bool,
) -> Result<(), AppError> {
    let chords = keys
        .iter()
        .map(|k| KeyChord::parse(k).ok_or_else(|| AppError::KeyChord(k.clone())))
        .collect::<Result<Vec<_>, _>>()?;

    let mut session = if store {
        let mut manager = AutoSaveManager::new(Arc::new(file_storage(config)?));
        manager.set_delay(config.autosave_delay());
        EditorSession::new(WidgetRegistry::builtin(), config.history_options()).with_autosave(manager)
    } else {
        EditorSession::<FileStorage>::new(WidgetRegistry::builtin(), config.history_options())
    };
    session.import_json(&std::fs::read_to_string(file)?)?;

    let mut changed = 0;
    for chord in &chords {
        if session.handle_key(chord, &focus) {
            changed += 1;
        }
    }
    log::info!("Replayed {} keys, {} changed the document", chords.len(), changed);

    let json = session.export_json()?;
    match out {
        Some(path) => {
            std::fs::write(path, json)?;
            log::info!("Exported to {}", path.display());
        }
        None => println!("{}", json),
    }

    if store && pollster::block_on(session.flush())? {
        log::info!("Saved questionnaire {}", session.questionnaire().id);
    }
    Ok(())
}
