//! formdeck application
//!
//! The editor session shell: configuration, keyboard handling and
//! persistence wiring around the core document model.

mod config;
mod editor;
mod shortcuts;

pub use config::{EditorConfig, STORAGE_DIR_ENV};
pub use editor::EditorSession;
pub use shortcuts::{
    CommandSurface, FocusProbe, FocusTarget, KeyChord, Shortcut, ShortcutAction, ShortcutMap,
    ShortcutRegistry,
};

use formdeck_core::{StorageError, TransferError};
use thiserror::Error;

/// Errors surfaced by the application shell.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Import failed: {0}")]
    Transfer(#[from] TransferError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unknown key chord: {0}")]
    KeyChord(String),
    #[error("No component with id {0}")]
    UnknownComponent(String),
}
