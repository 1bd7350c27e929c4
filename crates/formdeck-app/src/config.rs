//! Editor configuration.

use crate::AppError;
use formdeck_core::HistoryOptions;
use formdeck_core::history::DEFAULT_UNDO_LIMIT;
use formdeck_core::storage::DEFAULT_AUTOSAVE_DELAY_MS;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the storage directory.
pub const STORAGE_DIR_ENV: &str = "FORMDECK_STORAGE_DIR";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Maximum number of undo steps.
    pub undo_limit: usize,
    /// Whether selection moves are undoable.
    pub track_selection: bool,
    /// Quiet period before an auto-save.
    pub autosave_delay_ms: u64,
    /// Where questionnaires are stored; the platform data dir when unset.
    pub storage_dir: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            undo_limit: DEFAULT_UNDO_LIMIT,
            track_selection: true,
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            storage_dir: None,
        }
    }
}

impl EditorConfig {
    /// Load from a JSON file, or defaults without one. The storage dir
    /// environment variable wins over both.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
                Self::from_json(&text)?
            }
            None => Self::default(),
        };
        if let Some(dir) = std::env::var_os(STORAGE_DIR_ENV) {
            config.storage_dir = Some(PathBuf::from(dir));
        }
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, AppError> {
        serde_json::from_str(text).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn history_options(&self) -> HistoryOptions {
        HistoryOptions {
            limit: self.undo_limit,
            track_selection: self.track_selection,
        }
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{ "undo_limit": 5 }"#).unwrap();
        assert_eq!(config.undo_limit, 5);
        assert!(config.track_selection);
        assert_eq!(config.autosave_delay(), Duration::from_millis(DEFAULT_AUTOSAVE_DELAY_MS));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = EditorConfig::from_json(r#"{ "undo_limt": 5 }"#);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_history_options() {
        let config = EditorConfig {
            track_selection: false,
            ..EditorConfig::default()
        };
        let options = config.history_options();
        assert!(!options.track_selection);
        assert_eq!(options.limit, DEFAULT_UNDO_LIMIT);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("formdeck.json");
        std::fs::write(&path, r#"{ "autosave_delay_ms": 250 }"#).unwrap();

        let config = EditorConfig::load(Some(&path)).unwrap();
        assert_eq!(config.autosave_delay_ms, 250);

        let missing = EditorConfig::load(Some(&dir.path().join("missing.json")));
        assert!(matches!(missing, Err(AppError::Config(_))));
    }
}
