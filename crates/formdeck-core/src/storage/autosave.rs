//! Debounced auto-save.
//!
//! Every edit restarts a quiet period; the questionnaire is written once the
//! user has stopped editing for that long. Typing latency never waits on the
//! storage backend because saving is driven separately from the edit path.

use crate::questionnaire::Questionnaire;
use crate::storage::{Storage, StorageResult};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default quiet period before an auto-save, in milliseconds.
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 1000;

/// Key for the "last opened" questionnaire.
pub const LAST_QUESTIONNAIRE_KEY: &str = "__last_questionnaire__";

/// Manages debounced questionnaire persistence.
pub struct AutoSaveManager<S: Storage> {
    /// Storage backend.
    storage: Arc<S>,
    /// Quiet period after the last edit.
    delay: Duration,
    /// Time of the most recent unsaved edit.
    last_change: Option<Instant>,
    /// Whether the questionnaire has unsaved changes.
    dirty: bool,
}

impl<S: Storage> AutoSaveManager<S> {
    /// Create a new auto-save manager with the given storage backend.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            delay: Duration::from_millis(DEFAULT_AUTOSAVE_DELAY_MS),
            last_change: None,
            dirty: false,
        }
    }

    /// Set the quiet period.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Get the quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record an edit. Restarts the quiet period.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.last_change = Some(Instant::now());
    }

    /// Check if the questionnaire has unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Check if the quiet period has passed since the last edit, as of `now`.
    pub fn should_save_at(&self, now: Instant) -> bool {
        match (self.dirty, self.last_change) {
            (true, Some(changed)) => now.saturating_duration_since(changed) >= self.delay,
            _ => false,
        }
    }

    /// Check if a save is due now.
    pub fn should_save(&self) -> bool {
        self.should_save_at(Instant::now())
    }

    /// Save the questionnaire if a save is due.
    /// Returns true if save was performed.
    pub async fn maybe_save(&mut self, questionnaire: &Questionnaire) -> StorageResult<bool> {
        if !self.should_save() {
            return Ok(false);
        }

        self.save(questionnaire).await?;
        Ok(true)
    }

    /// Force save the questionnaire immediately.
    pub async fn save(&mut self, questionnaire: &Questionnaire) -> StorageResult<()> {
        self.storage.save(&questionnaire.id, questionnaire).await?;
        self.storage.save(LAST_QUESTIONNAIRE_KEY, questionnaire).await?;

        log::info!(
            "Saved questionnaire {} ({} components)",
            questionnaire.id,
            questionnaire.components.len()
        );
        self.dirty = false;
        self.last_change = None;
        Ok(())
    }

    /// Load a questionnaire by ID.
    pub async fn load(&mut self, id: &str) -> StorageResult<Questionnaire> {
        let questionnaire = self.storage.load(id).await?;
        self.dirty = false;
        self.last_change = None;
        Ok(questionnaire)
    }

    /// Try to load the last saved questionnaire.
    pub async fn load_last(&mut self) -> Option<Questionnaire> {
        match self.storage.load(LAST_QUESTIONNAIRE_KEY).await {
            Ok(questionnaire) => {
                self.dirty = false;
                self.last_change = None;
                Some(questionnaire)
            }
            Err(_) => None,
        }
    }

    /// List all saved questionnaire IDs.
    pub async fn list(&self) -> StorageResult<Vec<String>> {
        let mut ids = self.storage.list().await?;
        ids.retain(|id| id != LAST_QUESTIONNAIRE_KEY);
        Ok(ids)
    }

    /// Get a reference to the storage backend.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, block_on};

    fn manager() -> AutoSaveManager<MemoryStorage> {
        AutoSaveManager::new(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_autosave_manager_creation() {
        let manager = manager();
        assert!(!manager.is_dirty());
        assert!(!manager.should_save());
    }

    #[test]
    fn test_debounce_waits_for_quiet_period() {
        let mut manager = manager();
        manager.set_delay(Duration::from_millis(500));
        manager.mark_dirty();

        let now = Instant::now();
        assert!(!manager.should_save_at(now));
        assert!(manager.should_save_at(now + Duration::from_millis(600)));
    }

    #[test]
    fn test_zero_delay_saves_immediately() {
        let mut manager = manager();
        manager.set_delay(Duration::ZERO);
        manager.mark_dirty();

        let q = Questionnaire::new();
        assert!(block_on(manager.maybe_save(&q)).unwrap());
        assert!(!manager.is_dirty());
        assert!(!block_on(manager.maybe_save(&q)).unwrap());
    }

    #[test]
    fn test_load_last() {
        let mut manager = manager();
        let mut q = Questionnaire::new();
        q.page.title = "Customer survey".to_string();
        manager.mark_dirty();
        block_on(manager.save(&q)).unwrap();

        let mut manager2 = AutoSaveManager::new(manager.storage().clone());
        let loaded = block_on(manager2.load_last()).expect("Should load last questionnaire");
        assert_eq!(loaded.page.title, "Customer survey");

        let by_id = block_on(manager2.load(&q.id)).unwrap();
        assert_eq!(by_id, q);
    }

    #[test]
    fn test_list_excludes_special_key() {
        let mut manager = manager();
        let q = Questionnaire::new();
        block_on(manager.save(&q)).unwrap();

        let list = block_on(manager.list()).unwrap();
        assert_eq!(list, vec![q.id.clone()]);
    }
}
