//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::questionnaire::Questionnaire;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    questionnaires: RwLock<HashMap<String, Questionnaire>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, questionnaire: &Questionnaire) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let questionnaire = questionnaire.clone();
        Box::pin(async move {
            let mut stored = self.questionnaires.write().map_err(lock_error)?;
            stored.insert(id, questionnaire);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Questionnaire>> {
        let id = id.to_string();
        Box::pin(async move {
            let stored = self.questionnaires.read().map_err(lock_error)?;
            stored.get(&id).cloned().ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut stored = self.questionnaires.write().map_err(lock_error)?;
            stored.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let stored = self.questionnaires.read().map_err(lock_error)?;
            Ok(stored.keys().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let stored = self.questionnaires.read().map_err(lock_error)?;
            Ok(stored.contains_key(&id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::block_on;

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let q = Questionnaire::new();

        block_on(storage.save("test", &q)).unwrap();
        let loaded = block_on(storage.load("test")).unwrap();

        assert_eq!(q, loaded);
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = block_on(storage.load("nonexistent"));

        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_exists_and_delete() {
        let storage = MemoryStorage::new();
        let q = Questionnaire::new();

        assert!(!block_on(storage.exists("test")).unwrap());
        block_on(storage.save("test", &q)).unwrap();
        assert!(block_on(storage.exists("test")).unwrap());
        block_on(storage.delete("test")).unwrap();
        assert!(!block_on(storage.exists("test")).unwrap());
    }

    #[test]
    fn test_list() {
        let storage = MemoryStorage::new();
        let q = Questionnaire::new();

        block_on(storage.save("q1", &q)).unwrap();
        block_on(storage.save("q2", &q)).unwrap();

        let mut list = block_on(storage.list()).unwrap();
        list.sort();
        assert_eq!(list, vec!["q1".to_string(), "q2".to_string()]);
    }
}
