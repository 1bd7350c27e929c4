//! Storage abstraction for questionnaire persistence.
//!
//! The editor core never talks to the network itself. It hands its current
//! questionnaire to a [`Storage`] backend through the debounced
//! [`AutoSaveManager`].

mod autosave;
mod file;
mod memory;

pub use autosave::{AutoSaveManager, DEFAULT_AUTOSAVE_DELAY_MS, LAST_QUESTIONNAIRE_KEY};
pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::questionnaire::Questionnaire;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Questionnaire not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for questionnaire storage backends.
pub trait Storage: Send + Sync {
    /// Save a questionnaire under `id`.
    fn save(&self, id: &str, questionnaire: &Questionnaire) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a questionnaire.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Questionnaire>>;

    /// Delete a questionnaire.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all questionnaire IDs.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a questionnaire exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Minimal executor for driving storage futures in tests.
#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
            return result;
        }
    }
}
