//! formdeck core library
//!
//! Platform-agnostic document model and edit state machine for the formdeck
//! questionnaire editor.

pub mod document;
pub mod history;
pub mod instance;
pub mod questionnaire;
pub mod reorder;
pub mod storage;
pub mod transfer;
pub mod widgets;

pub use document::{Direction, Document, EditAction};
pub use history::{History, HistoryOptions, DEFAULT_UNDO_LIMIT};
pub use instance::{Instance, InstanceId, Props};
pub use questionnaire::{PageInfo, Questionnaire};
pub use reorder::DragEnd;
pub use storage::{AutoSaveManager, FileStorage, MemoryStorage, Storage, StorageError};
pub use transfer::{ImportPayload, TransferError, export_json, parse_import};
pub use widgets::{WidgetPlugin, WidgetRegistry};
