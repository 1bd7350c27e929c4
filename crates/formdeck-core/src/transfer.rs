//! JSON import and export of a document, for manual backup and restore.
//!
//! The payload is an object with a required `componentList` array and
//! optional `selectedId` and `copiedComponent` keys. Import validates the
//! whole payload before anything is applied, so a rejected import leaves the
//! document untouched.

use crate::document::{Document, EditAction};
use crate::instance::{Instance, InstanceId};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// Import/export errors.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Expected a JSON object at the top level")]
    NotAnObject,
    #[error("Missing 'componentList' array")]
    MissingComponentList,
    #[error("'componentList' is not an array")]
    ComponentListNotArray,
    #[error("Invalid component at index {index}: {source}")]
    InvalidComponent {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Component at index {index} has an empty id")]
    EmptyId { index: usize },
    #[error("Duplicate component id {0}")]
    DuplicateId(InstanceId),
}

/// Result type for transfer operations.
pub type TransferResult<T> = Result<T, TransferError>;

/// A validated import, ready to be applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPayload {
    pub instances: Vec<Instance>,
    pub selected_id: Option<InstanceId>,
    pub clipboard: Option<Instance>,
}

impl ImportPayload {
    /// Turn the payload into the full-replace edit.
    pub fn into_action(self) -> EditAction {
        EditAction::ReplaceAll {
            instances: self.instances,
            selected_id: self.selected_id,
            clipboard: self.clipboard,
        }
    }
}

/// Parse and validate an exported document.
pub fn parse_import(json: &str) -> TransferResult<ImportPayload> {
    let data: Value = serde_json::from_str(json)?;
    let object = data.as_object().ok_or(TransferError::NotAnObject)?;

    let list = object
        .get("componentList")
        .ok_or(TransferError::MissingComponentList)?
        .as_array()
        .ok_or(TransferError::ComponentListNotArray)?;

    let mut seen = HashSet::new();
    let mut instances = Vec::with_capacity(list.len());
    for (index, entry) in list.iter().enumerate() {
        let inst: Instance = serde_json::from_value(entry.clone())
            .map_err(|source| TransferError::InvalidComponent { index, source })?;
        if inst.id().is_empty() {
            return Err(TransferError::EmptyId { index });
        }
        if !seen.insert(inst.id().clone()) {
            return Err(TransferError::DuplicateId(inst.id().clone()));
        }
        instances.push(inst);
    }

    let selected_id = match object.get("selectedId") {
        None | Some(Value::Null) => None,
        // An empty string is the "no selection" sentinel of older exports
        Some(Value::String(s)) if s.is_empty() => None,
        Some(value) => match serde_json::from_value::<InstanceId>(value.clone()) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("Ignoring unreadable selectedId: {}", e);
                None
            }
        },
    };

    let clipboard = match object.get("copiedComponent") {
        None | Some(Value::Null) => None,
        Some(value) => match serde_json::from_value::<Instance>(value.clone()) {
            Ok(inst) => Some(inst),
            Err(e) => {
                log::warn!("Ignoring unreadable copiedComponent: {}", e);
                None
            }
        },
    };

    Ok(ImportPayload {
        instances,
        selected_id,
        clipboard,
    })
}

/// Serialize the whole document to pretty JSON.
pub fn export_json(document: &Document) -> TransferResult<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// File name offered for a download of the document.
pub fn export_file_name(page_title: &str) -> String {
    let stem: String = page_title
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.trim_matches('_').is_empty() {
        "questionnaire.json".to_string()
    } else {
        format!("{}.json", stem)
    }
}
