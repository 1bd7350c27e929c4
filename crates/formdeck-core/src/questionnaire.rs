//! The persisted unit: page metadata plus the component list.

use crate::document::Document;
use crate::instance::Instance;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-questionnaire page settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageInfo {
    pub title: String,
    #[serde(rename = "desc")]
    pub description: String,
    /// Custom script injected into the published page.
    pub js: String,
    /// Custom stylesheet injected into the published page.
    pub css: String,
    pub is_published: bool,
}

impl Default for PageInfo {
    fn default() -> Self {
        Self {
            title: "Untitled questionnaire".to_string(),
            description: String::new(),
            js: String::new(),
            css: String::new(),
            is_published: false,
        }
    }
}

/// A saved questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    /// Unique questionnaire identifier.
    pub id: String,
    #[serde(default)]
    pub page: PageInfo,
    #[serde(rename = "componentList", default)]
    pub components: Vec<Instance>,
}

impl Default for Questionnaire {
    fn default() -> Self {
        Self::new()
    }
}

impl Questionnaire {
    /// Create a new empty questionnaire.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            page: PageInfo::default(),
            components: Vec::new(),
        }
    }

    /// Capture the component list of a document.
    pub fn from_document(id: impl Into<String>, page: PageInfo, document: &Document) -> Self {
        Self {
            id: id.into(),
            page,
            components: document.instances().to_vec(),
        }
    }

    /// Open the questionnaire for editing, with nothing selected.
    pub fn to_document(&self) -> Document {
        Document::with_instances(self.components.clone())
    }

    /// Serialize the questionnaire to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a questionnaire from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Props;

    #[test]
    fn test_document_round_trip() {
        let mut doc = Document::new();
        doc.add_instance(Instance::new("questionInput", "A", Props::new()));
        let q = Questionnaire::from_document("q1", PageInfo::default(), &doc);
        let loaded = Questionnaire::from_json(&q.to_json().unwrap()).unwrap();

        assert_eq!(loaded, q);
        assert_eq!(loaded.to_document().instances(), doc.instances());
    }

    #[test]
    fn test_page_info_defaults_when_missing() {
        let q = Questionnaire::from_json(r#"{ "id": "x" }"#).unwrap();
        assert_eq!(q.page, PageInfo::default());
        assert!(q.components.is_empty());

        let q = Questionnaire::from_json(r#"{ "id": "x", "page": { "desc": "hello" } }"#).unwrap();
        assert_eq!(q.page.title, "Untitled questionnaire");
        assert_eq!(q.page.description, "hello");
    }
}
