//! Placed widget instances and the factory that creates them.

use crate::widgets::WidgetPlugin;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of an instance.
///
/// Fresh ids are UUID v4 strings, but any non-empty string read back from
/// an export is kept as is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    /// Generate a fresh, globally unique id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstanceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for InstanceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Opaque property bag of a widget instance.
///
/// The document never looks inside; it only merges.
pub type Props = Map<String, Value>;

/// One widget placed in the questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub(crate) id: InstanceId,
    /// Widget type tag, resolved through the registry.
    #[serde(rename = "type")]
    pub kind: String,
    /// User-editable display label.
    pub title: String,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub props: Props,
}

impl Instance {
    /// Create a new instance with a fresh ID.
    pub fn new(kind: impl Into<String>, title: impl Into<String>, props: Props) -> Self {
        Self {
            id: InstanceId::generate(),
            kind: kind.into(),
            title: title.into(),
            is_hidden: false,
            is_locked: false,
            props,
        }
    }

    /// Create an instance of a registered widget, seeded with its defaults.
    pub fn from_plugin(plugin: &dyn WidgetPlugin) -> Self {
        Self::new(plugin.kind(), plugin.title(), plugin.default_props())
    }

    /// Get the unique identifier.
    pub fn id(&self) -> &InstanceId {
        &self.id
    }

    /// Give this instance a new unique ID.
    pub fn regenerate_id(&mut self) {
        self.id = InstanceId::generate();
    }

    /// Shallow-merge `partial` into the props: new keys overwrite, omitted keys stay.
    pub fn merge_props(&mut self, partial: Props) {
        for (key, value) in partial {
            self.props.insert(key, value);
        }
    }

    /// Get a string prop, if present and a string.
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    /// Get a boolean prop, defaulting to false.
    pub fn prop_bool(&self, key: &str) -> bool {
        self.props.get(key).and_then(Value::as_bool).unwrap_or(false)
    }
}
