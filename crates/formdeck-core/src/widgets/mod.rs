//! Widget registry for the questionnaire palette.
//!
//! Every widget type is a [`WidgetPlugin`]: it names its type tag, provides
//! default props, and knows how to render and edit an instance of itself.
//! The document store never looks at widget-specific props; it only asks the
//! registry for defaults when creating an instance.

mod choice;
mod input;
mod text;

pub use choice::{CheckboxWidget, RadioWidget};
pub use input::{InputWidget, TextareaWidget};
pub use text::{InfoWidget, ParagraphWidget, TitleWidget};

use crate::instance::{Instance, Props};
use std::collections::HashMap;
use thiserror::Error;

/// Registry errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Widget type already registered: {0}")]
    DuplicateKind(String),
}

/// Kind of input a property editor shows for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    MultilineText,
    Bool,
    Number,
    /// A list of `{ value, text }` entries.
    Options,
}

/// One editable property of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl PropField {
    pub const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { key, label, kind }
    }
}

/// Answer count for one option of a choice widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCount {
    pub value: String,
    pub label: String,
    pub count: usize,
}

/// Optional statistics capability of a widget.
pub trait WidgetStatistics {
    /// Summarize collected answers for an instance of this widget.
    fn summarize(&self, instance: &Instance, answers: &[String]) -> Vec<StatCount>;
}

/// Capability set of one widget type.
pub trait WidgetPlugin: Send + Sync {
    /// Stable type tag, unique across the registry.
    fn kind(&self) -> &'static str;

    /// Display label in the palette.
    fn title(&self) -> &'static str;

    /// Props a freshly created instance starts with.
    fn default_props(&self) -> Props;

    /// Plain-text preview of an instance.
    fn render(&self, instance: &Instance) -> String;

    /// Fields shown by the property editor.
    fn prop_fields(&self) -> &'static [PropField];

    /// Statistics capability, if the widget collects countable answers.
    fn statistics(&self) -> Option<&dyn WidgetStatistics> {
        None
    }
}

/// A labelled palette group.
pub struct WidgetGroup {
    pub label: &'static str,
    plugins: Vec<Box<dyn WidgetPlugin>>,
}

impl WidgetGroup {
    /// Plugins in palette order.
    pub fn plugins(&self) -> impl Iterator<Item = &dyn WidgetPlugin> {
        self.plugins.iter().map(|p| p.as_ref())
    }
}

/// Static table of widget types, built once at startup.
pub struct WidgetRegistry {
    groups: Vec<WidgetGroup>,
    /// Type tag -> (group index, plugin index).
    index: HashMap<&'static str, (usize, usize)>,
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl WidgetRegistry {
    /// Create an empty registry.
    pub fn empty() -> Self {
        Self {
            groups: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create a registry holding the built-in questionnaire widgets.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        let builtins: Vec<(&'static str, Box<dyn WidgetPlugin>)> = vec![
            ("Text", Box::new(TitleWidget)),
            ("Text", Box::new(ParagraphWidget)),
            ("Text", Box::new(InfoWidget)),
            ("Input", Box::new(InputWidget)),
            ("Input", Box::new(TextareaWidget)),
            ("Choice", Box::new(RadioWidget)),
            ("Choice", Box::new(CheckboxWidget)),
        ];
        for (group, plugin) in builtins {
            // Built-in tags are distinct
            if let Err(e) = registry.register(group, plugin) {
                log::error!("{}", e);
            }
        }
        registry
    }

    /// Register a plugin under a palette group, creating the group if needed.
    pub fn register(
        &mut self,
        group: &'static str,
        plugin: Box<dyn WidgetPlugin>,
    ) -> Result<(), RegistryError> {
        let kind = plugin.kind();
        if self.index.contains_key(kind) {
            return Err(RegistryError::DuplicateKind(kind.to_string()));
        }

        let group_idx = match self.groups.iter().position(|g| g.label == group) {
            Some(idx) => idx,
            None => {
                self.groups.push(WidgetGroup {
                    label: group,
                    plugins: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        let plugins = &mut self.groups[group_idx].plugins;
        plugins.push(plugin);
        self.index.insert(kind, (group_idx, plugins.len() - 1));
        Ok(())
    }

    /// Palette groups in display order.
    pub fn groups(&self) -> &[WidgetGroup] {
        &self.groups
    }

    /// Look up a widget type. `None` means "render nothing".
    pub fn lookup(&self, kind: &str) -> Option<&dyn WidgetPlugin> {
        let &(group, plugin) = self.index.get(kind)?;
        Some(self.groups[group].plugins[plugin].as_ref())
    }

    /// Create a new instance of a widget type, or `None` for an unknown type.
    pub fn create_instance(&self, kind: &str) -> Option<Instance> {
        self.lookup(kind).map(Instance::from_plugin)
    }

    /// Render an instance through its plugin; unknown types render nothing.
    pub fn render(&self, instance: &Instance) -> Option<String> {
        self.lookup(&instance.kind).map(|p| p.render(instance))
    }

    /// Number of registered widget types.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if no widget types are registered.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Build a `Props` map from a JSON object literal.
pub(crate) fn object(value: serde_json::Value) -> Props {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Props::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_groups_in_order() {
        let registry = WidgetRegistry::builtin();
        let labels: Vec<_> = registry.groups().iter().map(|g| g.label).collect();
        assert_eq!(labels, vec!["Text", "Input", "Choice"]);

        let text: Vec<_> = registry.groups()[0].plugins().map(|p| p.kind()).collect();
        assert_eq!(text, vec!["questionTitle", "questionParagraph", "questionInfo"]);
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn test_lookup() {
        let registry = WidgetRegistry::builtin();
        let plugin = registry.lookup("questionRadio").unwrap();
        assert_eq!(plugin.title(), "Radio");
        assert!(plugin.statistics().is_some());
        assert!(registry.lookup("questionInput").unwrap().statistics().is_none());
    }

    #[test]
    fn test_lookup_unknown_is_none() {
        let registry = WidgetRegistry::builtin();
        assert!(registry.lookup("questionRetired").is_none());
        assert!(registry.create_instance("questionRetired").is_none());

        let orphan = Instance::new("questionRetired", "Old", Props::new());
        assert!(registry.render(&orphan).is_none());
    }

    #[test]
    fn test_duplicate_kind_rejected() {
        let mut registry = WidgetRegistry::builtin();
        let result = registry.register("Text", Box::new(TitleWidget));
        assert!(matches!(result, Err(RegistryError::DuplicateKind(k)) if k == "questionTitle"));
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn test_register_new_group() {
        let mut registry = WidgetRegistry::empty();
        assert!(registry.is_empty());
        registry.register("Custom", Box::new(InputWidget)).unwrap();
        assert_eq!(registry.groups().len(), 1);
        assert_eq!(registry.groups()[0].label, "Custom");
    }

    #[test]
    fn test_create_instance_uses_defaults() {
        let registry = WidgetRegistry::builtin();
        let a = registry.create_instance("questionInput").unwrap();
        let b = registry.create_instance("questionInput").unwrap();

        assert_ne!(a.id(), b.id());
        assert_eq!(a.title, "Input");
        assert_eq!(a.props, InputWidget.default_props());
    }
}
