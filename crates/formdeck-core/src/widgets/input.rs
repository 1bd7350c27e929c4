//! Free-text answer widgets.

use super::{FieldKind, PropField, WidgetPlugin, object};
use crate::instance::{Instance, Props};
use serde_json::json;

const FIELDS: &[PropField] = &[
    PropField::new("title", "Question", FieldKind::Text),
    PropField::new("placeholder", "Placeholder", FieldKind::Text),
];

fn render_field(instance: &Instance, rows: usize) -> String {
    let title = instance.prop_str("title").unwrap_or_default();
    let placeholder = instance.prop_str("placeholder").unwrap_or_default();
    let mut out = format!("{title}\n[ {placeholder} ]");
    for _ in 1..rows {
        out.push_str("\n[ ]");
    }
    out
}

/// Single-line text answer.
pub struct InputWidget;

impl WidgetPlugin for InputWidget {
    fn kind(&self) -> &'static str {
        "questionInput"
    }

    fn title(&self) -> &'static str {
        "Input"
    }

    fn default_props(&self) -> Props {
        object(json!({ "title": "Input title", "placeholder": "Please enter..." }))
    }

    fn render(&self, instance: &Instance) -> String {
        render_field(instance, 1)
    }

    fn prop_fields(&self) -> &'static [PropField] {
        FIELDS
    }
}

/// Multi-line text answer.
pub struct TextareaWidget;

impl WidgetPlugin for TextareaWidget {
    fn kind(&self) -> &'static str {
        "questionTextarea"
    }

    fn title(&self) -> &'static str {
        "Textarea"
    }

    fn default_props(&self) -> Props {
        object(json!({ "title": "Textarea title", "placeholder": "Please enter..." }))
    }

    fn render(&self, instance: &Instance) -> String {
        render_field(instance, 3)
    }

    fn prop_fields(&self) -> &'static [PropField] {
        FIELDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textarea_renders_three_rows() {
        let inst = Instance::from_plugin(&TextareaWidget);
        let rendered = TextareaWidget.render(&inst);
        assert_eq!(rendered.lines().count(), 4);
        assert!(rendered.starts_with("Textarea title"));
    }
}
