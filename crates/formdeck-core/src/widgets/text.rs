//! Display-only widgets: title, paragraph and questionnaire info.

use super::{FieldKind, PropField, WidgetPlugin, object};
use crate::instance::{Instance, Props};
use serde_json::{Value, json};

/// Section heading.
pub struct TitleWidget;

impl TitleWidget {
    const FIELDS: &'static [PropField] = &[
        PropField::new("text", "Title", FieldKind::Text),
        PropField::new("level", "Level", FieldKind::Number),
        PropField::new("isCenter", "Centered", FieldKind::Bool),
    ];
}

impl WidgetPlugin for TitleWidget {
    fn kind(&self) -> &'static str {
        "questionTitle"
    }

    fn title(&self) -> &'static str {
        "Title"
    }

    fn default_props(&self) -> Props {
        object(json!({ "text": "Title", "level": 1, "isCenter": false }))
    }

    fn render(&self, instance: &Instance) -> String {
        let level = instance
            .props
            .get("level")
            .and_then(Value::as_u64)
            .unwrap_or(1)
            .clamp(1, 5) as usize;
        let text = instance.prop_str("text").unwrap_or_default();
        format!("{} {}", "#".repeat(level), text)
    }

    fn prop_fields(&self) -> &'static [PropField] {
        Self::FIELDS
    }
}

/// Free-form paragraph.
pub struct ParagraphWidget;

impl ParagraphWidget {
    const FIELDS: &'static [PropField] = &[
        PropField::new("text", "Text", FieldKind::MultilineText),
        PropField::new("isCenter", "Centered", FieldKind::Bool),
    ];
}

impl WidgetPlugin for ParagraphWidget {
    fn kind(&self) -> &'static str {
        "questionParagraph"
    }

    fn title(&self) -> &'static str {
        "Paragraph"
    }

    fn default_props(&self) -> Props {
        object(json!({ "text": "One line of paragraph", "isCenter": false }))
    }

    fn render(&self, instance: &Instance) -> String {
        instance.prop_str("text").unwrap_or_default().to_string()
    }

    fn prop_fields(&self) -> &'static [PropField] {
        Self::FIELDS
    }
}

/// Questionnaire heading with a description.
pub struct InfoWidget;

impl InfoWidget {
    const FIELDS: &'static [PropField] = &[
        PropField::new("title", "Title", FieldKind::Text),
        PropField::new("desc", "Description", FieldKind::MultilineText),
    ];
}

impl WidgetPlugin for InfoWidget {
    fn kind(&self) -> &'static str {
        "questionInfo"
    }

    fn title(&self) -> &'static str {
        "Questionnaire info"
    }

    fn default_props(&self) -> Props {
        object(json!({ "title": "Questionnaire title", "desc": "Questionnaire description" }))
    }

    fn render(&self, instance: &Instance) -> String {
        let title = instance.prop_str("title").unwrap_or_default();
        match instance.prop_str("desc") {
            Some(desc) if !desc.is_empty() => format!("{title}\n{desc}"),
            _ => title.to_string(),
        }
    }

    fn prop_fields(&self) -> &'static [PropField] {
        Self::FIELDS
    }
}
