//! Choice widgets: single choice (radio) and multiple choice (checkbox).
//!
//! Both collect countable answers, so both expose a statistics capability.

use super::{FieldKind, PropField, StatCount, WidgetPlugin, WidgetStatistics, object};
use crate::instance::{Instance, Props};
use serde_json::{Value, json};

/// A `{ value, text }` entry read from a props array.
struct ChoiceOption<'a> {
    value: &'a str,
    text: &'a str,
    checked: bool,
}

fn options<'a>(instance: &'a Instance, key: &str) -> Vec<ChoiceOption<'a>> {
    instance
        .props
        .get(key)
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let value = entry.get("value")?.as_str()?;
                    let text = entry.get("text").and_then(Value::as_str).unwrap_or(value);
                    let checked = entry.get("checked").and_then(Value::as_bool).unwrap_or(false);
                    Some(ChoiceOption { value, text, checked })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn count_answers<'a>(
    options: &[ChoiceOption<'_>],
    answers: impl Iterator<Item = &'a str>,
) -> Vec<StatCount> {
    let mut counts: Vec<StatCount> = options
        .iter()
        .map(|o| StatCount {
            value: o.value.to_string(),
            label: o.text.to_string(),
            count: 0,
        })
        .collect();
    for answer in answers {
        if let Some(stat) = counts.iter_mut().find(|s| s.value == answer) {
            stat.count += 1;
        }
    }
    counts
}

fn join_rows(title: &str, rows: Vec<String>, vertical: bool) -> String {
    let sep = if vertical { "\n" } else { "  " };
    format!("{title}\n{}", rows.join(sep))
}

const RADIO_FIELDS: &[PropField] = &[
    PropField::new("title", "Question", FieldKind::Text),
    PropField::new("isVertical", "Vertical", FieldKind::Bool),
    PropField::new("options", "Options", FieldKind::Options),
    PropField::new("value", "Default", FieldKind::Text),
];

/// Single choice.
pub struct RadioWidget;

impl WidgetPlugin for RadioWidget {
    fn kind(&self) -> &'static str {
        "questionRadio"
    }

    fn title(&self) -> &'static str {
        "Radio"
    }

    fn default_props(&self) -> Props {
        object(json!({
            "title": "Radio title",
            "isVertical": false,
            "options": [
                { "value": "item1", "text": "Option 1" },
                { "value": "item2", "text": "Option 2" },
                { "value": "item3", "text": "Option 3" },
            ],
            "value": "",
        }))
    }

    fn render(&self, instance: &Instance) -> String {
        let selected = instance.prop_str("value").unwrap_or_default();
        let rows = options(instance, "options")
            .iter()
            .map(|o| {
                let mark = if o.value == selected { "(*)" } else { "( )" };
                format!("{mark} {}", o.text)
            })
            .collect();
        join_rows(
            instance.prop_str("title").unwrap_or_default(),
            rows,
            instance.prop_bool("isVertical"),
        )
    }

    fn prop_fields(&self) -> &'static [PropField] {
        RADIO_FIELDS
    }

    fn statistics(&self) -> Option<&dyn WidgetStatistics> {
        Some(self)
    }
}

impl WidgetStatistics for RadioWidget {
    fn summarize(&self, instance: &Instance, answers: &[String]) -> Vec<StatCount> {
        count_answers(&options(instance, "options"), answers.iter().map(String::as_str))
    }
}

const CHECKBOX_FIELDS: &[PropField] = &[
    PropField::new("title", "Question", FieldKind::Text),
    PropField::new("isVertical", "Vertical", FieldKind::Bool),
    PropField::new("list", "Options", FieldKind::Options),
];

/// Multiple choice. Each answer is a comma-separated list of option values.
pub struct CheckboxWidget;

impl WidgetPlugin for CheckboxWidget {
    fn kind(&self) -> &'static str {
        "questionCheckbox"
    }

    fn title(&self) -> &'static str {
        "Checkbox"
    }

    fn default_props(&self) -> Props {
        object(json!({
            "title": "Checkbox title",
            "isVertical": false,
            "list": [
                { "value": "item1", "text": "Option 1", "checked": false },
                { "value": "item2", "text": "Option 2", "checked": false },
                { "value": "item3", "text": "Option 3", "checked": false },
            ],
        }))
    }

    fn render(&self, instance: &Instance) -> String {
        let rows = options(instance, "list")
            .iter()
            .map(|o| {
                let mark = if o.checked { "[x]" } else { "[ ]" };
                format!("{mark} {}", o.text)
            })
            .collect();
        join_rows(
            instance.prop_str("title").unwrap_or_default(),
            rows,
            instance.prop_bool("isVertical"),
        )
    }

    fn prop_fields(&self) -> &'static [PropField] {
        CHECKBOX_FIELDS
    }

    fn statistics(&self) -> Option<&dyn WidgetStatistics> {
        Some(self)
    }
}

impl WidgetStatistics for CheckboxWidget {
    fn summarize(&self, instance: &Instance, answers: &[String]) -> Vec<StatCount> {
        let picked = answers
            .iter()
            .flat_map(|a| a.split(','))
            .map(str::trim)
            .filter(|v| !v.is_empty());
        count_answers(&options(instance, "list"), picked)
    }
}
