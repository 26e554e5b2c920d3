//! Uniform field access for both render paths.
//!
//! A fully parsed JSON object and a [`FieldTable`] extracted from a truncated
//! buffer expose the same accessors, so each level renderer is written once and
//! applies identical rules (blank detection, list decoding, deduplication)
//! whether the response is finished or still streaming.

use super::extractor::{FieldTable, FieldValue};
use super::split::{dedupe, split_list_items};
use serde_json::{Map, Value};

pub trait FieldSource {
    /// Raw value for `key`, if present at all
    fn value(&self, key: &str) -> Option<Value>;

    /// Non-blank text for `key`
    fn text(&self, key: &str) -> Option<String> {
        self.value(key).as_ref().and_then(value_text)
    }

    /// Non-blank, deduplicated list items for `key`
    fn list(&self, key: &str) -> Vec<String> {
        self.value(key).as_ref().map(value_list).unwrap_or_default()
    }
}

impl FieldSource for Map<String, Value> {
    fn value(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

impl FieldSource for FieldTable {
    fn value(&self, key: &str) -> Option<Value> {
        let entry = self.get(key)?;
        Some(match &entry.value {
            FieldValue::Text(text) => Value::String(text.clone()),
            FieldValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            FieldValue::Structured(value) => value.clone(),
        })
    }
}

/// Values the chat view must never show: empty, `null`, or empty containers
pub fn is_blank(text: &str) -> bool {
    matches!(text.trim(), "" | "null" | "[]" | "{}" | "\"\"")
}

/// Scalar text of a value; `None` for blanks and containers
pub fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    if is_blank(&text) {
        None
    } else {
        Some(text.trim().to_string())
    }
}

/// Decode list items from an array, or from a string holding bracketed list text
pub fn value_list(value: &Value) -> Vec<String> {
    let items = match value {
        Value::Array(values) => values.iter().filter_map(inline_text).collect(),
        Value::String(text) if text.trim_start().starts_with('[') => split_list_items(text),
        Value::String(text) if !is_blank(text) => vec![text.trim().to_string()],
        _ => Vec::new(),
    };

    dedupe(items.into_iter().filter(|item| !is_blank(item)).collect())
}

/// Single-line rendering of any value, used for list items and nested members
pub fn inline_text(value: &Value) -> Option<String> {
    match value {
        Value::Array(values) => {
            let parts: Vec<String> = values.iter().filter_map(inline_text).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Object(map) => {
            let parts: Vec<String> = map
                .iter()
                .filter_map(|(key, value)| {
                    inline_text(value).map(|text| format!("{}: {}", title_case(key), text))
                })
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        scalar => value_text(scalar),
    }
}

/// `key_enhancements` → `Key Enhancements`
pub fn title_case(key: &str) -> String {
    key.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
