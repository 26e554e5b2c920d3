//! Field extraction from partially received optimization JSON.
//!
//! The table is rebuilt from the whole buffer on every update. All top-level
//! `"key": value` matches are collected with their byte offsets, sorted by
//! position and folded into an ordered map, so a key the model re-emits later
//! in the buffer always replaces the earlier value.

use super::lexer::{self, ObjectEntry, PartialValue};
use super::split::dedupe;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

/// Buffers shorter than this carry too little signal to extract anything
const MIN_EXTRACT_LEN: usize = 10;

/// Latest value extracted for one top-level key
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Decoded string, possibly still growing
    Text(String),
    /// Array of strings or scalars, decoded and deduplicated in first-seen order
    List(Vec<String>),
    /// Object, or array holding objects, converted best-effort
    Structured(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
    pub value: FieldValue,
    /// Whether the value's closing delimiter has been received
    pub complete: bool,
    /// Byte offset of the match the value came from
    pub start: usize,
}

/// Latest extracted value per top-level key, valid for a single buffer snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldTable {
    fields: IndexMap<String, FieldEntry>,
    closed: bool,
}

impl FieldTable {
    pub fn get(&self, key: &str) -> Option<&FieldEntry> {
        self.fields.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Keys in order of their last occurrence in the buffer
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Whether the buffer this table came from already ends with a closing `}`
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// A top-level key match found while scanning the buffer
#[derive(Debug)]
struct FieldMatch {
    start: usize,
    key: String,
    value: PartialValue,
}

/// Extract the latest value of every top-level key from a possibly truncated buffer.
///
/// Returns an empty table when the buffer does not start with `{` or is too short
/// to hold anything meaningful. Callers must treat an empty table as "not ready".
pub fn extract_fields(buffer: &str) -> FieldTable {
    let trimmed = buffer.trim();
    if !trimmed.starts_with('{') || buffer.len() < MIN_EXTRACT_LEN {
        return FieldTable::default();
    }

    let mut matches: Vec<FieldMatch> = lexer::scan_objects(buffer)
        .into_iter()
        .filter_map(|(_, value)| match value {
            PartialValue::Object { entries, .. } => Some(entries),
            _ => None,
        })
        .flatten()
        .map(|ObjectEntry { key, start, value }| FieldMatch { start, key, value })
        .collect();

    // The lexer already yields matches in buffer order; sorting keeps the
    // overwrite rule independent of how matches were collected.
    matches.sort_by_key(|m| m.start);

    let mut fields = IndexMap::new();
    for field_match in matches {
        let Some(entry) = decode_match(&field_match) else {
            debug!(
                "Skipping unterminated value for key '{}' at offset {}",
                field_match.key, field_match.start
            );
            continue;
        };
        // Later occurrences win and move to the end of the key order
        fields.shift_remove(&field_match.key);
        fields.insert(field_match.key, entry);
    }

    FieldTable {
        fields,
        closed: trimmed.ends_with('}'),
    }
}

fn decode_match(field_match: &FieldMatch) -> Option<FieldEntry> {
    let complete = field_match.value.is_complete();
    let value = match &field_match.value {
        PartialValue::String { text, .. } => FieldValue::Text(text.clone()),
        PartialValue::Scalar { raw, complete } => {
            if !complete {
                return None;
            }
            FieldValue::Text(raw.clone())
        }
        PartialValue::Array { items, .. } => {
            if items.iter().any(|item| {
                matches!(
                    item,
                    PartialValue::Object { .. } | PartialValue::Array { .. }
                )
            }) {
                FieldValue::Structured(field_match.value.to_json()?)
            } else {
                FieldValue::List(decode_list(&field_match.value)?)
            }
        }
        PartialValue::Object { .. } => FieldValue::Structured(field_match.value.to_json()?),
    };

    Some(FieldEntry {
        value,
        complete,
        start: field_match.start,
    })
}

fn decode_list(array: &PartialValue) -> Option<Vec<String>> {
    let Value::Array(values) = array.to_json()? else {
        return None;
    };

    let items = values
        .into_iter()
        .filter_map(|value| match value {
            Value::String(text) => Some(text),
            Value::Null => None,
            other => Some(other.to_string()),
        })
        .filter(|item| !item.trim().is_empty())
        .collect();

    Some(dedupe(items))
}
