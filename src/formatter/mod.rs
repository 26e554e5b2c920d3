//! Streaming response formatter.
//!
//! [`format`] is called with the full text received so far on every socket
//! message and returns the complete display string for that message, which
//! replaces the previous rendering. Each call is independent: the buffer is
//! classified from scratch and routed to the complete, partial, dict-like or
//! plain-text path. No path returns raw JSON syntax from unparsed input.

use crate::types::{OptimizationLevel, EMPTY_RESULT, GENERATING, GENERATING_OPTIMIZED};
use serde_json::Value;
use tracing::{debug, trace};

pub mod document;
pub mod extractor;
pub mod fields;
pub mod levels;
pub mod lexer;
pub mod plain;
pub mod pydict;
pub mod split;

#[cfg(test)]
mod extractor_tests;
#[cfg(test)]
mod formatter_tests;
#[cfg(test)]
mod plain_tests;
#[cfg(test)]
pub(crate) mod test_utils;

pub use document::{Block, DisplayDocument, Section, Span};
pub use extractor::{extract_fields, FieldEntry, FieldTable, FieldValue};
pub use levels::RenderMode;
pub use plain::format_structured;

/// What the current buffer looks like
#[derive(Debug, Clone, PartialEq)]
pub enum BufferKind {
    Empty,
    /// Parses as a complete JSON document
    CompleteJson(Value),
    /// Starts like JSON but does not parse yet
    IncompleteJson,
    /// Python-literal dictionary with single-quoted keys
    DictLike,
    /// Contains a `"key":` fragment without starting like JSON
    AmbiguousFragment,
    Plain,
}

/// Classify a buffer snapshot. Stateless: the same buffer always yields the same kind.
pub fn classify(buffer: &str) -> BufferKind {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return BufferKind::Empty;
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return BufferKind::CompleteJson(value);
        }
        if pydict::looks_like_dict(trimmed) {
            return BufferKind::DictLike;
        }
        return BufferKind::IncompleteJson;
    }

    if pydict::looks_like_dict(trimmed) {
        BufferKind::DictLike
    } else if pydict::has_json_key(trimmed) {
        BufferKind::AmbiguousFragment
    } else {
        BufferKind::Plain
    }
}

/// Format the cumulative buffer of one streaming response for display.
///
/// Never fails: partial or malformed JSON resolves to whatever can be rendered
/// so far, or to a placeholder while nothing can.
pub fn format(buffer: &str, level: Option<OptimizationLevel>) -> String {
    format_snapshot(buffer, level, false)
}

/// Format the last buffer of a response that will not grow any further.
///
/// Same as [`format`], except that a document cut off before its end renders
/// what it holds without a generating indicator, and falls back to the
/// empty-result line instead of a placeholder.
pub fn format_final(buffer: &str, level: Option<OptimizationLevel>) -> String {
    format_snapshot(buffer, level, true)
}

fn format_snapshot(buffer: &str, level: Option<OptimizationLevel>, last: bool) -> String {
    let kind = classify(buffer);
    trace!(
        "Formatting {} bytes as {} (level: {:?}, last: {})",
        buffer.len(),
        kind_name(&kind),
        level,
        last
    );

    let (pending, pending_prompt) = if last {
        (EMPTY_RESULT, EMPTY_RESULT)
    } else {
        (GENERATING, GENERATING_OPTIMIZED)
    };
    match kind {
        BufferKind::Empty => String::new(),
        BufferKind::CompleteJson(value) => match level {
            Some(level) => render_complete(&value, level),
            None => render_generic(&value),
        },
        BufferKind::IncompleteJson => match level {
            Some(level) => render_fields(&extract_fields(buffer), level, last)
                .unwrap_or_else(|| pending_prompt.to_string()),
            None => pending.to_string(),
        },
        BufferKind::DictLike => format_dict_like(buffer, level, last),
        BufferKind::AmbiguousFragment => pending.to_string(),
        BufferKind::Plain => buffer.to_string(),
    }
}

/// Entry point for hosts holding untyped message data: anything but a string formats to ""
pub fn format_value(data: &Value, level: Option<OptimizationLevel>) -> String {
    match data {
        Value::String(buffer) => format(buffer, level),
        _ => String::new(),
    }
}

/// Render a fully parsed response for the given level.
///
/// Falls back to the generic renderer when none of the level's fields has
/// content, so a complete response never renders blank.
pub fn render_complete(parsed: &Value, level: OptimizationLevel) -> String {
    let doc = match parsed {
        Value::Object(map) => levels::render_level(map, level, RenderMode::Complete),
        _ => DisplayDocument::new(),
    };

    if doc.is_empty() {
        debug!(
            "None of the {} fields {:?} has content, using generic rendering",
            level,
            level.known_fields()
        );
        return render_generic(parsed);
    }
    doc.to_string()
}

/// Render a field table extracted from an incomplete buffer.
///
/// Returns `None` when no field produced content yet, which callers must
/// distinguish from an intentionally blank result. While the buffer has not
/// been closed, a generating indicator follows the rendered sections.
pub fn render_partial(table: &FieldTable, level: OptimizationLevel) -> Option<String> {
    render_fields(table, level, false)
}

fn render_fields(table: &FieldTable, level: OptimizationLevel, last: bool) -> Option<String> {
    if table.is_empty() {
        return None;
    }

    let mut doc = levels::render_level(table, level, RenderMode::Partial);
    if doc.is_empty() {
        return None;
    }
    if !last && !table.is_closed() {
        doc.set_status(crate::types::GENERATING_INDICATOR);
    }
    Some(doc.to_string())
}

fn render_generic(value: &Value) -> String {
    let doc = levels::generic::render(value);
    if doc.is_empty() {
        EMPTY_RESULT.to_string()
    } else {
        doc.to_string()
    }
}

/// Convert a Python-literal dictionary to JSON and run it through the JSON paths
fn format_dict_like(buffer: &str, level: Option<OptimizationLevel>, last: bool) -> String {
    let converted = pydict::to_json_text(buffer);

    match serde_json::from_str::<Value>(converted.trim()) {
        Ok(value) => match level {
            Some(level) => render_complete(&value, level),
            None => render_generic(&value),
        },
        Err(err) => {
            debug!("Dict-like buffer is not complete JSON after conversion: {}", err);
            let fallback = if last { EMPTY_RESULT } else { GENERATING };
            level
                .and_then(|level| render_fields(&extract_fields(&converted), level, last))
                .unwrap_or_else(|| fallback.to_string())
        }
    }
}

fn kind_name(kind: &BufferKind) -> &'static str {
    match kind {
        BufferKind::Empty => "empty",
        BufferKind::CompleteJson(_) => "complete-json",
        BufferKind::IncompleteJson => "incomplete-json",
        BufferKind::DictLike => "dict-like",
        BufferKind::AmbiguousFragment => "ambiguous-fragment",
        BufferKind::Plain => "plain",
    }
}
