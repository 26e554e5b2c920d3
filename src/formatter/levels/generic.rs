//! Schema-free rendering of arbitrary JSON values.
//!
//! Used when a response carries no field the level knows about, for
//! unleveled JSON, and for the open-ended section values of the mastery
//! level. Keys become title-cased headings or labels; no JSON syntax is
//! ever written out.

use crate::formatter::document::{Block, DisplayDocument, Section};
use crate::formatter::fields::{inline_text, title_case, value_list, value_text};
use serde_json::{Map, Value};

/// Nested objects deeper than this collapse into single-line text
const MAX_NESTING: usize = 4;

/// Render any JSON value as a display document
pub fn render(value: &Value) -> DisplayDocument {
    let mut doc = DisplayDocument::new();
    match value {
        Value::Object(map) => {
            for (key, member) in map {
                doc.push(Section::titled(title_case(key)).with_blocks(value_blocks(member)));
            }
        }
        other => doc.push(Section::untitled().with_blocks(value_blocks(other))),
    }
    doc
}

/// Body blocks for a single value
pub fn value_blocks(value: &Value) -> Vec<Block> {
    blocks_at_depth(value, 0)
}

fn blocks_at_depth(value: &Value, depth: usize) -> Vec<Block> {
    match value {
        Value::Array(items) => array_blocks(items, depth),
        Value::Object(map) => object_lines(map, depth),
        scalar => value_text(scalar).map(Block::text).into_iter().collect(),
    }
}

/// Scalars become bullets; objects become labeled lines separated by blank lines
fn array_blocks(items: &[Value], depth: usize) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut pending = Vec::new();

    for item in items {
        match item {
            Value::Object(map) => {
                flush_bullets(&mut blocks, &mut pending);
                let lines = object_lines(map, depth + 1);
                if lines.is_empty() {
                    continue;
                }
                if !blocks.is_empty() {
                    blocks.push(Block::Break);
                }
                blocks.extend(lines);
            }
            other => pending.push(other.clone()),
        }
    }
    flush_bullets(&mut blocks, &mut pending);

    blocks
}

fn flush_bullets(blocks: &mut Vec<Block>, pending: &mut Vec<Value>) {
    if pending.is_empty() {
        return;
    }
    let items = value_list(&Value::Array(std::mem::take(pending)));
    if !items.is_empty() {
        blocks.push(Block::Bullets(items));
    }
}

/// One `**Label:** value` line per member, with list members as bullets under their label
pub fn object_lines(map: &Map<String, Value>, depth: usize) -> Vec<Block> {
    let mut blocks = Vec::new();

    for (key, value) in map {
        let label = title_case(key);
        match value {
            Value::Array(items) if items.iter().all(|item| !item.is_object()) => {
                let bullets = value_list(value);
                if !bullets.is_empty() {
                    blocks.push(Block::label(&label));
                    blocks.push(Block::Bullets(bullets));
                }
            }
            Value::Array(_) | Value::Object(_) if depth < MAX_NESTING => {
                let nested = blocks_at_depth(value, depth + 1);
                if !nested.is_empty() {
                    blocks.push(Block::label(&label));
                    blocks.extend(nested);
                }
            }
            other => {
                if let Some(text) = inline_text(other) {
                    blocks.push(Block::labeled(&label, text));
                }
            }
        }
    }

    blocks
}
