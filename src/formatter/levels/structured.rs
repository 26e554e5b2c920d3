//! Structured level: the optimized prompt may be plain text, a single
//! role/objective/context/task/constraints object, or several such objects.

use super::RenderMode;
use crate::formatter::document::{Block, DisplayDocument, Section};
use crate::formatter::fields::{value_list, value_text, FieldSource};
use crate::types::DEFAULT_SHARE_MESSAGE;
use serde_json::{Map, Value};

/// Sub-fields of a prompt object, in display order
const PROMPT_PARTS: [(&str, &str); 5] = [
    ("role", "Role"),
    ("objective", "Objective"),
    ("context", "Context"),
    ("task", "Task"),
    ("constraints", "Constraints"),
];

pub fn render(source: &dyn FieldSource, mode: RenderMode) -> DisplayDocument {
    let prompt_blocks = source
        .value("optimized_prompt")
        .map(|value| prompt_blocks(&value))
        .unwrap_or_default();
    let changes = source.list("changes_made");
    let techniques = source.list("techniques_applied");
    let pro_tip = source.text("pro_tip");
    let share = source.text("share_message");

    let mut doc = DisplayDocument::new();

    let only_pro_tip = pro_tip.is_some()
        && prompt_blocks.is_empty()
        && changes.is_empty()
        && techniques.is_empty()
        && share.is_none();

    if only_pro_tip {
        if let Some(tip) = pro_tip {
            doc.push(Section::untitled().with_block(Block::text(tip)));
        }
        if mode == RenderMode::Complete {
            doc.push(share_block());
        }
        return doc;
    }

    doc.push(Section::titled("Optimized Prompt").with_blocks(prompt_blocks));
    if !changes.is_empty() {
        doc.push(Section::titled("Changes Made").with_block(Block::Bullets(changes)));
    }
    if !techniques.is_empty() {
        doc.push(Section::titled("Techniques Applied").with_block(Block::Bullets(techniques)));
    }
    if let Some(tip) = pro_tip {
        doc.push(Section::titled("Pro Tip").with_block(Block::text(tip)));
    }

    match share {
        Some(message) => {
            doc.push(Section::titled("Share Message").with_block(Block::text(message)))
        }
        // Nothing rendered yet means the caller falls back; the promo block alone is not content
        None if mode == RenderMode::Complete && !doc.is_empty() => doc.push(share_block()),
        None => {}
    }

    doc
}

fn share_block() -> Section {
    Section::untitled().with_block(Block::text(DEFAULT_SHARE_MESSAGE))
}

/// Blocks for the optimized prompt in any of its three shapes
fn prompt_blocks(value: &Value) -> Vec<Block> {
    match value {
        Value::Object(map) => object_blocks(map),
        Value::Array(entries) => {
            let mut blocks = Vec::new();
            for entry in entries {
                let entry_blocks = match entry {
                    Value::Object(map) => object_blocks(map),
                    other => value_text(other).map(Block::text).into_iter().collect(),
                };
                if entry_blocks.is_empty() {
                    continue;
                }
                if !blocks.is_empty() {
                    blocks.push(Block::Break);
                }
                blocks.extend(entry_blocks);
            }
            blocks
        }
        other => value_text(other).map(Block::text).into_iter().collect(),
    }
}

/// Role, objective and context render inline; task and constraints may be lists
fn object_blocks(map: &Map<String, Value>) -> Vec<Block> {
    let mut blocks = Vec::new();

    for (key, label) in PROMPT_PARTS {
        let Some(value) = map.get(key) else {
            continue;
        };
        match value {
            Value::Array(_) => {
                let items = value_list(value);
                if !items.is_empty() {
                    blocks.push(Block::label(label));
                    blocks.push(Block::Bullets(items));
                }
            }
            other => {
                if let Some(text) = value_text(other) {
                    blocks.push(Block::labeled(label, text));
                }
            }
        }
    }

    blocks
}
