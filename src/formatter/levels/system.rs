use super::generic;
use crate::formatter::document::{Block, DisplayDocument, Section};
use crate::formatter::fields::FieldSource;

const PROFILE_FIELDS: [(&str, &str); 4] = [
    ("role", "Role"),
    ("objective", "Objective"),
    ("audience", "Audience"),
    ("context", "Context"),
];

pub fn render(source: &dyn FieldSource) -> DisplayDocument {
    let mut doc = DisplayDocument::new();

    if let Some(prompt) = source.text("system_prompt") {
        doc.push(Section::titled("System Prompt").with_block(Block::text(prompt)));
    }

    let enhancements = source.list("key_enhancements");
    if !enhancements.is_empty() {
        doc.push(Section::titled("Key Enhancements").with_block(Block::Bullets(enhancements)));
    }

    for (key, heading) in PROFILE_FIELDS {
        if let Some(value) = source.value(key) {
            doc.push(Section::titled(heading).with_blocks(generic::value_blocks(&value)));
        }
    }

    doc
}
