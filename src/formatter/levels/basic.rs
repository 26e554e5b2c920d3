use crate::formatter::document::{Block, DisplayDocument, Section};
use crate::formatter::fields::FieldSource;

/// Optimized prompt, the list of changes, then the share message without a heading
pub fn render(source: &dyn FieldSource) -> DisplayDocument {
    let mut doc = DisplayDocument::new();

    if let Some(prompt) = source.text("optimized_prompt") {
        doc.push(Section::titled("Optimized Prompt").with_block(Block::text(prompt)));
    }

    let changes = source.list("changes_made");
    if !changes.is_empty() {
        doc.push(Section::titled("Changes Made").with_block(Block::Bullets(changes)));
    }

    if let Some(share) = source.text("share_message") {
        doc.push(Section::untitled().with_block(Block::text(share)));
    }

    doc
}
