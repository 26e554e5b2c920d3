//! Canonical display structure all render paths converge on.
//!
//! Serialization follows the conventions the chat view interprets:
//! a line fully wrapped in `**` is a heading, inline `**text**` is emphasis,
//! `•` starts a bullet, `*text*` marks a transient status and a blank line
//! separates paragraphs.

use std::fmt;

/// Inline run of text inside a paragraph
#[derive(Debug, Clone, PartialEq)]
pub enum Span {
    Text(String),
    Bold(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Vec<Span>),
    Bullets(Vec<String>),
    /// Blank line inside a section, e.g. between two prompt variants
    Break,
}

impl Block {
    pub fn text(text: impl Into<String>) -> Self {
        Block::Paragraph(vec![Span::Text(text.into())])
    }

    /// `**Label:** value` on a single line
    pub fn labeled(label: &str, value: impl Into<String>) -> Self {
        Block::Paragraph(vec![
            Span::Bold(format!("{label}:")),
            Span::Text(format!(" {}", value.into())),
        ])
    }

    /// `**Label:**` alone, introducing the lines that follow
    pub fn label(label: &str) -> Self {
        Block::Paragraph(vec![Span::Bold(format!("{label}:"))])
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    pub heading: Option<String>,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn titled(heading: impl Into<String>) -> Self {
        Self {
            heading: Some(heading.into()),
            blocks: Vec::new(),
        }
    }

    pub fn untitled() -> Self {
        Self::default()
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn with_blocks(mut self, blocks: impl IntoIterator<Item = Block>) -> Self {
        self.blocks.extend(blocks);
        self
    }

    /// A section only counts once it carries a non-empty block
    pub fn has_content(&self) -> bool {
        self.blocks.iter().any(|block| match block {
            Block::Paragraph(spans) => spans.iter().any(|span| match span {
                Span::Text(text) | Span::Bold(text) => !text.trim().is_empty(),
            }),
            Block::Bullets(items) => !items.is_empty(),
            Block::Break => false,
        })
    }
}

/// Ordered sections plus an optional trailing status marker
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplayDocument {
    sections: Vec<Section>,
    status: Option<String>,
}

impl DisplayDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a section, silently dropping it when it has nothing to show
    pub fn push(&mut self, section: Section) {
        if section.has_content() {
            self.sections.push(section);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Set the italic status line rendered after all sections
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Block::Paragraph(spans) => {
                for span in spans {
                    match span {
                        Span::Text(text) => f.write_str(text)?,
                        Span::Bold(text) => write!(f, "**{text}**")?,
                    }
                }
                Ok(())
            }
            Block::Bullets(items) => {
                let lines: Vec<String> = items.iter().map(|item| format!("• {item}")).collect();
                f.write_str(&lines.join("\n"))
            }
            Block::Break => Ok(()),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::with_capacity(self.blocks.len() + 1);
        if let Some(heading) = &self.heading {
            lines.push(format!("**{heading}:**"));
        }
        for block in &self.blocks {
            lines.push(block.to_string());
        }
        f.write_str(&lines.join("\n"))
    }
}

impl fmt::Display for DisplayDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.sections.iter().map(ToString::to_string).collect();
        if let Some(status) = &self.status {
            parts.push(status.clone());
        }
        f.write_str(&parts.join("\n\n"))
    }
}
