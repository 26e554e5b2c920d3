//! Re-wrapping of finished plain-text replies that already carry section labels.
//!
//! Stored replies (library entries, completed chats) often arrive as text with
//! lines such as `Optimized Prompt:` or `**Changes made:**`. Those labels are
//! turned into the canonical heading and body shape. Text without any known
//! label is returned trimmed and otherwise untouched.

use super::document::{Block, DisplayDocument, Section};
use super::split::{dedupe, split_list_items};
use regex::Regex;
use std::sync::OnceLock;
use tracing::trace;

/// Recognized labels and the heading each one renders as
const SECTION_LABELS: [(&str, &str); 18] = [
    ("optimized prompt", "Optimized Prompt"),
    ("changes made", "Changes Made"),
    ("techniques applied", "Techniques Applied"),
    ("pro tip", "Pro Tip"),
    ("share message", "Share Message"),
    ("system prompt", "System Prompt"),
    ("key enhancements", "Key Enhancements"),
    ("role", "Role"),
    ("objective", "Objective"),
    ("audience", "Audience"),
    ("context", "Context"),
    ("task", "Task"),
    ("constraints", "Constraints"),
    ("overview", "Overview"),
    ("deconstruct", "Deconstruct"),
    ("diagnose", "Diagnose"),
    ("develop", "Develop"),
    ("deliver", "Deliver"),
];

/// Labels that stay inline when they appear inside an optimized prompt
const PROMPT_PART_LABELS: [&str; 5] = ["role", "objective", "context", "task", "constraints"];

fn label_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let alternatives: Vec<&str> = SECTION_LABELS.iter().map(|(label, _)| *label).collect();
        let pattern = format!(
            r"(?i)^[ \t]*(?:#+[ \t]*)?(?:\*\*)?[ \t]*({})[ \t]*(?:\*\*)?[ \t]*:[ \t]*(?:\*\*)?[ \t]*(.*)$",
            alternatives.join("|")
        );
        Regex::new(&pattern).expect("section label pattern")
    })
}

/// A line that starts a labeled section
struct LabelLine {
    key: String,
    heading: &'static str,
    rest: String,
}

fn parse_label_line(line: &str) -> Option<LabelLine> {
    let captures = label_regex().captures(line)?;
    let key = captures.get(1)?.as_str().to_lowercase();
    let heading = SECTION_LABELS
        .iter()
        .find(|(label, _)| *label == key)
        .map(|(_, heading)| *heading)?;
    let rest = captures
        .get(2)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    Some(LabelLine { key, heading, rest })
}

/// Collected text of one labeled section
struct RawSection {
    heading: Option<&'static str>,
    lines: Vec<String>,
}

/// Turn a labeled plain-text reply into the canonical display format
pub fn format_structured(text: &str) -> String {
    let mut sections: Vec<RawSection> = Vec::new();
    let mut current = RawSection {
        heading: None,
        lines: Vec::new(),
    };
    let mut found_label = false;

    for line in text.lines() {
        if let Some(label) = parse_label_line(line) {
            let inside_prompt = current.heading == Some("Optimized Prompt");
            if inside_prompt && PROMPT_PART_LABELS.contains(&label.key.as_str()) {
                current.lines.push(line.to_string());
                continue;
            }

            trace!("Recognized section label '{}'", label.heading);
            found_label = true;
            sections.push(std::mem::replace(
                &mut current,
                RawSection {
                    heading: Some(label.heading),
                    lines: Vec::new(),
                },
            ));
            if !label.rest.is_empty() {
                current.lines.push(label.rest);
            }
        } else {
            current.lines.push(line.to_string());
        }
    }
    sections.push(current);

    if !found_label {
        return text.trim().to_string();
    }

    let mut doc = DisplayDocument::new();
    for raw in sections {
        let section = match raw.heading {
            Some(heading) => Section::titled(heading),
            None => Section::untitled(),
        };
        doc.push(section.with_blocks(body_blocks(&raw.lines)));
    }
    doc.to_string()
}

/// Body lines become a bullet list, paragraphs, or inline prompt parts
fn body_blocks(lines: &[String]) -> Vec<Block> {
    let joined = lines.join("\n");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if is_list_text(trimmed) {
        let items = dedupe(split_list_items(trimmed));
        return if items.is_empty() {
            Vec::new()
        } else {
            vec![Block::Bullets(items)]
        };
    }

    let mut blocks = Vec::new();
    let mut bullets: Vec<String> = Vec::new();
    let mut pending_break = false;

    for line in trimmed.lines() {
        let line = line.trim();
        if line.is_empty() {
            flush(&mut blocks, &mut bullets);
            pending_break = !blocks.is_empty();
            continue;
        }
        if pending_break {
            blocks.push(Block::Break);
            pending_break = false;
        }

        if let Some(item) = bullet_item(line) {
            bullets.push(item.to_string());
            continue;
        }
        flush(&mut blocks, &mut bullets);

        match parse_label_line(line) {
            Some(part) if part.rest.is_empty() => blocks.push(Block::label(part.heading)),
            Some(part) => blocks.push(Block::labeled(part.heading, part.rest)),
            None => blocks.push(Block::text(line)),
        }
    }
    flush(&mut blocks, &mut bullets);

    blocks
}

/// A bracketed list of quoted items, as opposed to a placeholder like `[Role]`
fn is_list_text(body: &str) -> bool {
    let Some(inner) = body.strip_prefix('[') else {
        return false;
    };
    matches!(inner.trim_start().chars().next(), Some('"' | '\'' | ']'))
}

fn flush(blocks: &mut Vec<Block>, bullets: &mut Vec<String>) {
    if !bullets.is_empty() {
        blocks.push(Block::Bullets(dedupe(std::mem::take(bullets))));
    }
}

fn bullet_item(line: &str) -> Option<&str> {
    ["• ", "- ", "* ", "•"]
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .map(str::trim)
        .filter(|item| !item.is_empty())
}
