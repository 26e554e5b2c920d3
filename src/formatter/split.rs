//! Splitting of bracketed list text such as `["a, b", "c"]`.
//!
//! Used when a list only exists as text: a string field holding a serialized
//! array, or a list written into a plain-text reply. Items may contain commas
//! and nested brackets, and the last item may still be cut off.

/// Split list text on top-level commas.
///
/// Tracks bracket depth and quote state character by character, so commas
/// inside quoted items or nested containers never split. One layer of
/// surrounding quotes is stripped and escaped quotes are unescaped. Empty items
/// are dropped, and so is a trailing item whose quote was never closed: it
/// shows up once it is complete instead of flickering while it streams.
pub fn split_list_items(text: &str) -> Vec<String> {
    let mut content = text.trim();
    if let Some(rest) = content.strip_prefix('[') {
        content = rest;
    }
    if let Some(rest) = content.strip_suffix(']') {
        content = rest;
    }

    let mut items = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut in_string_escape = false;

    for ch in content.chars() {
        if let Some(open_quote) = quote {
            current.push(ch);
            if in_string_escape {
                in_string_escape = false;
            } else if ch == '\\' {
                in_string_escape = true;
            } else if ch == open_quote {
                quote = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' => {
                quote = Some(ch);
                current.push(ch);
            }
            '[' | '{' => {
                depth += 1;
                current.push(ch);
            }
            ']' | '}' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => {
                items.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }

    if quote.is_none() {
        items.push(current);
    }

    items
        .iter()
        .map(|item| clean_item(item))
        .filter(|item| !item.is_empty())
        .collect()
}

fn clean_item(item: &str) -> String {
    let trimmed = item.trim();
    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            let inner = &trimmed[1..trimmed.len() - 1];
            return unescape(inner, quote).trim().to_string();
        }
    }
    trimmed.to_string()
}

fn unescape(inner: &str, quote: char) -> String {
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.peek() {
                Some(&next) if next == quote || next == '\\' => {
                    result.push(next);
                    chars.next();
                }
                Some('n') => {
                    result.push('\n');
                    chars.next();
                }
                _ => result.push(ch),
            }
        } else {
            result.push(ch);
        }
    }
    result
}

/// Remove repeated items, keeping the first occurrence of each
pub fn dedupe(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
