//! Conversion of Python-literal dictionaries into JSON text.
//!
//! Some backends stringify their result with Python's `repr`, producing
//! `{'optimized_prompt': 'text', 'done': True}`. The converter rewrites quoting
//! and the `True`/`False`/`None` literals so the regular JSON path can take
//! over. It never fails; text that still is not JSON simply fails to parse later.

use regex::Regex;
use std::sync::OnceLock;

fn single_quoted_key() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"'[A-Za-z_][A-Za-z0-9_ ]*'\s*:").expect("single-quoted key pattern")
    })
}

fn double_quoted_key() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#""[A-Za-z_][A-Za-z0-9_ ]*"\s*:"#).expect("double-quoted key pattern")
    })
}

/// Whether `text` holds a single-quoted dictionary rather than JSON or prose.
///
/// Requires an opening brace or bracket and at least one `'key':` pair, and no
/// JSON-style `"key":` pair, so apostrophes in ordinary sentences do not count.
pub fn looks_like_dict(text: &str) -> bool {
    (text.contains('{') || text.contains('['))
        && single_quoted_key().is_match(text)
        && !double_quoted_key().is_match(text)
}

/// Whether `text` contains a bare JSON `"key":` fragment
pub fn has_json_key(text: &str) -> bool {
    double_quoted_key().is_match(text)
}

/// Rewrite a Python literal (starting at its first `{` or `[`) as JSON text
pub fn to_json_text(text: &str) -> String {
    let start = text.find(['{', '[']).unwrap_or(0);
    let source = &text[start..];

    let mut out = String::with_capacity(source.len());
    let mut quote: Option<char> = None;
    let mut in_string_escape = false;
    let mut chars = source.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        if let Some(open_quote) = quote {
            if in_string_escape {
                in_string_escape = false;
                // \' is not a JSON escape; the quote needs no escaping inside "..."
                if ch == '\'' {
                    out.pop();
                }
                out.push(ch);
                continue;
            }
            match ch {
                '\\' => {
                    in_string_escape = true;
                    out.push(ch);
                }
                c if c == open_quote => {
                    quote = None;
                    out.push('"');
                }
                '"' => out.push_str("\\\""),
                '\n' => out.push_str("\\n"),
                _ => out.push(ch),
            }
            continue;
        }

        match ch {
            '\'' | '"' => {
                quote = Some(ch);
                out.push('"');
            }
            '}' | ']' => {
                // Python tolerates a trailing comma before the closing bracket
                let trimmed_len = out.trim_end().len();
                if out[..trimmed_len].ends_with(',') {
                    out.truncate(trimmed_len - 1);
                }
                out.push(ch);
            }
            c if c.is_ascii_alphabetic() => {
                let word_end = source[index..]
                    .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
                    .map_or(source.len(), |offset| index + offset);
                let word = &source[index..word_end];
                let replacement = match word {
                    "True" => "true",
                    "False" => "false",
                    "None" => "null",
                    other => other,
                };
                out.push_str(replacement);
                while chars.peek().is_some_and(|(next, _)| *next < word_end) {
                    chars.next();
                }
            }
            _ => out.push(ch),
        }
    }

    out
}
