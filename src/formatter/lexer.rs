//! Tolerant lexer for JSON documents that may be cut off at any byte.
//!
//! The model streams its JSON answer token by token, so the buffer we get is
//! usually a prefix of a valid document. Instead of pattern matching the raw
//! text, the lexer walks the buffer once and builds a tree of [`PartialValue`]
//! nodes. Every node knows whether it was closed, and every object entry keeps
//! the byte offset of its key so callers can order re-emitted keys by position.
//!
//! Malformed input never aborts the scan: unexpected bytes are skipped the same
//! way a streaming processor consumes garbage while waiting for the next token.

use serde_json::{Map, Number, Value};
use tracing::trace;

/// Containers nested deeper than this are skipped and left out of the tree
const MAX_DEPTH: usize = 64;

/// A value recovered from a (possibly truncated) JSON buffer
#[derive(Debug, Clone, PartialEq)]
pub enum PartialValue {
    /// String literal with escapes decoded; `complete` once the closing quote was seen
    String { text: String, complete: bool },
    /// Bare token (number, boolean, null or anything unquoted)
    Scalar { raw: String, complete: bool },
    Array {
        items: Vec<PartialValue>,
        complete: bool,
    },
    Object {
        entries: Vec<ObjectEntry>,
        complete: bool,
    },
}

/// One `"key": value` pair inside an object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectEntry {
    pub key: String,
    /// Byte offset of the key's opening quote in the scanned buffer
    pub start: usize,
    pub value: PartialValue,
}

impl PartialValue {
    pub fn is_complete(&self) -> bool {
        match self {
            PartialValue::String { complete, .. }
            | PartialValue::Scalar { complete, .. }
            | PartialValue::Array { complete, .. }
            | PartialValue::Object { complete, .. } => *complete,
        }
    }

    /// Best-effort conversion into a JSON value.
    ///
    /// Open strings keep the text received so far. Inside arrays, string and
    /// scalar items are only kept once they are complete, so a half-streamed
    /// trailing item does not flicker into view. Open objects and arrays keep
    /// whatever members they already hold. Returns `None` for a scalar whose
    /// token has not been terminated yet.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            PartialValue::String { text, .. } => Some(Value::String(text.clone())),
            PartialValue::Scalar { raw, complete } => {
                if !complete {
                    return None;
                }
                Some(scalar_to_json(raw))
            }
            PartialValue::Array { items, .. } => {
                let values = items
                    .iter()
                    .filter(|item| match item {
                        PartialValue::String { complete, .. }
                        | PartialValue::Scalar { complete, .. } => *complete,
                        _ => true,
                    })
                    .filter_map(PartialValue::to_json)
                    .collect();
                Some(Value::Array(values))
            }
            PartialValue::Object { entries, .. } => {
                let mut map = Map::new();
                for entry in entries {
                    if let Some(value) = entry.value.to_json() {
                        map.insert(entry.key.clone(), value);
                    }
                }
                Some(Value::Object(map))
            }
        }
    }
}

fn scalar_to_json(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => match serde_json::from_str::<Number>(raw) {
            Ok(number) => Value::Number(number),
            Err(_) => Value::String(raw.to_string()),
        },
    }
}

/// Scan `input` for top-level JSON objects and return each one with its start offset.
///
/// Text outside of objects is ignored. A buffer holding several objects back to
/// back (the model restarting its answer) yields all of them in order.
pub fn scan_objects(input: &str) -> Vec<(usize, PartialValue)> {
    let mut lexer = Lexer::new(input);
    let mut objects = Vec::new();

    while let Some(offset) = lexer.find_next_object_start() {
        let value = lexer.parse_object(0);
        objects.push((offset, value));
    }

    objects
}

/// Parse a single value starting at the first non-whitespace byte of `input`
pub fn parse_partial(input: &str) -> Option<PartialValue> {
    let mut lexer = Lexer::new(input);
    lexer.skip_whitespace();
    lexer.parse_value(0)
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Advance to the next `{` outside of any value and return its offset
    fn find_next_object_start(&mut self) -> Option<usize> {
        while let Some(b) = self.peek() {
            if b == b'{' {
                return Some(self.pos);
            }
            self.pos += 1;
        }
        None
    }

    fn parse_value(&mut self, depth: usize) -> Option<PartialValue> {
        match self.peek()? {
            b'"' => {
                let (text, complete) = self.parse_string();
                Some(PartialValue::String { text, complete })
            }
            b'{' | b'[' if depth >= MAX_DEPTH => {
                self.skip_container();
                None
            }
            b'{' => Some(self.parse_object(depth)),
            b'[' => Some(self.parse_array(depth)),
            b'}' | b']' | b',' | b':' => None,
            _ => Some(self.parse_scalar()),
        }
    }

    /// Expects the cursor on a `"`; returns the decoded text and whether it was closed
    fn parse_string(&mut self) -> (String, bool) {
        self.pos += 1;
        let mut text = String::new();
        let mut run_start = self.pos;

        while let Some(b) = self.peek() {
            match b {
                b'"' => {
                    text.push_str(&self.src[run_start..self.pos]);
                    self.pos += 1;
                    return (text, true);
                }
                b'\\' => {
                    text.push_str(&self.src[run_start..self.pos]);
                    self.pos += 1;
                    match self.parse_escape() {
                        Some(decoded) => text.push_str(&decoded),
                        // Escape sequence cut off by the end of the buffer
                        None => return (text, false),
                    }
                    run_start = self.pos;
                }
                _ => self.pos += 1,
            }
        }

        text.push_str(&self.src[run_start..self.pos]);
        (text, false)
    }

    /// Decode the escape following a backslash. `None` when the buffer ends mid-escape.
    fn parse_escape(&mut self) -> Option<String> {
        let escaped = self.peek()?;
        let decoded = match escaped {
            b'n' => "\n".to_string(),
            b'r' => "\r".to_string(),
            b't' => "\t".to_string(),
            b'"' => "\"".to_string(),
            b'\\' => "\\".to_string(),
            b'/' => "/".to_string(),
            b'b' => "\x08".to_string(),
            b'f' => "\x0C".to_string(),
            b'u' => {
                self.pos += 1;
                return self.parse_unicode_escape();
            }
            _ => {
                // Invalid escape like \z: keep both characters literally
                let ch = self.src[self.pos..].chars().next()?;
                self.pos += ch.len_utf8();
                return Some(format!("\\{ch}"));
            }
        };
        self.pos += 1;
        Some(decoded)
    }

    fn read_hex4(&mut self) -> Option<u32> {
        let digits = self.src.get(self.pos..self.pos + 4)?;
        let code = u32::from_str_radix(digits, 16).ok()?;
        self.pos += 4;
        Some(code)
    }

    fn parse_unicode_escape(&mut self) -> Option<String> {
        if self.pos + 4 > self.bytes.len() {
            self.pos = self.bytes.len();
            return None;
        }
        let Some(high) = self.read_hex4() else {
            return Some("\u{FFFD}".to_string());
        };

        if (0xD800..0xDC00).contains(&high) {
            // Surrogate pair: wait for the low half before emitting anything
            if self.pos + 6 > self.bytes.len() {
                self.pos = self.bytes.len();
                return None;
            }
            if &self.bytes[self.pos..self.pos + 2] == b"\\u" {
                self.pos += 2;
                if let Some(low) = self.read_hex4() {
                    if (0xDC00..0xE000).contains(&low) {
                        let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                        return Some(char::from_u32(combined).unwrap_or('\u{FFFD}').to_string());
                    }
                }
            }
            return Some("\u{FFFD}".to_string());
        }

        Some(char::from_u32(high).unwrap_or('\u{FFFD}').to_string())
    }

    /// Bare token up to the next `,`, `}` or `]`
    fn parse_scalar(&mut self) -> PartialValue {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if matches!(b, b',' | b'}' | b']') {
                let raw = self.src[start..self.pos].trim().to_string();
                return PartialValue::Scalar {
                    raw,
                    complete: true,
                };
            }
            self.pos += 1;
        }
        PartialValue::Scalar {
            raw: self.src[start..].trim().to_string(),
            complete: false,
        }
    }

    /// Expects the cursor on a `{`
    fn parse_object(&mut self, depth: usize) -> PartialValue {
        self.pos += 1;
        let mut entries = Vec::new();

        loop {
            self.skip_whitespace();
            let Some(b) = self.peek() else {
                return PartialValue::Object {
                    entries,
                    complete: false,
                };
            };

            match b {
                b'}' => {
                    self.pos += 1;
                    return PartialValue::Object {
                        entries,
                        complete: true,
                    };
                }
                b',' => self.pos += 1,
                b'"' => {
                    let start = self.pos;
                    let (key, key_complete) = self.parse_string();
                    if !key_complete {
                        continue;
                    }

                    self.skip_whitespace();
                    match self.peek() {
                        Some(b':') => self.pos += 1,
                        Some(other) => {
                            trace!(
                                "Expected ':' after key '{}', got '{}'. Recovering.",
                                key,
                                other as char
                            );
                            continue;
                        }
                        None => continue,
                    }

                    self.skip_whitespace();
                    if let Some(value) = self.parse_value(depth + 1) {
                        entries.push(ObjectEntry { key, start, value });
                    }
                }
                other => {
                    trace!(
                        "Expected key or '}}' at offset {}, got '{}'. Consuming.",
                        self.pos,
                        other as char
                    );
                    self.skip_char();
                }
            }
        }
    }

    /// Expects the cursor on a `[`
    fn parse_array(&mut self, depth: usize) -> PartialValue {
        self.pos += 1;
        let mut items = Vec::new();

        loop {
            self.skip_whitespace();
            let Some(b) = self.peek() else {
                return PartialValue::Array {
                    items,
                    complete: false,
                };
            };

            match b {
                b']' => {
                    self.pos += 1;
                    return PartialValue::Array {
                        items,
                        complete: true,
                    };
                }
                b',' => self.pos += 1,
                b'}' | b':' => {
                    trace!(
                        "Unexpected '{}' inside array at offset {}. Consuming.",
                        b as char,
                        self.pos
                    );
                    self.pos += 1;
                }
                _ => {
                    if let Some(item) = self.parse_value(depth + 1) {
                        items.push(item);
                    }
                }
            }
        }
    }

    /// Move past a container nested beyond `MAX_DEPTH` without keeping any of it
    fn skip_container(&mut self) {
        let start = self.pos;
        let mut nesting = 0usize;
        let mut in_string = false;
        let mut in_string_escape = false;

        while let Some(b) = self.peek() {
            self.pos += 1;
            if in_string {
                if in_string_escape {
                    in_string_escape = false;
                } else if b == b'\\' {
                    in_string_escape = true;
                } else if b == b'"' {
                    in_string = false;
                }
                continue;
            }
            match b {
                b'"' => in_string = true,
                b'{' | b'[' => nesting += 1,
                b'}' | b']' => {
                    nesting = nesting.saturating_sub(1);
                    if nesting == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }

        trace!(
            "Dropped container nested past depth {} at offset {}",
            MAX_DEPTH,
            start
        );
    }

    fn skip_char(&mut self) {
        let len = self.src[self.pos..]
            .chars()
            .next()
            .map_or(1, |c| c.len_utf8());
        self.pos += len;
    }
}
