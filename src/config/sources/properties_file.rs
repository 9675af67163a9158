//! Properties file source: flat `key=value` text.
//!
//! Follows the classic `.properties` layout: `#`/`!` comments, `=`, `:` or
//! whitespace separators, backslash line continuations and `\uXXXX` escapes.

use crate::error::LoadError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Syntax error with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub line: usize,
    pub message: String,
}

/// Read and parse a properties file.
pub fn load_file(path: &Path) -> Result<BTreeMap<String, String>, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = decode(bytes);
    parse(&text).map_err(|failure| LoadError::Malformed {
        path: PathBuf::from(path),
        line: failure.line,
        message: failure.message,
    })
}

/// UTF-8 when valid, otherwise ISO-8859-1.
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().into_iter().map(char::from).collect(),
    }
}

/// Parse properties text. The last assignment of a key wins.
pub fn parse(text: &str) -> Result<BTreeMap<String, String>, ParseFailure> {
    let mut properties = BTreeMap::new();
    let mut lines = natural_lines(text).enumerate();

    while let Some((index, raw)) = lines.next() {
        let first_line = index + 1;
        let line = raw.trim_start_matches(is_blank);
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let mut logical = String::from(line);
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start_matches(is_blank)),
                None => break,
            }
        }

        let (key, value) = split_entry(&logical);
        let key = unescape(key).map_err(|message| ParseFailure {
            line: first_line,
            message,
        })?;
        let value = unescape(value).map_err(|message| ParseFailure {
            line: first_line,
            message,
        })?;
        properties.insert(key, value);
    }

    Ok(properties)
}

/// Split on `\n`, `\r\n` or a lone `\r`.
fn natural_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(['\n', '\r']) {
            Some(end) => {
                let line = &rest[..end];
                let skip = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + skip..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\x0c'
}

/// An odd number of trailing backslashes continues the line.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Split a logical line into raw (still escaped) key and value.
fn split_entry(line: &str) -> (&str, &str) {
    let mut key_end = line.len();
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || is_blank(c) {
            key_end = i;
            break;
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches(is_blank);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches(is_blank);
    }
    (key, rest)
}

fn unescape(text: &str) -> Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let code = read_hex4(&mut chars)?;
                let decoded = if (0xD800..0xDC00).contains(&code) {
                    // High surrogate: combine with a following `\uDC00`-`\uDFFF`
                    let mut ahead = chars.clone();
                    let low = match (ahead.next(), ahead.next()) {
                        (Some('\\'), Some('u')) => read_hex4(&mut ahead)
                            .ok()
                            .filter(|low| (0xDC00..0xE000).contains(low)),
                        _ => None,
                    };
                    match low {
                        Some(low) => {
                            chars = ahead;
                            char::from_u32(0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00))
                        }
                        None => None,
                    }
                } else {
                    char::from_u32(code)
                };
                out.push(decoded.unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

fn read_hex4(chars: &mut std::str::Chars<'_>) -> Result<u32, String> {
    let hex: String = chars.by_ref().take(4).collect();
    (hex.len() == 4)
        .then(|| u32::from_str_radix(&hex, 16).ok())
        .flatten()
        .ok_or_else(|| format!("Malformed \\uxxxx encoding: \\u{}", hex))
}
