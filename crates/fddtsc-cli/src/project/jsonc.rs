//! JSON with comments, the dialect `tsconfig.json` is written in.
//!
//! [`strip`] blanks out comments and trailing commas with spaces instead of
//! removing them, so byte offsets in the cleaned text are offsets in the
//! original file. Errors reported by `serde_json` on the cleaned text map
//! straight back to the config source.

use std::ops::Range;

/// Replaces comments, trailing commas and a leading BOM with spaces.
///
/// Newlines inside block comments are kept so line numbers stay put.
pub fn strip(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = bytes.to_vec();
    let mut i = 0;

    if text.starts_with('\u{feff}') {
        blank(&mut out[..3]);
        i = 3;
    }

    // A comma is trailing if only trivia separates it from `}` or `]`.
    let mut pending_comma: Option<usize> = None;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                pending_comma = None;
                i += 1;
                while i < bytes.len() {
                    match bytes[i] {
                        b'\\' => i += 2,
                        b'"' => {
                            i += 1;
                            break;
                        }
                        b'\n' => break,
                        _ => i += 1,
                    }
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let start = i;
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                blank(&mut out[start..i]);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let start = i;
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i = (i + 2).min(bytes.len());
                blank(&mut out[start..i]);
            }
            b',' => {
                pending_comma = Some(i);
                i += 1;
            }
            b'}' | b']' => {
                if let Some(comma) = pending_comma.take() {
                    out[comma] = b' ';
                }
                i += 1;
            }
            b if b.is_ascii_whitespace() => i += 1,
            _ => {
                pending_comma = None;
                i += 1;
            }
        }
    }

    // Only whole comments are blanked, so multi-byte sequences stay intact.
    String::from_utf8(out).unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}

fn blank(bytes: &mut [u8]) {
    for b in bytes {
        if *b != b'\n' && *b != b'\r' {
            *b = b' ';
        }
    }
}

/// Byte offset of a `serde_json` error position (1-based line, 1-based byte column).
pub fn error_offset(text: &str, line: usize, column: usize) -> usize {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let mut offset = (line_start + column.saturating_sub(1)).min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// The error text without serde_json's ` at line L column C` suffix.
pub fn error_message(err: &serde_json::Error) -> String {
    let text = err.to_string();
    match text.rsplit_once(" at line ") {
        Some((message, _)) => message.to_string(),
        None => text,
    }
}

/// Range of the first `"key"` at or after `from` that is used as an object key.
///
/// Not scope-aware: callers narrow the search with `from`.
pub fn find_key(clean: &str, key: &str, from: usize) -> Option<Range<usize>> {
    let needle = format!("\"{key}\"");
    let mut start = from.min(clean.len());
    while let Some(found) = clean[start..].find(&needle) {
        let at = start + found;
        let end = at + needle.len();
        if clean[end..].trim_start().starts_with(':') {
            return Some(at..end);
        }
        start = end;
    }
    None
}
