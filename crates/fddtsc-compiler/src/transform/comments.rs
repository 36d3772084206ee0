//! Leading comments of declaration-tree nodes.
//!
//! Comments are not part of the declaration tree. They are recovered from
//! the text of the file a node came from, starting at the node's full start
//! (end of the previous token), using the attachment rule of the source
//! grammar: a comment on the same line as the previous token trails that
//! token; everything after the first line break leads the next one.

use rowan::{TextRange, TextSize};

use crate::dts::Origin;
use crate::source_map::{SourceId, SourceMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentRange {
    pub range: TextRange,
    pub kind: CommentKind,
    pub has_trailing_newline: bool,
}

/// Trimmed texts of the comments leading the node at `origin`.
///
/// Rebuilt nodes have no owner file of their own; they belong to `fallback`,
/// the file being transformed.
pub fn leading_comments(origin: Option<&Origin>, fallback: SourceId, sources: &SourceMap) -> Vec<String> {
    let Some(origin) = origin else {
        return Vec::new();
    };
    let owner = origin.source.unwrap_or(fallback);
    let text = sources.get(owner).text();
    leading_comment_ranges(text, origin.full_start)
        .into_iter()
        .map(|comment| text[comment.range].trim().to_string())
        .collect()
}

/// Comment ranges between `full_start` and the next non-trivia character.
pub fn leading_comment_ranges(text: &str, full_start: TextSize) -> Vec<CommentRange> {
    let bytes = text.as_bytes();
    let mut pos = usize::from(full_start).min(text.len());
    let mut collecting = pos == 0;
    if pos == 0 && text.starts_with("#!") {
        pos = line_end(text, 0);
    }

    let mut out: Vec<CommentRange> = Vec::new();
    while pos < bytes.len() {
        match bytes[pos] {
            b'\r' | b'\n' => {
                pos += 1;
                collecting = true;
                if let Some(last) = out.last_mut() {
                    last.has_trailing_newline = true;
                }
            }
            b' ' | b'\t' | 0x0B | 0x0C => pos += 1,
            b'/' if matches!(bytes.get(pos + 1), Some(b'/') | Some(b'*')) => {
                let start = pos;
                let kind = if bytes[pos + 1] == b'/' {
                    pos = line_end(text, pos);
                    CommentKind::Line
                } else {
                    pos = match text[pos + 2..].find("*/") {
                        Some(offset) => pos + 2 + offset + 2,
                        None => text.len(),
                    };
                    CommentKind::Block
                };
                if collecting {
                    out.push(CommentRange {
                        range: range(start, pos),
                        kind,
                        has_trailing_newline: false,
                    });
                }
            }
            b if b < 0x80 => break,
            _ => {
                let Some(c) = text[pos..].chars().next() else {
                    break;
                };
                if !c.is_whitespace() {
                    break;
                }
                if matches!(c, '\u{2028}' | '\u{2029}') {
                    collecting = true;
                    if let Some(last) = out.last_mut() {
                        last.has_trailing_newline = true;
                    }
                }
                pos += c.len_utf8();
            }
        }
    }
    out
}

fn line_end(text: &str, from: usize) -> usize {
    text[from..]
        .find(['\n', '\r', '\u{2028}', '\u{2029}'])
        .map_or(text.len(), |offset| from + offset)
}

fn range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
}
