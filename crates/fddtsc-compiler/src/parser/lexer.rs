//! Lexer for the declaration subset of TypeScript.
//!
//! Produces span-based tokens without storing text - text is sliced from source only when needed.
//!
//! ## Templates
//!
//! Logos scans a whole template literal as one token (the callback balances `${ }`
//! and nested strings). [`lex`] then splits it into head/middle/tail pieces and
//! lexes each substitution recursively, so template literal types parse like any
//! other type.
//!
//! ## Error handling
//!
//! The lexer coalesces consecutive error characters into single `Garbage` tokens rather
//! than producing one error per character. This keeps the token stream manageable for malformed input.

use logos::Logos;
use rowan::TextRange;
use std::ops::Range;

use super::cst::SyntaxKind;

/// Zero-copy token: kind + span, text retrieved via [`token_text`] when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

impl Token {
    #[inline]
    pub fn new(kind: SyntaxKind, span: TextRange) -> Self {
        Self { kind, span }
    }
}

fn range_to_text_range(range: Range<usize>) -> TextRange {
    TextRange::new((range.start as u32).into(), (range.end as u32).into())
}

/// Tokenizes source into a vector of span-based tokens.
///
/// Post-processes the Logos output:
/// - Coalesces consecutive lexer errors into single `Garbage` tokens
/// - Splits `TemplateLiteral` tokens into template pieces plus substitution tokens
/// - Turns a leading byte-order mark into whitespace
pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let start = if source.starts_with('\u{feff}') {
        let bom = '\u{feff}'.len_utf8();
        tokens.push(Token::new(
            SyntaxKind::Whitespace,
            range_to_text_range(0..bom),
        ));
        bom
    } else {
        0
    };
    lex_into(source, start..source.len(), &mut tokens);
    tokens
}

fn lex_into(source: &str, range: Range<usize>, tokens: &mut Vec<Token>) {
    let base = range.start;
    let mut lexer = SyntaxKind::lexer(&source[range.clone()]);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                let span = lexer.span();
                if let Some(start) = error_start.take() {
                    tokens.push(Token::new(
                        SyntaxKind::Garbage,
                        range_to_text_range(base + start..base + span.start),
                    ));
                }

                let span = base + span.start..base + span.end;
                if kind == SyntaxKind::TemplateLiteral {
                    split_template_literal(source, span, tokens);
                } else {
                    tokens.push(Token::new(kind, range_to_text_range(span)));
                }
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token::new(
                        SyntaxKind::Garbage,
                        range_to_text_range(base + start..range.end),
                    ));
                }
                break;
            }
        }
    }
}

/// Logos callback: extends the token from the opening backtick to its closing one.
pub(super) fn lex_template(lex: &mut logos::Lexer<SyntaxKind>) -> bool {
    match scan_template_rest(lex.remainder()) {
        Some(len) => {
            lex.bump(len);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

/// Length of a template body (after the opening backtick) including the closing backtick.
fn scan_template_rest(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return Some(i + 1),
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                i = scan_substitution(text, i + 2)? + 1;
            }
            _ => i += 1,
        }
    }
    None
}

/// Index of the `}` closing a substitution whose content starts at `start`.
fn scan_substitution(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' if depth == 0 => return Some(i),
            b'}' => depth -= 1,
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote && bytes[i] != b'\n' {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'`' => {
                i += scan_template_rest(&text[i + 1..])?;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Splits a template literal token into template pieces, lexing each substitution.
///
/// `` `a${T}b` `` becomes `TemplateHead` `` `a${ ``, the tokens of `T`, and
/// `TemplateTail` `` }b` ``. Without substitutions the token is a `NoSubstitutionTemplate`.
fn split_template_literal(source: &str, span: Range<usize>, tokens: &mut Vec<Token>) {
    let bytes = source.as_bytes();
    let end = span.end;
    let mut piece_start = span.start;
    let mut i = span.start + 1;
    let mut first = true;

    while i < end {
        match bytes[i] {
            b'\\' => i += 2,
            b'$' if i + 1 < end && bytes[i + 1] == b'{' => {
                let kind = if first {
                    SyntaxKind::TemplateHead
                } else {
                    SyntaxKind::TemplateMiddle
                };
                first = false;
                tokens.push(Token::new(kind, range_to_text_range(piece_start..i + 2)));

                let content_start = i + 2;
                let close = scan_substitution(&source[..end], content_start).unwrap_or(end - 1);
                lex_into(source, content_start..close, tokens);
                piece_start = close;
                i = close + 1;
            }
            _ => i += 1,
        }
    }

    let kind = if first {
        SyntaxKind::NoSubstitutionTemplate
    } else {
        SyntaxKind::TemplateTail
    };
    tokens.push(Token::new(kind, range_to_text_range(piece_start..end)));
}

/// Retrieves the text slice for a token. O(1) slice into source.
#[inline]
pub fn token_text<'q>(source: &'q str, token: &Token) -> &'q str {
    &source[std::ops::Range::<usize>::from(token.span)]
}
