//! Parser infrastructure for the declaration subset of TypeScript.
//!
//! # Architecture
//!
//! This parser produces a lossless concrete syntax tree (CST) via Rowan's green tree builder.
//! Key design decisions borrowed from rust-analyzer, rnix-parser, and taplo:
//!
//! - Zero-copy parsing: tokens carry spans, text sliced only when building tree nodes
//! - Trivia buffering: whitespace/comments collected, then attached as leading trivia
//! - Checkpoint-based wrapping: retroactively wrap nodes for unions, arrays and conditionals
//! - Explicit recovery sets: per-production sets determine when to bail vs consume diagnostics
//!
//! Because trivia is never part of a node's range, a declaration's range starts at its
//! first token, and the comments above it stay reachable from the text between the
//! previous token and that start. Comment lookup relies on this.
//!
//! # Recovery Strategy
//!
//! The parser is resilient: it always produces a tree. Recovery follows these rules:
//!
//! 1. Unknown tokens get wrapped in `SyntaxKind::Error` nodes and consumed
//! 2. Missing expected tokens emit a diagnostic but don't consume (parent may handle)
//! 3. Recovery sets define "synchronization points" per production
//! 4. Expressions are never parsed; they are skipped as balanced token runs
//!
//! However, fuel exhaustion (exec_fuel, recursion_fuel) returns an actual error immediately.

pub mod ast;
pub mod cst;
pub mod lexer;

mod core;
mod grammar;
mod invariants;

#[cfg(test)]
mod ast_tests;
#[cfg(test)]
mod lexer_tests;
#[cfg(test)]
mod tests;

pub use cst::{SyntaxKind, SyntaxNode, SyntaxToken};

pub use ast::{Root, Statement, Type, TypeMember};

pub use core::Parser;

use std::fmt::Write;

use rowan::{NodeOrToken, TextSize};

use crate::PassResult;
use crate::source_map::SourceId;
use lexer::lex;

/// Default recursion budget for nested types.
pub const DEFAULT_RECURSION_FUEL: u32 = 512;

/// Parse result containing the green tree.
///
/// The tree is always complete. Diagnostics are returned separately, and
/// error nodes in the tree represent recovery points.
#[derive(Debug, Clone)]
pub struct Parse {
    cst: rowan::GreenNode,
}

impl Parse {
    pub fn as_cst(&self) -> &rowan::GreenNode {
        &self.cst
    }

    /// Creates a typed view over the immutable green tree.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.cst.clone())
    }

    pub fn root(&self) -> Root {
        Root::cast(self.syntax()).expect("parser always produces a Root")
    }

    /// Indented node/token dump, trivia optional.
    pub fn dump_cst(&self, trivia: bool) -> String {
        let mut out = String::new();
        format_cst(&self.syntax(), 0, trivia, &mut out).expect("String write never fails");
        out
    }
}

fn format_cst(node: &SyntaxNode, indent: usize, trivia: bool, w: &mut impl Write) -> std::fmt::Result {
    writeln!(w, "{}{:?}", "  ".repeat(indent), node.kind())?;
    for child in node.children_with_tokens() {
        match child {
            NodeOrToken::Node(n) => format_cst(&n, indent + 1, trivia, w)?,
            NodeOrToken::Token(t) => {
                if trivia || !t.kind().is_trivia() {
                    writeln!(w, "{}{:?} {:?}", "  ".repeat(indent + 1), t.kind(), t.text())?;
                }
            }
        }
    }
    Ok(())
}

/// Main entry point. Returns Err on fuel exhaustion.
pub fn parse(source: &str, source_id: SourceId) -> PassResult<Parse> {
    parse_with_parser(
        Parser::new(source, source_id, lex(source))
            .with_recursion_fuel(Some(DEFAULT_RECURSION_FUEL)),
    )
}

/// Parse with a pre-configured parser (for custom fuel limits).
pub fn parse_with_parser(mut parser: Parser) -> PassResult<Parse> {
    parser.parse_root();
    let (cst, diagnostics) = parser.finish()?;
    Ok((Parse { cst }, diagnostics))
}

/// Offset right after the last non-trivia token preceding `node`, or 0.
///
/// This is where the node's leading trivia (and so its leading comments) begins.
pub fn full_start(node: &SyntaxNode) -> TextSize {
    let mut token = node.first_token().and_then(|t| t.prev_token());
    while let Some(t) = token {
        if !t.kind().is_trivia() {
            return t.text_range().end();
        }
        token = t.prev_token();
    }
    TextSize::from(0)
}
