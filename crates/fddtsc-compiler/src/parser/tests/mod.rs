mod recovery_tests;
mod statements_tests;
mod types_tests;

use crate::parser::parse;
use crate::source_map::{SourceKind, SourceMap};

/// CST dump without trivia; panics on syntax errors.
#[track_caller]
fn expect_valid_cst(src: &str) -> String {
    let mut sources = SourceMap::new();
    let id = sources.add(SourceKind::Module, "test.ts", src);
    let (parse, diagnostics) = parse(src, id).unwrap();
    if !diagnostics.is_empty() {
        panic!(
            "Expected valid source, got errors:\n{}",
            diagnostics.printer(&sources).render()
        );
    }
    parse.dump_cst(false)
}

/// Rendered diagnostics of a source expected to be invalid.
#[track_caller]
fn expect_errors(src: &str) -> String {
    let mut sources = SourceMap::new();
    let id = sources.add(SourceKind::Module, "test.ts", src);
    let (_, diagnostics) = parse(src, id).unwrap();
    assert!(!diagnostics.is_empty(), "expected syntax errors");
    diagnostics.printer(&sources).render()
}
