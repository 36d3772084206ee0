use rowan::{TextRange, TextSize};

use super::*;
use crate::source_map::{SourceKind, SourceMap};

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(TextSize::from(start), TextSize::from(end))
}

fn sources() -> (SourceMap, crate::source_map::SourceId) {
    let mut map = SourceMap::new();
    let id = map.add(
        SourceKind::Module,
        "src/index.ts",
        "export type A = Missing;\nexport type B = A;\n",
    );
    (map, id)
}

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn report_with_default_message() {
    let (_, id) = sources();
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::CannotFindName, Span::new(id, range(16, 23)))
        .emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    assert_eq!(diagnostics.iter().next().unwrap().message(), "Cannot find name.");
}

#[test]
fn report_with_template_arguments() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report_global(DiagnosticKind::NoExportedMember)
        .args(&["./a", "B"])
        .emit();

    let msg = diagnostics.iter().next().unwrap();
    assert_eq!(msg.message(), "Module '\"./a\"' has no exported member 'B'.");
}

#[test]
fn single_line_layout() {
    let (map, id) = sources();
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::CannotFindName, Span::new(id, range(16, 23)))
        .message("Missing")
        .emit();
    diagnostics
        .report_global(DiagnosticKind::UnknownCompilerOption)
        .message("frobnicate")
        .emit();

    insta::assert_snapshot!(diagnostics.printer(&map).render(), @r"
    Error src/index.ts (1,17): Cannot find name 'Missing'.
    Error: Unknown compiler option 'frobnicate'.
    ");
}

#[test]
fn offset_zero_keeps_position() {
    let (map, id) = sources();
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::DeclarationExpected, Span::new(id, range(0, 6)))
        .emit();

    insta::assert_snapshot!(diagnostics.printer(&map).render(), @"Error src/index.ts (1,1): Declaration or statement expected.");
}

#[test]
fn chained_lines_are_indented() {
    let (map, id) = sources();
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ConstraintNotSatisfied, Span::new(id, range(41, 42)))
        .args(&["string", "number"])
        .chain("Type 'string' is not assignable to type 'number'.")
        .emit();

    insta::assert_snapshot!(diagnostics.printer(&map).render(), @r"
    Error src/index.ts (2,17): Type 'string' does not satisfy the constraint 'number'.
      Type 'string' is not assignable to type 'number'.
    ");
}

#[test]
fn warnings_use_their_own_prefix() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report_global(DiagnosticKind::UnknownCompilerOption)
        .message("x")
        .severity(Severity::Warning)
        .emit();

    assert!(!diagnostics.has_errors());
    assert_eq!(diagnostics.warning_count(), 1);
    let map = SourceMap::new();
    insta::assert_snapshot!(diagnostics.printer(&map).render(), @"Warning: Unknown compiler option 'x'.");
}

#[test]
fn colors_wrap_each_part() {
    let (map, id) = sources();
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::CannotFindName, Span::new(id, range(16, 23)))
        .message("Missing")
        .emit();

    let out = diagnostics
        .printer(&map)
        .colors(fddtsc_core::Colors::ON)
        .render();
    assert!(out.starts_with("\x1b[91mError\x1b[0m \x1b[96msrc/index.ts\x1b[0m"));
}

#[test]
fn pretty_layout() {
    let (map, id) = sources();
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::CannotFindName, Span::new(id, range(16, 23)))
        .message("Missing")
        .emit();

    let out = diagnostics.printer(&map).pretty(true).render();
    assert!(out.contains("error[TS2304]: Cannot find name 'Missing'."));
    assert!(out.contains("src/index.ts:1:17"));
    assert!(out.contains("^^^^^^^"));
}

#[test]
fn sort_and_dedup_orders_by_position() {
    let (_, id) = sources();
    let mut diagnostics = Diagnostics::new();
    for start in [30, 10, 30] {
        diagnostics
            .report(DiagnosticKind::CannotFindName, Span::new(id, range(start, start + 1)))
            .message("X")
            .emit();
    }
    diagnostics.report_global(DiagnosticKind::NoInputs).emit();
    diagnostics.sort_and_dedup();

    let starts: Vec<_> = diagnostics
        .iter()
        .map(|d| d.span().map(|s| u32::from(s.range.start())))
        .collect();
    assert_eq!(starts, vec![None, Some(10), Some(30)]);
}
