use std::path::Path;

use rowan::{TextRange, TextSize};

use crate::source_map::{SourceKind, SourceMap};

#[test]
fn add_is_idempotent_per_path() {
    let mut map = SourceMap::new();
    let a = map.add(SourceKind::Module, "src/a.ts", "type A = 1;");
    let b = map.add(SourceKind::Module, "src/b.ts", "type B = 2;");
    let again = map.add(SourceKind::Module, "src/a.ts", "ignored");

    assert_eq!(a, again);
    assert_ne!(a, b);
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(a).text(), "type A = 1;");
    assert_eq!(map.lookup(Path::new("src/b.ts")), Some(b));
}

#[test]
fn declaration_files_are_detected() {
    let mut map = SourceMap::new();
    let dts = map.add(SourceKind::Module, "types/x.d.ts", "");
    let ts = map.add(SourceKind::Module, "src/x.ts", "");
    assert!(map.get(dts).is_declaration_file());
    assert!(!map.get(ts).is_declaration_file());
}

#[test]
fn line_col_and_slice() {
    let mut map = SourceMap::new();
    let id = map.add(SourceKind::Module, "a.ts", "type A = 1;\ntype B = X;");
    let file = map.get(id);
    let x = TextSize::from(21);
    assert_eq!(file.line_col(x).one_based(), (2, 10));
    assert_eq!(file.slice(TextRange::new(x, x + TextSize::from(1))), "X");
}
