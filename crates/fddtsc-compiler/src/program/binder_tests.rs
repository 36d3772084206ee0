use indoc::indoc;

use super::{ExportTarget, ImportedName, SymbolFlags};
use crate::test_utils::{INDEX, check, check_files, program, program_with, source_id, strict};

#[test]
fn modules_bind_locals_and_scripts_bind_globals() {
    let module = program("export type A = 1;\ninterface B {}\n");
    let file = source_id(&module, INDEX);
    let symbols = module.symbols();
    let locals: Vec<&str> = symbols
        .file(file)
        .unwrap()
        .locals
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(locals, ["A", "B"]);
    assert!(symbols.globals().get("A").is_none());

    let script = program("type A = 1;\ndeclare function f(): void;\n");
    let symbols = script.symbols();
    let a = *symbols.globals().get("A").unwrap();
    assert!(symbols.get(a).flags.contains(SymbolFlags::TYPE_ALIAS));
    let f = *symbols.globals().get("f").unwrap();
    assert!(symbols.get(f).flags.contains(SymbolFlags::FUNCTION));
}

#[test]
fn interfaces_merge() {
    let p = program("export interface P { x: number }\nexport interface P { y: number }\n");
    let file = source_id(&p, INDEX);
    let id = p.symbols().lookup(file, "P").unwrap();
    assert_eq!(p.symbols().get(id).declarations.len(), 2);
    assert_eq!(check("export interface P { x: number }\nexport interface P { y: number }\n"), "");
}

#[test]
fn conflicting_declarations() {
    let input = indoc! {r#"
    type A = 1; interface A {}
    let x = 1; let x = 2;
    export {};
    "#};

    insta::assert_snapshot!(check(input), @r"
    Error /p/index.ts (1,6): Duplicate identifier 'A'.
    Error /p/index.ts (1,23): Duplicate identifier 'A'.
    Error /p/index.ts (2,5): Cannot redeclare block-scoped variable 'x'.
    Error /p/index.ts (2,16): Cannot redeclare block-scoped variable 'x'.
    ");
}

#[test]
fn export_lists() {
    let input = indoc! {r#"
    type A = 1;
    interface Main {}
    export { A as B };
    export * from "./a";
    export * as ns from "./a";
    export default Main;
    "#};
    let (p, _) = program_with(&[(INDEX, input), ("/p/a.ts", "export type Z = 0;\n")], strict());
    let file = source_id(&p, INDEX);
    let a_file = source_id(&p, "/p/a.ts");
    let symbols = p.symbols();
    let exports = &symbols.file(file).unwrap().exports;

    let a = symbols.lookup(file, "A").unwrap();
    assert_eq!(exports.get("B"), Some(&ExportTarget::Local(a)));
    assert_eq!(exports.get("ns"), Some(&ExportTarget::Namespace(Some(a_file))));
    assert_eq!(symbols.export_of(file, "default"), symbols.lookup(file, "Main"));
    assert_eq!(symbols.export_names(file), ["B", "ns", "default", "Z"]);
    assert_eq!(symbols.export_of(file, "Z"), symbols.lookup(a_file, "Z"));
}

#[test]
fn import_chains_resolve_to_the_declaration() {
    let files = [
        (INDEX, "import { Renamed } from \"./b\";\nimport * as all from \"./b\";\nexport type T = Renamed;\n"),
        ("/p/b.ts", "export { Original as Renamed } from \"./a\";\n"),
        ("/p/a.ts", "export interface Original {}\n"),
    ];
    let (p, _) = program_with(&files, strict());
    let file = source_id(&p, INDEX);
    let symbols = p.symbols();

    let binding = symbols.lookup(file, "Renamed").unwrap();
    let import = symbols.get(binding).import.clone().unwrap();
    assert_eq!(import.specifier, "./b");
    assert_eq!(import.name, ImportedName::Named("Renamed".into()));

    let original = symbols.lookup(source_id(&p, "/p/a.ts"), "Original").unwrap();
    assert_eq!(symbols.resolve_alias(binding), Some(original));

    let namespace = symbols.lookup(file, "all").unwrap();
    let module = symbols.resolve_alias(namespace).unwrap();
    assert_eq!(symbols.get(module).module, Some(source_id(&p, "/p/b.ts")));
}

#[test]
fn exporting_unknown_names() {
    insta::assert_snapshot!(check("export { Nope };\n"), @"Error /p/index.ts (1,10): Cannot find name 'Nope'.");
}

#[test]
fn unresolved_imports_resolve_to_nothing() {
    let files = [(INDEX, "import { X } from \"./gone\";\nexport type T = X;\n")];
    let (p, _) = program_with(&files, strict());
    let file = source_id(&p, INDEX);
    let x = p.symbols().lookup(file, "X").unwrap();
    assert!(p.symbols().get(x).flags.contains(SymbolFlags::ALIAS));
    assert_eq!(p.symbols().resolve_alias(x), None);
    assert!(check_files(&files).contains("Cannot find module './gone'"));
}
