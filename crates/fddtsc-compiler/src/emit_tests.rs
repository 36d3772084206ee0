use std::path::PathBuf;

use indoc::indoc;

use crate::emit::{declaration_file_name, emit};
use crate::options::{CompilerOptions, NewLine};
use crate::test_utils::{emit_files, emit_files_with, program_with, strict};

fn with(f: impl FnOnce(&mut CompilerOptions)) -> CompilerOptions {
    let mut options = strict();
    f(&mut options);
    options
}

const NESTED: [(&str, &str); 2] = [
    ("/p/src/index.ts", "export { helper } from \"./lib/util\";\n"),
    ("/p/src/lib/util.ts", "export function helper(): number { return 1; }\n"),
];

#[test]
fn declarations_land_next_to_sources() {
    insta::assert_snapshot!(emit_files(&NESTED), @r#"
    // /p/src/index.d.ts
    export { helper } from "./lib/util";
    // /p/src/lib/util.d.ts
    export declare function helper(): number;
    "#);
}

#[test]
fn out_dir_mirrors_the_common_source_directory() {
    let options = with(|o| o.out_dir = Some(PathBuf::from("/p/out")));
    insta::assert_snapshot!(emit_files_with(&NESTED, options), @r#"
    // /p/out/index.d.ts
    export { helper } from "./lib/util";
    // /p/out/lib/util.d.ts
    export declare function helper(): number;
    "#);
}

#[test]
fn declaration_dir_wins_over_out_dir() {
    let options = with(|o| {
        o.out_dir = Some(PathBuf::from("/p/out"));
        o.declaration_dir = Some(PathBuf::from("/p/types"));
        o.root_dir = Some(PathBuf::from("/p"));
    });
    insta::assert_snapshot!(emit_files_with(&NESTED, options), @r#"
    // /p/types/src/index.d.ts
    export { helper } from "./lib/util";
    // /p/types/src/lib/util.d.ts
    export declare function helper(): number;
    "#);
}

#[test]
fn files_outside_root_dir_are_reported() {
    let files = [
        ("/p/src/index.ts", "import { S } from \"../shared\";\nexport type T = S;\n"),
        ("/p/shared.ts", "export type S = string;\n"),
    ];
    let options = with(|o| {
        o.out_dir = Some(PathBuf::from("/p/out"));
        o.root_dir = Some(PathBuf::from("/p/src"));
    });
    insta::assert_snapshot!(emit_files_with(&files, options), @r#"
    // /p/out/index.d.ts
    import { S } from "../shared";
    export type T = S;
    // /p/out/shared.d.ts
    export type S = string;
    Error: File '/p/shared.ts' is not under 'rootDir' '/p/src'. 'rootDir' is expected to contain all source files.
    "#);
}

#[test]
fn out_file_bundles_ambient_modules() {
    let files = [
        (
            "/p/index.ts",
            indoc! {r#"
            import { A } from "./lib/a";
            export type B = A[];
            "#},
        ),
        ("/p/lib/a.ts", "export type A = 1;\n"),
    ];
    let options = with(|o| o.out_file = Some(PathBuf::from("/p/dist/bundle.js")));
    insta::assert_snapshot!(emit_files_with(&files, options), @r#"
    // /p/dist/bundle.d.ts
    declare module "index" {
        import { A } from "lib/a";
        export type B = A[];
    }
    declare module "lib/a" {
        export type A = 1;
    }
    "#);
}

#[test]
fn bundles_are_not_rewritten() {
    let input = indoc! {r#"
    //! fddtsc::newtype
    export type Id = { id: string };
    export type Ids = Id[];
    "#};
    let options = with(|o| o.out_file = Some(PathBuf::from("/p/all.d.ts")));
    insta::assert_snapshot!(emit_files_with(&[("/p/index.ts", input)], options), @r#"
    // /p/all.d.ts
    declare module "index" {
        //! fddtsc::newtype
        export type Id = {
            id: string;
        };
        export type Ids = Id[];
    }
    "#);
}

#[test]
fn pre_emit_errors_block_output_with_no_emit_on_error() {
    let files = [("/p/index.ts", "export type A = Missing;\n")];

    insta::assert_snapshot!(emit_files(&files), @r"
    // /p/index.d.ts
    export type A = Missing;
    ");

    let options = with(|o| o.no_emit_on_error = true);
    insta::assert_snapshot!(emit_files_with(&files, options), @"(emit skipped)");
}

#[test]
fn no_emit_writes_nothing() {
    let options = with(|o| o.no_emit = true);
    let output = emit_files_with(&[("/p/index.ts", "export type A = 1;\n")], options);
    insta::assert_snapshot!(output, @"(emit skipped)");
}

#[test]
fn declaration_errors_skip_only_their_file() {
    let files = [
        ("/p/index.ts", "export * from \"./bad\";\nexport type Ok = 1;\n"),
        ("/p/bad.ts", "export const v = make();\n"),
    ];
    insta::assert_snapshot!(emit_files(&files), @r#"
    // /p/index.d.ts
    export * from "./bad";
    export type Ok = 1;
    Error /p/bad.ts (1,14): Variable must have an explicit type annotation with --isolatedDeclarations.
    (emit skipped)
    "#);
}

#[test]
fn remove_comments_drops_markers_too() {
    let input = indoc! {r#"
    /** Documented. */
    //! fddtsc::newtype
    export type Id = { id: string };
    export type Ids = Id[];
    "#};
    let options = with(|o| o.remove_comments = true);
    insta::assert_snapshot!(emit_files_with(&[("/p/index.ts", input)], options), @r"
    // /p/index.d.ts
    export type Id = {
        id: string;
    };
    export type Ids = unknown[];
    ");
}

#[test]
fn crlf_new_lines() {
    let options = with(|o| o.new_line = Some(NewLine::Crlf));
    let (program, mut host) = program_with(&[("/p/index.ts", "export type A = 1;\nexport type B = 2;\n")], options);
    let checker = program.checker();
    let result = emit(&program, &checker, &mut host, &mut []).unwrap();

    assert_eq!(result.emitted_files, vec![PathBuf::from("/p/index.d.ts")]);
    assert_eq!(
        host.written("/p/index.d.ts").unwrap(),
        "export type A = 1;\r\nexport type B = 2;\r\n"
    );
}

#[test]
fn declaration_file_names() {
    assert_eq!(declaration_file_name("a.ts"), "a.d.ts");
    assert_eq!(declaration_file_name("view.tsx"), "view.d.ts");
    assert_eq!(declaration_file_name("esm.mts"), "esm.d.mts");
    assert_eq!(declaration_file_name("cjs.cts"), "cjs.d.cts");
}
