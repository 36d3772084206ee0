use std::fs;
use std::path::PathBuf;

use indoc::indoc;
use tempfile::TempDir;

use super::build::{BuildArgs, build};

fn fixture(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (path, text) in files {
        let path = dir.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }
    dir
}

fn args() -> BuildArgs {
    BuildArgs {
        project: PathBuf::from("."),
        pretty: false,
        color: false,
        list_files: false,
    }
}

/// Exit success and stdout, with the fixture directory shown as `/p`.
fn run_with(dir: &TempDir, args: BuildArgs) -> (bool, String) {
    let mut out = Vec::new();
    let ok = build(&args, dir.path(), &mut out).unwrap();
    let root = dir.path().to_string_lossy().replace('\\', "/");
    (ok, String::from_utf8(out).unwrap().replace(&root, "/p"))
}

fn run(dir: &TempDir) -> (bool, String) {
    run_with(dir, args())
}

fn read(dir: &TempDir, path: &str) -> Option<String> {
    fs::read_to_string(dir.path().join(path)).ok()
}

#[test]
fn markers_are_applied_to_written_declarations() {
    let dir = fixture(&[
        ("tsconfig.json", r#"{ "compilerOptions": { "strict": true, "outDir": "dist" } }"#),
        (
            "src/index.ts",
            indoc! {r#"
            //! fddtsc::newtype
            export type UserId = string & { readonly __brand: "UserId" };
            export declare function find(id: UserId): void;
            "#},
        ),
    ]);

    let (ok, out) = run(&dir);
    assert!(ok);
    assert_eq!(out, "");
    insta::assert_snapshot!(read(&dir, "dist/index.d.ts").unwrap(), @r#"
    //! fddtsc::newtype
    export type UserId = string & {
        readonly __brand: "UserId";
    };
    export declare function find(id: unknown): void;
    "#);
}

#[test]
fn pre_emit_errors_fail_the_build_but_still_emit() {
    let dir = fixture(&[
        ("tsconfig.json", "{}"),
        ("index.ts", "export type A = Missing;\n"),
    ]);

    let (ok, out) = run(&dir);
    assert!(!ok);
    insta::assert_snapshot!(out, @"Error /p/index.ts (1,17): Cannot find name 'Missing'.");
    assert_eq!(read(&dir, "index.d.ts").as_deref(), Some("export type A = Missing;\n"));
}

#[test]
fn skipped_emission_fails_the_build() {
    let dir = fixture(&[
        ("tsconfig.json", r#"{ "compilerOptions": { "noEmitOnError": true } }"#),
        ("index.ts", "export type A = Missing;\n"),
    ]);

    let (ok, _) = run(&dir);
    assert!(!ok);
    assert_eq!(read(&dir, "index.d.ts"), None);
}

#[test]
fn configuration_errors_stop_before_the_program() {
    let dir = fixture(&[
        ("tsconfig.json", r#"{ "compilerOptions": { "nope": 1 } }"#),
        ("index.ts", "export type A = Missing;\n"),
    ]);

    let (ok, out) = run(&dir);
    assert!(!ok);
    insta::assert_snapshot!(out, @"Error /p/tsconfig.json (1,24): Unknown compiler option 'nope'.");
    assert_eq!(read(&dir, "index.d.ts"), None);
}

#[test]
fn list_files_prints_the_program() {
    let dir = fixture(&[
        ("tsconfig.json", "{}"),
        ("index.ts", "import type { B } from \"./lib/b\";\nexport type A = B;\n"),
        ("lib/b.ts", "export type B = 1;\n"),
    ]);

    let (ok, out) = run_with(
        &dir,
        BuildArgs {
            list_files: true,
            ..args()
        },
    );
    assert!(ok);
    insta::assert_snapshot!(out, @r"
    lib.d.ts
    /p/index.ts
    /p/lib/b.ts
    ");
}
