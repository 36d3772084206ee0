use std::fs;
use std::path::{Path, PathBuf};

use fddtsc_compiler::options::NewLine;
use indoc::indoc;
use tempfile::TempDir;

use super::{ConfigError, Project};

fn fixture(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (path, text) in files {
        let path = dir.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }
    dir
}

fn load(dir: &TempDir) -> Result<Project, ConfigError> {
    Project::load(Path::new("."), dir.path())
}

fn slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn relative(dir: &TempDir, paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| slash(p.strip_prefix(dir.path()).unwrap()))
        .collect()
}

fn errors(dir: &TempDir) -> String {
    let err = load(dir).unwrap_err();
    err.printer().render().replace(&slash(dir.path()), "/p")
}

#[test]
fn default_include_walks_the_project() {
    let dir = fixture(&[
        ("tsconfig.json", r#"{ "compilerOptions": { "strict": true } }"#),
        ("README.md", "# readme\n"),
        ("types.d.ts", "declare type G = 1;\n"),
        ("src/index.ts", "export {};\n"),
        ("src/index.d.ts", "export {};\n"),
        ("src/lib/util.ts", "export {};\n"),
        ("node_modules/pkg/index.d.ts", "export {};\n"),
        (".cache/x.ts", "export {};\n"),
    ]);
    let project = load(&dir).unwrap();

    assert_eq!(
        relative(&dir, &project.root_names),
        ["types.d.ts", "src/index.ts", "src/lib/util.ts"]
    );
    assert_eq!(project.config_path, dir.path().join("tsconfig.json"));
    assert_eq!(project.directory(), dir.path());
    assert!(project.options.strict);
}

#[test]
fn declaration_only_settings_are_forced() {
    let dir = fixture(&[
        (
            "tsconfig.json",
            indoc! {r#"
            {
              "compilerOptions": {
                "declaration": false,
                "composite": true,
                "incremental": true,
                "tsBuildInfoFile": "./.tsbuildinfo",
                "newLine": "CRLF"
              }
            }
            "#},
        ),
        ("a.ts", "export {};\n"),
    ]);
    let options = load(&dir).unwrap().options;

    assert!(options.declaration);
    assert!(options.emit_declaration_only);
    assert!(!options.composite);
    assert!(!options.incremental);
    assert_eq!(options.ts_build_info_file, None);
    assert_eq!(options.new_line, Some(NewLine::Crlf));
}

#[test]
fn files_list_disables_the_default_include() {
    let dir = fixture(&[
        ("tsconfig.json", r#"{ "files": ["a.ts", "missing.ts"] }"#),
        ("a.ts", "export {};\n"),
        ("b.ts", "export {};\n"),
    ]);
    let project = load(&dir).unwrap();
    assert_eq!(relative(&dir, &project.root_names), ["a.ts", "missing.ts"]);

    let dir = fixture(&[
        ("tsconfig.json", r#"{ "files": ["a.ts"], "include": ["src"] }"#),
        ("a.ts", "export {};\n"),
        ("src/b.ts", "export {};\n"),
        ("src/a.ts", "export {};\n"),
    ]);
    let project = load(&dir).unwrap();
    assert_eq!(relative(&dir, &project.root_names), ["a.ts", "src/a.ts", "src/b.ts"]);
}

#[test]
fn output_directories_are_excluded_by_default() {
    let dir = fixture(&[
        ("tsconfig.json", r#"{ "compilerOptions": { "outDir": "dist" } }"#),
        ("dist/a.d.ts", "export {};\n"),
        ("src/a.ts", "export {};\n"),
    ]);
    let project = load(&dir).unwrap();
    assert_eq!(relative(&dir, &project.root_names), ["src/a.ts"]);
    assert_eq!(project.options.out_dir, Some(dir.path().join("dist")));

    let dir = fixture(&[
        (
            "tsconfig.json",
            r#"{ "include": ["src/**/*.ts"], "exclude": ["src/generated"] }"#,
        ),
        ("src/a.ts", "export {};\n"),
        ("src/a.tsx", "export {};\n"),
        ("src/generated/schema.ts", "export {};\n"),
    ]);
    let project = load(&dir).unwrap();
    assert_eq!(relative(&dir, &project.root_names), ["src/a.ts"]);
}

#[test]
fn extends_merges_options_relative_to_each_file() {
    let dir = fixture(&[
        (
            "tsconfig.base.json",
            r#"{ "compilerOptions": { "strict": true, "removeComments": true, "outDir": "./out" } }"#,
        ),
        (
            "app/tsconfig.json",
            indoc! {r#"
            {
              "extends": "../tsconfig.base",
              "include": ["src"],
              "compilerOptions": { "strict": false, "outDir": null, "declarationDir": "types" }
            }
            "#},
        ),
        ("app/src/main.ts", "export {};\n"),
        ("lib/ignored.ts", "export {};\n"),
    ]);
    let project = Project::load(Path::new("app"), dir.path()).unwrap();

    assert_eq!(relative(&dir, &project.root_names), ["app/src/main.ts"]);
    assert!(!project.options.strict);
    assert!(project.options.remove_comments);
    assert_eq!(project.options.out_dir, None);
    assert_eq!(
        project.options.declaration_dir,
        Some(dir.path().join("app/types"))
    );
    assert_eq!(project.sources.len(), 2);
}

#[test]
fn extends_finds_packages_in_node_modules() {
    let dir = fixture(&[
        ("tsconfig.json", r#"{ "extends": "@tsconfig/strictest" }"#),
        (
            "node_modules/@tsconfig/strictest/tsconfig.json",
            r#"{ "compilerOptions": { "strict": true } }"#,
        ),
        ("a.ts", "export {};\n"),
    ]);
    let project = load(&dir).unwrap();
    assert!(project.options.strict);
    assert_eq!(relative(&dir, &project.root_names), ["a.ts"]);
}

#[test]
fn option_problems_point_at_their_keys() {
    let config = indoc! {r#"
    {
      // comment
      "compilerOptions": {
        "target": "es2022",
        "bogus": true,
        "strict": "yes",
      },
    }
    "#};
    let dir = fixture(&[("tsconfig.json", config), ("a.ts", "export {};\n")]);

    insta::assert_snapshot!(errors(&dir), @r"
    Error /p/tsconfig.json (5,5): Unknown compiler option 'bogus'.
    Error /p/tsconfig.json (6,5): Compiler option 'strict' requires a value of type boolean.
    ");
}

#[test]
fn syntax_errors_are_positioned() {
    let dir = fixture(&[("tsconfig.json", "{\n  \"files\": [\"a.ts\"]\n  \"include\": []\n}\n")]);
    let rendered = errors(&dir);
    assert!(rendered.starts_with("Error /p/tsconfig.json (3,"), "{rendered}");
    assert!(rendered.contains("expected `,` or `}`"), "{rendered}");
}

#[test]
fn no_inputs() {
    let dir = fixture(&[("tsconfig.json", r#"{ "include": ["src"] }"#)]);
    insta::assert_snapshot!(
        errors(&dir),
        @r#"Error: No inputs were found in config file '/p/tsconfig.json'. Specified 'include' paths were '["src"]' and 'exclude' paths were '[]'."#
    );
}

#[test]
fn missing_config_file() {
    let dir = fixture(&[]);
    insta::assert_snapshot!(errors(&dir), @"Error: Cannot read file '/p/tsconfig.json'.");
}

#[test]
fn unresolved_extends() {
    let dir = fixture(&[("tsconfig.json", r#"{"extends": "./nope"}"#), ("a.ts", "")]);
    insta::assert_snapshot!(errors(&dir), @"Error /p/tsconfig.json (1,2): File './nope' not found.");
}

#[test]
fn circular_extends() {
    let dir = fixture(&[
        ("tsconfig.json", r#"{"extends": "./a.json"}"#),
        ("a.json", r#"{"extends": "./b.json"}"#),
        ("b.json", r#"{"extends": "./a.json"}"#),
        ("x.ts", ""),
    ]);
    insta::assert_snapshot!(
        errors(&dir),
        @"Error /p/b.json (1,2): Circularity detected while resolving configuration: /p/tsconfig.json -> /p/a.json -> /p/b.json -> /p/a.json"
    );
}
