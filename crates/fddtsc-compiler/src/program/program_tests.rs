use std::path::{Path, PathBuf};

use super::{MemoryHost, Program, paths};
use crate::options::CompilerOptions;
use crate::source_map::{SourceId, SourceKind, SourceMap};
use crate::test_utils::{INDEX, host_with, program_with, source_id, strict};

fn names(program: &Program, files: impl Iterator<Item = SourceId>) -> Vec<String> {
    files.map(|id| program.source(id).display_name()).collect()
}

#[test]
fn imports_pull_in_files() {
    let files = [
        (
            INDEX,
            "import type { T } from \"./types\";\nexport * from \"./lib\";\nexport type U = T;\n",
        ),
        ("/p/types.d.ts", "export type T = 1;\n"),
        ("/p/lib/index.ts", "export const one = 1;\n"),
        ("/p/unused.ts", "export {};\n"),
    ];
    let (p, _) = program_with(&files, strict());

    assert_eq!(
        names(&p, p.files().map(|f| f.id())),
        ["lib.d.ts", "/p/index.ts", "/p/types.d.ts", "/p/lib/index.ts"]
    );
    assert_eq!(
        names(&p, p.files_to_emit().map(|f| f.id())),
        ["/p/index.ts", "/p/lib/index.ts"]
    );
    assert_eq!(names(&p, p.root_files().iter().copied()), ["/p/index.ts"]);
    assert_eq!(p.common_source_directory(), PathBuf::from("/p"));
}

#[test]
fn module_resolution() {
    let files = [
        (
            INDEX,
            "import \"./a.js\";\nimport \"./dir\";\nimport \"react\";\nimport \"./types\";\n",
        ),
        ("/p/a.ts", ""),
        ("/p/dir/index.ts", ""),
        ("/p/types.ts", ""),
        ("/p/types.d.ts", ""),
    ];
    let (p, _) = program_with(&files, strict());
    let index = p.file(source_id(&p, INDEX)).unwrap();

    assert_eq!(index.resolved_module("./a.js"), Some(source_id(&p, "/p/a.ts")));
    assert_eq!(index.resolved_module("./dir"), Some(source_id(&p, "/p/dir/index.ts")));
    assert_eq!(index.resolved_module("./types"), Some(source_id(&p, "/p/types.ts")));
    assert_eq!(index.resolved_module("react"), None);
    assert_eq!(index.references().len(), 4);
}

#[test]
fn missing_roots_are_reported() {
    let host = host_with(&[(INDEX, "export {};\n")]);
    let roots = [PathBuf::from("index.ts"), PathBuf::from("missing.ts")];
    let p = Program::new(SourceMap::new(), &roots, strict(), &host).unwrap();

    assert_eq!(names(&p, p.root_files().iter().copied()), ["/p/index.ts"]);
    insta::assert_snapshot!(
        p.global_diagnostics().printer(p.sources()).render(),
        @"Error: File '/p/missing.ts' not found."
    );
}

#[test]
fn no_lib_leaves_out_the_default_library() {
    let options = CompilerOptions {
        no_lib: true,
        ..strict()
    };
    let (p, _) = program_with(&[(INDEX, "export {};\n")], options);
    assert_eq!(names(&p, p.files().map(|f| f.id())), ["/p/index.ts"]);
}

#[test]
fn files_already_in_the_source_map_keep_their_ids() {
    let mut sources = SourceMap::new();
    let config = sources.add(SourceKind::Config, "/p/tsconfig.json", "{}");
    let mut host = MemoryHost::new().with_cwd("/p");
    host.add_file(INDEX, "export {};\n");
    let p = Program::new(sources, &[PathBuf::from(INDEX)], strict(), &host).unwrap();

    assert_eq!(p.source(config).display_name(), "/p/tsconfig.json");
    assert!(p.file(config).is_none());
}

#[test]
fn path_helpers() {
    assert_eq!(paths::normalize(Path::new("/p/./a/../b.ts")), PathBuf::from("/p/b.ts"));
    assert_eq!(paths::resolve(Path::new("/p"), Path::new("src/a.ts")), PathBuf::from("/p/src/a.ts"));
    assert_eq!(
        paths::common_directory([Path::new("/p/src/a.ts"), Path::new("/p/lib/b.ts")]),
        Some(PathBuf::from("/p"))
    );
    assert_eq!(paths::relative_path(Path::new("/p/src"), Path::new("/p/lib/b.ts")), "../lib/b.ts");
    assert_eq!(paths::module_specifier(Path::new("/p"), Path::new("/p/models/user.ts")), "./models/user");
    assert_eq!(paths::module_specifier(Path::new("/p/a"), Path::new("/p/index.d.ts")), "..");
    assert_eq!(paths::module_specifier(Path::new("/p/src"), Path::new("/p/lib/index.ts")), "../lib");
}
