//! Test helpers: in-memory programs and rendered pipeline output.

use std::path::PathBuf;

use crate::checker::{Checker, NodeBuilderFlags, TypeId};
use crate::dts::print_type;
use crate::emit::emit;
use crate::options::CompilerOptions;
use crate::parser::Statement;
use crate::program::{MemoryHost, Program};
use crate::source_map::{SourceId, SourceMap};
use crate::transform::MarkerTransformer;

/// Root file of single-file programs.
pub const INDEX: &str = "/p/index.ts";

pub fn strict() -> CompilerOptions {
    CompilerOptions {
        strict: true,
        ..CompilerOptions::default()
    }
}

pub fn host_with(files: &[(&str, &str)]) -> MemoryHost {
    let mut host = MemoryHost::new().with_cwd("/p");
    for (path, text) in files {
        host.add_file(path, *text);
    }
    host
}

/// Program rooted at the first file; the rest are reachable through imports.
pub fn program_with(files: &[(&str, &str)], options: CompilerOptions) -> (Program, MemoryHost) {
    let host = host_with(files);
    let roots = [PathBuf::from(files[0].0)];
    let program = Program::new(SourceMap::new(), &roots, options, &host).expect("program builds");
    (program, host)
}

pub fn program(src: &str) -> Program {
    program_with(&[(INDEX, src)], strict()).0
}

pub fn source_id(program: &Program, path: &str) -> SourceId {
    program
        .sources()
        .lookup(std::path::Path::new(path))
        .expect("file is part of the program")
}

/// Type denoted by the right-hand side of alias `name` in `file`.
pub fn alias_body(checker: &Checker<'_>, file: SourceId, name: &str) -> TypeId {
    let root = checker.program().file(file).expect("file is part of the program").root();
    let body = root
        .statements()
        .find_map(|statement| match statement {
            Statement::TypeAlias(alias) if alias.name().is_some_and(|n| n.text() == name) => alias.ty(),
            _ => None,
        })
        .expect("alias is declared");
    checker.type_from_type_node(file, &body)
}

/// Body of alias `name` in `/p/index.ts`, rendered with `flags`.
pub fn render_alias_with(src: &str, name: &str, flags: NodeBuilderFlags) -> String {
    let program = program(src);
    let checker = program.checker();
    let file = source_id(&program, INDEX);
    let ty = alias_body(&checker, file, name);
    match checker.type_to_node(ty, flags, file) {
        Some(node) => print_type(&node),
        None => "<none>".to_string(),
    }
}

/// Body of alias `name` in `/p/index.ts`, its own alias expanded.
pub fn expand(src: &str, name: &str) -> String {
    render_alias_with(src, name, NodeBuilderFlags::IN_TYPE_ALIAS | NodeBuilderFlags::NO_TRUNCATION)
}

/// Pre-emit diagnostics in the single-line layout.
pub fn check(src: &str) -> String {
    check_files(&[(INDEX, src)])
}

pub fn check_files(files: &[(&str, &str)]) -> String {
    let (program, _) = program_with(files, strict());
    let checker = program.checker();
    let diagnostics = checker.pre_emit_diagnostics();
    diagnostics.printer(program.sources()).render()
}

/// Declarations of every written file, markers applied, each under a
/// `// <path>` header. Emission problems are appended.
pub fn emit_files_with(files: &[(&str, &str)], options: CompilerOptions) -> String {
    let (program, mut host) = program_with(files, options);
    let checker = program.checker();
    let mut markers = MarkerTransformer::new(&checker);
    let result = emit(&program, &checker, &mut host, &mut [&mut markers]).expect("emit succeeds");

    let mut out = String::new();
    for (path, text) in host.written_files() {
        out.push_str(&format!("// {}\n{text}", path.display()));
    }
    if !result.diagnostics.is_empty() {
        out.push_str(&result.diagnostics.printer(program.sources()).render());
    }
    if result.emit_skipped {
        out.push_str("(emit skipped)\n");
    }
    out
}

pub fn emit_files(files: &[(&str, &str)]) -> String {
    emit_files_with(files, strict())
}

/// Declarations of a single `/p/index.ts`, markers applied.
pub fn emit_dts(src: &str) -> String {
    let (program, mut host) = program_with(&[(INDEX, src)], strict());
    let checker = program.checker();
    let mut markers = MarkerTransformer::new(&checker);
    let result = emit(&program, &checker, &mut host, &mut [&mut markers]).expect("emit succeeds");
    let mut out = host.written("/p/index.d.ts").unwrap_or_default().to_string();
    if !result.diagnostics.is_empty() {
        out.push_str(&result.diagnostics.printer(program.sources()).render());
    }
    out
}

/// Declarations of a single `/p/index.ts` without any transform.
pub fn emit_plain(src: &str) -> String {
    let (program, mut host) = program_with(&[(INDEX, src)], strict());
    let checker = program.checker();
    emit(&program, &checker, &mut host, &mut []).expect("emit succeeds");
    host.written("/p/index.d.ts").unwrap_or_default().to_string()
}
