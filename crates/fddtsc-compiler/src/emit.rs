//! Declaration output: build, transform, print and write every file.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::checker::Checker;
use crate::diagnostics::DiagnosticKind;
use crate::dts::tree::{DtsBundle, DtsFile, Statement};
use crate::dts::{Printer, PrinterOptions, emit_declarations};
use crate::parser::ast::string_literal_value;
use crate::program::{EmitHost, Program, paths};
use crate::source_map::SourceId;
use crate::transform::Transformer;
use crate::{Diagnostics, Error, Result};

#[derive(Debug, Default)]
pub struct EmitResult {
    /// Some output was not written.
    pub emit_skipped: bool,
    /// Problems found while emitting, not including pre-emit diagnostics.
    pub diagnostics: Diagnostics,
    pub emitted_files: Vec<PathBuf>,
}

/// Emits declarations for every file of `program`.
///
/// `transformers` run in order on each declaration tree before printing.
/// Host write failures are fatal; everything else ends up in the result.
pub fn emit(
    program: &Program,
    checker: &Checker<'_>,
    host: &mut dyn EmitHost,
    transformers: &mut [&mut dyn Transformer],
) -> Result<EmitResult> {
    let options = program.options();
    let mut result = EmitResult::default();

    if options.no_emit {
        debug!("noEmit set, nothing written");
        result.emit_skipped = true;
        return Ok(result);
    }
    if options.no_emit_on_error && checker.pre_emit_diagnostics().has_errors() {
        debug!("pre-emit errors with noEmitOnError, nothing written");
        result.emit_skipped = true;
        return Ok(result);
    }

    let printer_options = PrinterOptions {
        new_line: options.new_line(),
        remove_comments: options.remove_comments,
    };
    let files: Vec<SourceId> = program.files_to_emit().map(|f| f.id()).collect();

    if let Some(out_file) = &options.out_file {
        let mut bundle = DtsBundle { files: Vec::new() };
        for &file in &files {
            let (dts, diagnostics) = emit_declarations(checker, file);
            if diagnostics.has_errors() {
                result.emit_skipped = true;
            }
            result.diagnostics.extend(diagnostics);
            bundle.files.push(dts);
        }
        if result.emit_skipped {
            return Ok(result);
        }
        for transformer in transformers.iter_mut() {
            bundle = transformer.transform_bundle(bundle);
        }
        let root = source_root(program, &mut result.diagnostics);
        for dts in &mut bundle.files {
            rename_bundle_modules(program, dts, &root);
        }
        let text = Printer::new(Some(program.sources()), printer_options)
            .print_bundle(&bundle, |id| bundle_module_name(program, id, &root));
        let path = with_declaration_extension(out_file);
        write(host, &path, &text)?;
        result.emitted_files.push(path);
        return Ok(result);
    }

    let root = source_root(program, &mut result.diagnostics);
    for file in files {
        let (mut dts, diagnostics) = emit_declarations(checker, file);
        if diagnostics.has_errors() {
            debug!(file = %program.source(file).display_name(), "declaration errors, file skipped");
            result.emit_skipped = true;
            result.diagnostics.extend(diagnostics);
            continue;
        }
        result.diagnostics.extend(diagnostics);
        for transformer in transformers.iter_mut() {
            dts = transformer.transform_file(dts);
        }
        let text = Printer::new(Some(program.sources()), printer_options).print_file(&dts);
        let path = declaration_path(program, file, &root);
        write(host, &path, &text)?;
        result.emitted_files.push(path);
    }
    debug!(
        written = result.emitted_files.len(),
        skipped = result.emit_skipped,
        "emit finished"
    );
    Ok(result)
}

fn write(host: &mut dyn EmitHost, path: &Path, text: &str) -> Result<()> {
    host.write_file(path, text).map_err(|source| Error::WriteFile {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "wrote declarations");
    Ok(())
}

/// `rootDir`, or the common directory of the emitted files. Files outside
/// `rootDir` are reported.
fn source_root(program: &Program, diagnostics: &mut Diagnostics) -> PathBuf {
    let Some(root_dir) = &program.options().root_dir else {
        return program.common_source_directory();
    };
    for file in program.files_to_emit() {
        let path = program.source(file.id()).path();
        if !path.starts_with(root_dir) {
            diagnostics
                .report_global(DiagnosticKind::FileNotUnderRootDir)
                .args(&[
                    &program.source(file.id()).display_name(),
                    &root_dir.to_string_lossy().replace('\\', "/"),
                ])
                .emit();
        }
    }
    root_dir.clone()
}

/// Where the declarations of `file` go.
pub fn declaration_path(program: &Program, file: SourceId, root: &Path) -> PathBuf {
    let options = program.options();
    let source = program.source(file).path();
    let dir = source.parent().unwrap_or(Path::new("/"));
    let out_dir = match options.declaration_dir.as_ref().or(options.out_dir.as_ref()) {
        Some(out) => match dir.strip_prefix(root) {
            Ok(relative) => out.join(relative),
            Err(_) => out.clone(),
        },
        None => dir.to_path_buf(),
    };
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    paths::normalize(&out_dir.join(declaration_file_name(&name)))
}

/// `a.ts` → `a.d.ts`, `a.mts` → `a.d.mts`, `a.cts` → `a.d.cts`.
pub fn declaration_file_name(name: &str) -> String {
    for (ext, dts) in [(".tsx", ".d.ts"), (".mts", ".d.mts"), (".cts", ".d.cts"), (".ts", ".d.ts")] {
        if let Some(stem) = name.strip_suffix(ext) {
            return format!("{stem}{dts}");
        }
    }
    format!("{name}.d.ts")
}

fn with_declaration_extension(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = [".d.ts", ".js", ".mjs", ".cjs", ".jsx", ".tsx", ".ts", ".mts", ".cts"]
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .unwrap_or(&name);
    path.with_file_name(format!("{stem}.d.ts"))
}

/// Module name of a bundled file: its path under the source root, without
/// extension.
fn bundle_module_name(program: &Program, file: SourceId, root: &Path) -> String {
    let path = program.source(file).path();
    let relative = paths::relative_path(root, path);
    for ext in [".d.ts", ".tsx", ".ts", ".mts", ".cts"] {
        if let Some(stem) = relative.strip_suffix(ext) {
            return stem.to_string();
        }
    }
    relative
}

/// Points relative specifiers of a bundled file at the bundle's module names.
fn rename_bundle_modules(program: &Program, dts: &mut DtsFile, root: &Path) {
    let Some(file) = program.file(dts.source) else {
        return;
    };
    let rename = |module: &mut String| {
        let specifier = string_literal_value(module);
        if let Some(target) = file.resolved_module(&specifier)
            && !program.source(target).is_declaration_file()
        {
            *module = format!("\"{}\"", bundle_module_name(program, target, root));
        }
    };
    for statement in &mut dts.statements {
        match statement {
            Statement::Import(import) => rename(&mut import.module),
            Statement::Export(export) => {
                if let Some(module) = &mut export.module {
                    rename(module);
                }
            }
            _ => {}
        }
    }
}
