//! The one command: load the project, check it, and write declarations with
//! markers applied.
//!
//! Diagnostics go to stdout, in the order `tsc` prints them: configuration
//! problems (and nothing else), or pre-emit diagnostics followed by emit
//! diagnostics.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fddtsc_compiler::Diagnostics;
use fddtsc_compiler::emit::emit;
use fddtsc_compiler::program::{FsHost, Program};
use fddtsc_compiler::source_map::SourceMap;
use fddtsc_compiler::transform::MarkerTransformer;
use fddtsc_core::Colors;
use tracing::{debug, info};

use crate::project::Project;

pub struct BuildArgs {
    pub project: PathBuf,
    pub pretty: bool,
    pub color: bool,
    pub list_files: bool,
}

/// Failures that end the build without diagnostics to show.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Compiler(#[from] fddtsc_compiler::Error),

    #[error("cannot write diagnostics: {0}")]
    Output(#[from] io::Error),
}

pub fn run(args: BuildArgs) -> i32 {
    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => {
            eprintln!("error: cannot read the current directory: {err}");
            return 1;
        }
    };

    let stdout = io::stdout();
    match build(&args, &cwd, &mut stdout.lock()) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

/// Runs the build, writing diagnostics to `out`. `Ok(false)` means the
/// exit status is a failure: bad configuration, pre-emit errors, or output
/// that was not written.
pub fn build(args: &BuildArgs, cwd: &Path, out: &mut dyn Write) -> Result<bool, BuildError> {
    let project = match Project::load(&args.project, cwd) {
        Ok(project) => project,
        Err(err) => {
            debug!(%err, "configuration rejected");
            let rendered = err
                .printer()
                .colors(Colors::new(args.color))
                .pretty(args.pretty)
                .render();
            out.write_all(rendered.as_bytes())?;
            return Ok(false);
        }
    };

    let mut host = FsHost::new(project.directory());
    let program = Program::new(project.sources, &project.root_names, project.options, &host)?;
    let checker = program.checker();

    let pre_emit = checker.pre_emit_diagnostics();
    print(out, &pre_emit, program.sources(), args)?;

    let mut markers = MarkerTransformer::new(&checker);
    let result = emit(&program, &checker, &mut host, &mut [&mut markers])?;
    print(out, &result.diagnostics, program.sources(), args)?;

    if args.list_files {
        for file in program.files() {
            writeln!(out, "{}", program.source(file.id()).display_name())?;
        }
    }

    info!(
        emitted = result.emitted_files.len(),
        skipped = result.emit_skipped,
        errors = pre_emit.error_count() + result.diagnostics.error_count(),
        "build finished"
    );
    Ok(!pre_emit.has_errors() && !result.emit_skipped)
}

fn print(
    out: &mut dyn Write,
    diagnostics: &Diagnostics,
    sources: &SourceMap,
    args: &BuildArgs,
) -> io::Result<()> {
    if diagnostics.is_empty() {
        return Ok(());
    }
    let rendered = diagnostics
        .printer(sources)
        .colors(Colors::new(args.color))
        .pretty(args.pretty)
        .render();
    out.write_all(rendered.as_bytes())
}
