//! Compiler options understood by the pipeline.
//!
//! Field names follow `tsconfig.json` (`camelCase`), so the CLI deserializes
//! `compilerOptions` straight into [`CompilerOptions`]. Path options are
//! expected to be absolute by the time they reach the program.

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerOptions {
    pub declaration: bool,
    pub emit_declaration_only: bool,
    pub declaration_dir: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub out_file: Option<PathBuf>,
    pub root_dir: Option<PathBuf>,
    pub no_emit: bool,
    pub no_emit_on_error: bool,
    pub remove_comments: bool,
    pub strict: bool,
    pub strict_null_checks: Option<bool>,
    pub no_implicit_any: Option<bool>,
    pub no_lib: bool,
    pub composite: bool,
    pub incremental: bool,
    pub ts_build_info_file: Option<PathBuf>,
    pub new_line: Option<NewLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewLine {
    Lf,
    Crlf,
}

impl CompilerOptions {
    pub fn strict_null_checks(&self) -> bool {
        self.strict_null_checks.unwrap_or(self.strict)
    }

    pub fn no_implicit_any(&self) -> bool {
        self.no_implicit_any.unwrap_or(self.strict)
    }

    pub fn new_line(&self) -> &'static str {
        match self.new_line {
            Some(NewLine::Crlf) => "\r\n",
            _ => "\n",
        }
    }
}
