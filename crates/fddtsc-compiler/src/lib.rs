//! fddtsc: declaration-file generation with marker-driven rewrites.
//!
//! The crate covers the whole pipeline behind the `fddtsc` binary: parsing the
//! declaration subset of TypeScript, binding and type-checking a program,
//! emitting `.d.ts` trees, and the marker transform that rewrites type aliases
//! tagged with `//! fddtsc::bake`, `//! fddtsc::newtype` or `//! fddtsc::unwrap`.
//!
//! # Example
//!
//! ```
//! use fddtsc_compiler::emit::emit;
//! use fddtsc_compiler::options::CompilerOptions;
//! use fddtsc_compiler::program::{MemoryHost, Program};
//! use fddtsc_compiler::source_map::SourceMap;
//! use fddtsc_compiler::transform::MarkerTransformer;
//!
//! let mut host = MemoryHost::new();
//! host.add_file("/p/a.ts", "export const answer = 42;\n");
//!
//! let roots = ["/p/a.ts".into()];
//! let program = Program::new(SourceMap::new(), &roots, CompilerOptions::default(), &host).unwrap();
//! let checker = program.checker();
//! let mut markers = MarkerTransformer::new(&checker);
//! let result = emit(&program, &checker, &mut host, &mut [&mut markers]).unwrap();
//!
//! assert!(!result.emit_skipped);
//! assert_eq!(host.written("/p/a.d.ts").unwrap(), "export declare const answer = 42;\n");
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::path::PathBuf;

pub mod checker;
pub mod diagnostics;
pub mod dts;
pub mod emit;
pub mod options;
pub mod parser;
pub mod program;
pub mod source_map;
pub mod transform;

#[cfg(test)]
mod emit_tests;
#[cfg(test)]
mod source_map_tests;
#[cfg(test)]
mod test_utils;

/// Result type for passes that produce both output and diagnostics.
///
/// Each pass returns its typed output alongside any diagnostics it collected.
/// Fatal errors (like fuel exhaustion) use the outer `Result`.
pub type PassResult<T> = std::result::Result<(T, Diagnostics), Error>;

pub use diagnostics::{Diagnostics, DiagnosticsPrinter, Severity};

/// Fatal errors. Everything recoverable is a diagnostic instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Execution fuel exhausted (too many parser operations).
    #[error("execution limit exceeded")]
    ExecFuelExhausted,

    /// Recursion fuel exhausted (input nested too deeply).
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    #[error("cannot write file '{}'", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for fallible library operations.
pub type Result<T> = std::result::Result<T, Error>;
