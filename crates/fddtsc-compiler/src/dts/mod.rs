//! Declaration trees: building them from source, rewriting them, printing them.
//!
//! - [`tree`]: the owned node types.
//! - [`emitter`]: source file → [`DtsFile`], the declaration view of the file.
//! - [`fold`]: the rewriting traversal transformers implement.
//! - [`factory`]: constructors for synthesized nodes.
//! - [`printer`]: [`DtsFile`] → text.

mod emitter;
pub mod factory;
pub mod fold;
pub mod printer;
pub mod tree;

#[cfg(test)]
mod emitter_tests;
#[cfg(test)]
mod printer_tests;

pub use emitter::emit_declarations;
pub use fold::Fold;
pub use printer::{Printer, PrinterOptions, print_type};
pub use tree::{DtsBundle, DtsFile, Origin, Statement, TypeNode, TypeNodeKind};
