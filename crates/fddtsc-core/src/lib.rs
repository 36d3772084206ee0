#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Leaf utilities shared by the fddtsc compiler and CLI.
//!
//! - [`Colors`]: ANSI palette passed by value into renderers
//! - [`LineIndex`]: byte offset to line/column translation
//! - [`utils`]: identifier and string-literal helpers used by printers

pub mod colors;
pub mod line_index;
pub mod utils;

#[cfg(test)]
mod line_index_tests;
#[cfg(test)]
mod utils_tests;

pub use colors::Colors;
pub use line_index::{LineCol, LineIndex};
