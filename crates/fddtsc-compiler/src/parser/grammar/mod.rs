//! Grammar productions for the declaration subset of TypeScript.
//!
//! This module implements all `parse_*` methods as an extension of `Parser`.
//! Statements live in `statements`, type expressions in `types`, object members,
//! parameters and type parameters in `members`. Expressions are never parsed:
//! initializers and bodies are kept as balanced raw token runs (`utils`).

mod members;
mod statements;
mod types;
mod utils;
