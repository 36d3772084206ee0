//! Argument builders for the CLI.
//!
//! Each function returns a `clap::Arg` that `commands.rs` composes into the
//! command.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Config file or directory holding `tsconfig.json` (positional).
pub fn project_arg() -> Arg {
    Arg::new("project")
        .value_name("PROJECT")
        .value_parser(value_parser!(PathBuf))
        .default_value("tsconfig.json")
        .help("Path to tsconfig.json, or a directory containing one")
}

/// Pretty diagnostics with source snippets (--pretty).
pub fn pretty_arg() -> Arg {
    Arg::new("pretty")
        .long("pretty")
        .action(ArgAction::SetTrue)
        .help("Show diagnostics with source snippets")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize diagnostics")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::Count)
        .help("Log pipeline progress to stderr (-v for debug, -vv for trace)")
}

/// Print every file of the program (--list-files).
pub fn list_files_arg() -> Arg {
    Arg::new("list_files")
        .long("list-files")
        .action(ArgAction::SetTrue)
        .help("Print the files that are part of the compilation")
}
