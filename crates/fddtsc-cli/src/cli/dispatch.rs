//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::build::BuildArgs;

pub struct BuildParams {
    pub project: PathBuf,
    pub pretty: bool,
    pub color: ColorChoice,
    pub verbose: u8,
    pub list_files: bool,
}

impl BuildParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            project: m
                .get_one::<PathBuf>("project")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("tsconfig.json")),
            pretty: m.get_flag("pretty"),
            color: parse_color(m),
            verbose: m.get_count("verbose"),
            list_files: m.get_flag("list_files"),
        }
    }
}

impl From<BuildParams> for BuildArgs {
    fn from(p: BuildParams) -> Self {
        Self {
            project: p.project,
            pretty: p.pretty,
            color: p.color.should_colorize(),
            list_files: p.list_files,
        }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
