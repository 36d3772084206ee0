use clap::Command;

use super::args::*;

/// Build the complete CLI.
pub fn build_cli() -> Command {
    Command::new("fddtsc")
        .about("Emit .d.ts files and apply fddtsc markers to them")
        .version(env!("CARGO_PKG_VERSION"))
        .override_usage(
            "\
  fddtsc [PROJECT]
  fddtsc path/to/tsconfig.json
  fddtsc packages/app",
        )
        .after_help(
            r#"MARKERS:
  //! fddtsc::bake      replace the alias body with its fully expanded type
  //! fddtsc::newtype   turn references to the alias into `unknown`
  //! fddtsc::unwrap    turn references to the alias into their first type argument

EXAMPLES:
  fddtsc                         # ./tsconfig.json
  fddtsc tsconfig.build.json     # another config file
  fddtsc --pretty --color never  # snippets, no ANSI colors
  fddtsc -vv                     # trace every marker hit"#,
        )
        .arg(project_arg())
        .arg(pretty_arg())
        .arg(color_arg())
        .arg(verbose_arg())
        .arg(list_files_arg())
}
