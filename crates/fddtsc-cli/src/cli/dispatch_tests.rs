//! Tests for CLI argument parsing and params extraction.

use std::path::PathBuf;

use super::*;

fn params(args: &[&str]) -> BuildParams {
    let m = build_cli().try_get_matches_from(args).unwrap();
    BuildParams::from_matches(&m)
}

#[test]
fn defaults() {
    let p = params(&["fddtsc"]);
    assert_eq!(p.project, PathBuf::from("tsconfig.json"));
    assert!(!p.pretty);
    assert_eq!(p.color, ColorChoice::Auto);
    assert_eq!(p.verbose, 0);
    assert!(!p.list_files);
}

#[test]
fn all_flags() {
    let p = params(&[
        "fddtsc",
        "packages/app",
        "--pretty",
        "--color",
        "never",
        "-vv",
        "--list-files",
    ]);
    assert_eq!(p.project, PathBuf::from("packages/app"));
    assert!(p.pretty);
    assert_eq!(p.color, ColorChoice::Never);
    assert_eq!(p.verbose, 2);
    assert!(p.list_files);
}

#[test]
fn params_become_build_args() {
    let args: crate::commands::build::BuildArgs = params(&["fddtsc", "--color", "always"]).into();
    assert!(args.color);
    assert_eq!(args.project, PathBuf::from("tsconfig.json"));

    let args: crate::commands::build::BuildArgs = params(&["fddtsc", "--color", "never"]).into();
    assert!(!args.color);
}

#[test]
fn invalid_color_is_rejected() {
    let result = build_cli().try_get_matches_from(["fddtsc", "--color", "sometimes"]);
    assert!(result.is_err());
}

#[test]
fn extra_positionals_are_rejected() {
    let result = build_cli().try_get_matches_from(["fddtsc", "a.json", "b.json"]);
    assert!(result.is_err());
}

#[test]
fn help_lists_the_markers() {
    let help = build_cli().render_long_help().to_string();
    assert!(help.contains("//! fddtsc::bake"), "{help}");
    assert!(help.contains("--list-files"), "{help}");
}
