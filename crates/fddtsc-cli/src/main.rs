mod cli;
mod commands;
mod logging;
mod project;

use cli::{BuildParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();
    let params = BuildParams::from_matches(&matches);
    logging::init(params.verbose);
    std::process::exit(commands::build::run(params.into()));
}
