//! utfgrid - Command-line tool for encoding interactive feature grids

use std::process::ExitCode;

use utfgrid::cli;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    cli::run()
}
