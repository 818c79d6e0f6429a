//! `2fa` binary entry point.

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = twofa::Cli::parse();
    let _log_guard = twofa::logging::init(cli.verbose);

    match twofa::run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("2fa: {err:#}");
            ExitCode::FAILURE
        }
    }
}
