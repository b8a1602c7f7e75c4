//! Entry point for the `rdfdump` binary.
#![forbid(unsafe_code)]

use std::{io, process::ExitCode};

use rdfdump_cli::CliError;

fn main() -> ExitCode {
    let stdout = io::stdout();
    match rdfdump_cli::run(&mut stdout.lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err @ CliError::MissingArgument { .. }) => {
            eprintln!("rdfdump: {err}");
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("rdfdump: {err}");
            ExitCode::FAILURE
        }
    }
}
