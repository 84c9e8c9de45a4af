//! Signal Calculator terminal keypad
//!
//! ```bash
//! signal-calc 4 + 6 =
//! ```

use clap::Parser;
use signal_calc_cli::{init_tracing, run_with, Cli, CliResult};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_with(&cli, stdin.lock(), stdout.lock())
}
