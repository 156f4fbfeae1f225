//! Draws the feat dependency graph of a character planner installation.

use std::process;

use clap::Parser;

mod cli;
use cli::Cli;

fn main() {
    // Usage errors exit with status 1; help and version requests exit normally.
    let cli = Cli::try_parse().unwrap_or_else(|error| {
        if error.use_stderr() {
            let _ = error.print();
            process::exit(1);
        }
        error.exit()
    });

    if let Err(error) = cli.run() {
        eprintln!("Error: {error:?}");
        process::exit(1);
    }
}
