use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use datasweeper::{cli::Cli, utils::init_logger};

fn main() -> Result<ExitCode> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logger(cli.verbose);

    // Every failure that is not a per-file message aborts with an error
    let succeeded = datasweeper::cli::run(cli)?;

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
