//! Nestcheck CLI - Command-line utility for recursive verification of
//! nested archives.

mod cli;
mod commands;
mod digest;
mod error;
mod logging;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;
use progress::CliProgress;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    logging::init_tracing(cli.verbose, cli.quiet);
    let formatter = output::create_formatter(cli.json, cli.verbose > 0, cli.quiet);

    match &cli.command {
        cli::Commands::Verify(args) => {
            let show_progress = !cli.json && !cli.quiet && CliProgress::should_show();
            commands::verify::execute(args, &*formatter, show_progress)
        }
        cli::Commands::Completion { shell } => {
            commands::completion::execute(*shell);
            Ok(())
        }
    }
}
