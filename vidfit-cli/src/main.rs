// ============================================================================
// vidfit-cli/src/main.rs
// ============================================================================
//
// VIDFIT CLI: Entry point
//
// Parses arguments, sets up logging, dispatches to the encode subcommands and
// maps the outcome to a process exit code (0 on success, 1 on any failure).

use clap::Parser;
use owo_colors::OwoColorize;
use std::process;

use vidfit_cli::error::suggestion_for;
use vidfit_cli::{Cli, Commands, logging, run_mp4, run_webm};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match &cli.command {
        Commands::Mp4(args) => run_mp4(args),
        Commands::Webm(args) => run_webm(args),
    };

    if let Err(e) = result {
        if std::env::var_os("NO_COLOR").is_none() {
            eprintln!("{} {}", "Error:".red().bold(), e);
        } else {
            eprintln!("Error: {e}");
        }
        if let Some(hint) = suggestion_for(&e) {
            eprintln!("  {hint}");
        }
        process::exit(1);
    }
}
