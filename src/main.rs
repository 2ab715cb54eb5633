//! Sieve - run asset filters from the command line.

mod cli;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use sieve::config::SieveConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    sieve::logger::set_verbose(cli.verbose);

    let config = SieveConfig::load(&cli.config)?;

    match &cli.command {
        Commands::Apply { args } => cli::apply::run_apply(args, &config),
        Commands::Clean => cli::clean::run_clean(&config),
    }
}
