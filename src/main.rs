//! asset-finalizer - minify JavaScript with fingerprinted source maps.

mod cli;

use anyhow::Result;
use asset_finalizer::{Finalizer, logger};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = cli::load_config(&cli)?;

    match &cli.command {
        Commands::Compress { args } => cli::compress::run(&Finalizer::new(config), args),
        Commands::Check => {
            cli::check::run(&config);
            Ok(())
        }
    }
}
