//! Host driver commands.

mod args;
pub mod check;
pub mod compress;

pub use args::{Cli, Commands, CompressArgs};

use anyhow::{Context, Result};
use asset_finalizer::FinalizerConfig;

/// Load configuration relative to the working directory and apply CLI
/// overrides.
pub fn load_config(cli: &Cli) -> Result<FinalizerConfig> {
    let cwd = std::env::current_dir().context("Failed to get current working directory")?;
    let mut config = FinalizerConfig::load(&cli.config, &cwd)?;

    if let Some(public) = &cli.public {
        config.public_dir = cwd.join(public);
    }

    if let Commands::Compress { args } = &cli.command {
        update_option(&mut config.assets.sourcemaps_embed_source, args.embed_source.as_ref());
        if args.gzip.is_some() {
            config.assets.sourcemaps_gzip = args.gzip;
        }
    }

    Ok(config)
}

/// Update config option if CLI value is provided.
fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
    if let Some(option) = cli_option {
        *config_option = option.clone();
    }
}
