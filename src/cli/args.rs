//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Minify JavaScript assets and link them to fingerprinted source maps
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: finalizer.toml, searched upward)
    #[arg(short = 'C', long, global = true, default_value = "finalizer.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Public directory override (relative to current directory)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub public: Option<PathBuf>,

    /// Show every artifact written or skipped
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Minify files, write their source maps and print or save the result
    #[command(visible_alias = "c")]
    Compress {
        #[command(flatten)]
        args: CompressArgs,
    },

    /// Validate the configuration and print the effective settings
    Check,
}

/// Compress command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct CompressArgs {
    /// JavaScript files to finalize
    #[arg(value_name = "FILE", required = true, value_hint = clap::ValueHint::FilePath)]
    pub files: Vec<PathBuf>,

    /// Logical asset name (single file only; default: file name without `.js`)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Write `<name>.js` files here instead of printing to stdout
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub out_dir: Option<PathBuf>,

    /// Embed sources in the map instead of writing uncompressed copies
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub embed_source: Option<bool>,

    /// Write `.gz` siblings for artifacts
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub gzip: Option<bool>,
}
