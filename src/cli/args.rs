//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use sieve::config::CONFIG_FILE;

/// Sieve asset filter CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: sieve.toml)
    #[arg(short = 'C', long, global = true, default_value = CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run filters over asset files
    #[command(visible_alias = "a")]
    Apply {
        #[command(flatten)]
        args: ApplyArgs,
    },

    /// Delete compiled template artifacts
    #[command(visible_alias = "c")]
    Clean,
}

/// Apply command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ApplyArgs {
    /// Asset files to process. Must live inside one of the `[assets] paths`.
    #[arg(value_name = "PATH", required = true, value_hint = clap::ValueHint::FilePath)]
    pub paths: Vec<PathBuf>,

    /// Filters to run, in order. Defaults by extension: .haml -> template, .css -> css
    #[arg(short, long = "filter", value_enum)]
    pub filters: Vec<FilterKind>,

    /// Print results to stdout instead of writing them to the cache directory
    #[arg(short, long)]
    pub print: bool,
}

/// Filters selectable on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Compile and render templates
    Template,
    /// Rewrite stylesheet url() references
    Css,
}

impl FilterKind {
    /// Default filter for a file extension.
    pub fn for_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "haml" => Some(Self::Template),
            "css" => Some(Self::Css),
            _ => None,
        }
    }
}
