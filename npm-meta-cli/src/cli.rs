//! Command-line interface definitions for the `npm-meta` tool

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line interface for npm metadata maintenance
#[derive(Parser, Debug)]
#[command(name = "npm-meta")]
#[command(about = "Merge npm publish uploads into registry package metadata")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge a publish upload into stored package metadata
    Merge {
        /// Stored metadata document (treated as empty if it does not exist)
        #[arg(long)]
        meta: PathBuf,
        /// Uploaded `npm publish` JSON document
        #[arg(long)]
        upload: PathBuf,
        /// Tarball URL prefix; overrides config file and NPM_META_PATH_PREFIX
        #[arg(long)]
        prefix: Option<String>,
        /// JSON config file
        #[arg(long, default_value = "npm-meta.json")]
        config: PathBuf,
        /// Write the merged document here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Print the @scope/package/-/@scope/file part of a tarball URL
    Extract {
        /// Tarball URL
        tarball: String,
    },
}
