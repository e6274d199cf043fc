//! # npm-meta CLI
//!
//! Thin file-based front end for [`npm_meta`]: reads a stored metadata document
//! and an `npm publish` upload from disk, merges them, and streams the result to
//! a file or stdout.

pub mod cli;
pub mod commands;
pub mod storage;

pub use cli::{Cli, Commands};
pub use commands::{
    merge, merge_with_config, resolve_config, resolve_config_with, run, MergeArgs,
};
