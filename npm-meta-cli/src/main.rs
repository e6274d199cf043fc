//! `npm-meta` binary entry point

use anyhow::Result;
use clap::Parser;
use npm_meta_cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = npm_meta_logging::init_subscriber();

    let cli = Cli::parse();
    run(cli.command).await
}
