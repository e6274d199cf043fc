//! Command execution for the `npm-meta` tool

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use npm_meta::{non_relative_part, MetaConfig, MetaDocument};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::cli::Commands;
use crate::storage;

/// Inputs of the `merge` command
#[derive(Debug, Clone)]
pub struct MergeArgs {
    pub meta: PathBuf,
    pub upload: PathBuf,
    pub prefix: Option<String>,
    pub config: PathBuf,
    pub output: Option<PathBuf>,
}

pub async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Merge {
            meta,
            upload,
            prefix,
            config,
            output,
        } => {
            let args = MergeArgs {
                meta,
                upload,
                prefix,
                config,
                output,
            };
            let merged = merge(&args).await?;
            match &args.output {
                Some(path) => {
                    storage::save_stream(path, merged.serialize()).await?;
                }
                None => {
                    let mut stdout = tokio::io::stdout();
                    storage::write_stream(merged.serialize(), &mut stdout).await?;
                    stdout.write_all(b"\n").await?;
                    stdout.flush().await?;
                }
            }
            Ok(())
        }
        Commands::Extract { tarball } => {
            println!("{}", extract(&tarball)?);
            Ok(())
        }
    }
}

/// Resolve configuration: config file, then environment, then `--prefix`.
pub fn resolve_config(config_path: &Path, prefix: Option<String>) -> Result<MetaConfig> {
    resolve_config_with(config_path, |key| env::var(key).ok(), prefix)
}

/// Same as [`resolve_config`] with an explicit variable lookup in place of the
/// process environment.
pub fn resolve_config_with<F>(
    config_path: &Path,
    lookup: F,
    prefix: Option<String>,
) -> Result<MetaConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config = MetaConfig::load_or_default(config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?
        .with_overrides_from(lookup);
    Ok(match prefix {
        Some(prefix) => config.with_path_prefix(Some(prefix)),
        None => config,
    })
}

/// Merge the upload into the stored metadata and return the new document.
pub async fn merge(args: &MergeArgs) -> Result<MetaDocument> {
    let config = resolve_config(&args.config, args.prefix.clone())?;
    merge_with_config(args, &config).await
}

/// Merge using an already resolved configuration; `args.prefix` and
/// `args.config` are not consulted.
pub async fn merge_with_config(args: &MergeArgs, config: &MetaConfig) -> Result<MetaDocument> {
    let stored = storage::read_meta_or_empty(&args.meta).await?;
    let uploaded = storage::read_json(&args.upload).await?;

    let meta = MetaDocument::from_config(stored, config);
    let merged = meta.update(&uploaded).with_context(|| {
        format!(
            "Cannot merge {} into {}",
            args.upload.display(),
            args.meta.display()
        )
    })?;

    info!(
        meta = %args.meta.display(),
        upload = %args.upload.display(),
        prefix = ?config.path_prefix,
        "Merged npm metadata"
    );
    Ok(merged)
}

pub fn extract(tarball: &str) -> Result<&str> {
    Ok(non_relative_part(tarball)?)
}
