//! File access for the CLI: reading JSON documents and writing byte streams.

use anyhow::{Context, Result};
use bytes::Bytes;
use futures_util::{pin_mut, Stream, StreamExt};
use serde_json::{json, Value};
use std::path::Path;
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

/// Read and parse a JSON document.
pub async fn read_json<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let content = fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_slice(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    debug!(path = %path.display(), size = content.len(), "Loaded JSON document");
    Ok(value)
}

/// Read stored metadata, or an empty document for a package's first publish.
pub async fn read_meta_or_empty<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let exists = fs::try_exists(path)
        .await
        .with_context(|| format!("Failed to check {}", path.display()))?;
    if exists {
        read_json(path).await
    } else {
        info!(path = %path.display(), "No stored metadata, starting from an empty document");
        Ok(json!({"dist-tags": {}, "versions": {}}))
    }
}

/// Drain a byte stream into a writer, returning the number of bytes written.
pub async fn write_stream<S, W>(stream: S, writer: &mut W) -> Result<usize>
where
    S: Stream<Item = Bytes>,
    W: AsyncWrite + Unpin,
{
    pin_mut!(stream);
    let mut written = 0;
    while let Some(chunk) = stream.next().await {
        writer.write_all(&chunk).await?;
        written += chunk.len();
    }
    writer.flush().await?;
    Ok(written)
}

/// Write a byte stream to a file, creating parent directories.
pub async fn save_stream<P, S>(path: P, stream: S) -> Result<usize>
where
    P: AsRef<Path>,
    S: Stream<Item = Bytes>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
        debug!(parent = %parent.display(), "Created parent directory");
    }

    let mut file = fs::File::create(path)
        .await
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let written = write_stream(stream, &mut file).await?;
    info!(path = %path.display(), size = written, "File saved successfully");
    Ok(written)
}
