//! # npm Package Metadata
//!
//! Merge logic for the per-package metadata document of an npm-compatible
//! registry. When a client runs `npm publish`, the registry merges the uploaded
//! versions into the stored document, rebases tarball URLs onto its own path
//! prefix, and writes the result back as JSON bytes.
//!
//! ## Key Modules
//!
//! - [`meta`]: [`MetaDocument`], the update and serialization entry point
//! - [`patch`]: ordered JSON Patch style operations applied to a copy of a document
//! - [`tarball`]: extraction of the scoped `@scope/package/-/@scope/file` path
//! - [`config`]: path prefix configuration
//! - [`error`]: [`MetaError`] and its classification
//!
//! ## Usage
//!
//! ```rust,no_run
//! use npm_meta::{MetaConfig, MetaDocument};
//!
//! # fn example(stored: serde_json::Value, upload: serde_json::Value) -> Result<(), Box<dyn std::error::Error>> {
//! let config = MetaConfig::load_or_default("npm-meta.json")?.with_env_overrides();
//! let meta = MetaDocument::from_config(stored, &config);
//! let updated = meta.update(&upload)?;
//! let bytes = updated.to_bytes();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod meta;
pub mod patch;
pub mod tarball;

pub use config::{ConfigError, MetaConfig, PATH_PREFIX_ENV};
pub use error::{ErrorCode, MetaError, MetaResult};
pub use meta::MetaDocument;
pub use tarball::non_relative_part;
