//! # Package Metadata Document
//!
//! [`MetaDocument`] wraps a package's stored npm metadata (`dist-tags` plus every
//! published version) and merges `npm publish` uploads into it.
//!
//! ## Merge Rules
//!
//! - `dist-tags` is replaced wholesale by the uploaded value (last write wins)
//! - every uploaded version is written verbatim to `versions/{version}`
//! - versions absent from the upload are left untouched
//! - with a path prefix configured, each uploaded tarball URL becomes
//!   `prefix + @scope/package/-/@scope/file`
//!
//! Updates never mutate the document in place: a successful [`MetaDocument::update`]
//! returns a new value and a failed one leaves nothing behind.
//!
//! ## Example
//!
//! ```rust
//! use npm_meta::MetaDocument;
//! use serde_json::json;
//!
//! let meta = MetaDocument::new(
//!     json!({"dist-tags": {}, "versions": {}}),
//!     Some("https://registry.example.com/".to_string()),
//! );
//! let updated = meta.update(&json!({
//!     "dist-tags": {"latest": "1.0.0"},
//!     "versions": {
//!         "1.0.0": {
//!             "dist": {"tarball": "https://origin.example.com/@scope/pkg/-/@scope/pkg-1.0.0.tgz"}
//!         }
//!     }
//! }))?;
//!
//! assert_eq!(
//!     updated.json()["versions"]["1.0.0"]["dist"]["tarball"],
//!     "https://registry.example.com/@scope/pkg/-/@scope/pkg-1.0.0.tgz"
//! );
//! # Ok::<(), npm_meta::MetaError>(())
//! ```

use crate::config::MetaConfig;
use crate::error::{MetaError, MetaResult};
use crate::patch::{Patch, Pointer};
use crate::tarball::non_relative_part;
use bytes::Bytes;
use futures_util::future;
use futures_util::stream::{self, Stream};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// A package's npm metadata document and the tarball path prefix used when
/// merging uploads into it.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaDocument {
    json: Value,
    path_prefix: Option<String>,
}

impl MetaDocument {
    /// Content type of [`MetaDocument::serialize`] output
    pub const CONTENT_TYPE: &'static str = "application/json";

    pub fn new(json: Value, path_prefix: Option<String>) -> Self {
        Self { json, path_prefix }
    }

    pub fn from_config(json: Value, config: &MetaConfig) -> Self {
        Self::new(json, config.path_prefix.clone())
    }

    pub fn json(&self) -> &Value {
        &self.json
    }

    pub fn into_json(self) -> Value {
        self.json
    }

    pub fn path_prefix(&self) -> Option<&str> {
        self.path_prefix.as_deref()
    }

    /// Merges an `npm publish` upload into this document.
    ///
    /// # Errors
    ///
    /// - [`MetaError::MalformedUpload`] if the upload lacks a `versions` or
    ///   `dist-tags` object, a version entry is not an object, or (with a prefix)
    ///   a version has no `dist.tarball` string
    /// - [`MetaError::UnrecognizedTarballPath`] if (with a prefix) a tarball URL
    ///   has no scoped package path
    /// - [`MetaError::PatchApplication`] if this document cannot take the patch,
    ///   e.g. it has no `versions` object
    pub fn update(&self, uploaded: &Value) -> MetaResult<MetaDocument> {
        let patch = self.build_patch(uploaded).inspect_err(|e| {
            warn!(error = %e, "Rejected npm publish upload");
        })?;
        let json = patch.apply(&self.json).inspect_err(|e| {
            warn!(error = %e, "Failed to patch npm metadata");
        })?;

        info!(
            operations = patch.len(),
            rewrite = self.path_prefix.is_some(),
            "Merged npm publish into metadata"
        );
        Ok(MetaDocument::new(json, self.path_prefix.clone()))
    }

    fn build_patch(&self, uploaded: &Value) -> MetaResult<Patch> {
        let versions = required_object(uploaded, "versions")?;
        let dist_tags = required_object(uploaded, "dist-tags")?;

        let mut patch = Patch::new();
        patch.add(Pointer::new(["dist-tags"]), Value::Object(dist_tags.clone()));

        for (version, descriptor) in versions {
            if !descriptor.is_object() {
                return Err(MetaError::malformed(format!(
                    "version '{version}' is not an object"
                )));
            }
            debug!(version = %version, "Adding version to npm metadata");
            patch.add(Pointer::new(["versions", version.as_str()]), descriptor.clone());

            if let Some(prefix) = &self.path_prefix {
                let tarball = tarball_of(version, descriptor)?;
                let rebased = format!("{prefix}{}", non_relative_part(tarball)?);
                debug!(version = %version, from = %tarball, to = %rebased, "Rewriting tarball URL");
                patch.replace(
                    Pointer::new(["versions", version.as_str(), "dist", "tarball"]),
                    Value::String(rebased),
                );
            }
        }

        Ok(patch)
    }

    /// Compact UTF-8 JSON of the current document.
    pub fn to_bytes(&self) -> Bytes {
        Bytes::from(self.json.to_string())
    }

    /// Lazy single-chunk byte stream of the current document, for storage sinks
    /// and response bodies. Serialization happens on first poll.
    pub fn serialize(&self) -> impl Stream<Item = Bytes> + '_ {
        stream::once(future::lazy(move |_| self.to_bytes()))
    }
}

fn required_object<'a>(uploaded: &'a Value, field: &str) -> MetaResult<&'a Map<String, Value>> {
    match uploaded.get(field) {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(MetaError::malformed(format!(
            "'{field}' field is not an object"
        ))),
        None => Err(MetaError::malformed(format!("missing '{field}' field"))),
    }
}

fn tarball_of<'a>(version: &str, descriptor: &'a Value) -> MetaResult<&'a str> {
    descriptor
        .get("dist")
        .filter(|dist| dist.is_object())
        .ok_or_else(|| MetaError::malformed(format!("version '{version}' has no 'dist' object")))?
        .get("tarball")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            MetaError::malformed(format!("version '{version}' has no 'dist.tarball' string"))
        })
}
