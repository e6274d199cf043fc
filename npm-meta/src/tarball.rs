//! # Tarball URL Rebasing
//!
//! Extracts the host-independent part of a scoped npm tarball URL so that it can
//! be re-rooted under the registry's own path prefix.

use crate::error::{MetaError, MetaResult};
use once_cell::sync::Lazy;
use regex::Regex;

/// Regex for the `@scope/package/-/@scope/file` tarball path segment
static NON_RELATIVE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@[A-Za-z0-9_-]+/[A-Za-z0-9_-]+/-/@[A-Za-z0-9_-]+/[A-Za-z0-9_.-]+")
        .expect("Tarball path regex should compile - this is a static pattern")
});

/// Returns the first `@scope/package/-/@scope/file` segment of a tarball URL.
///
/// Only scoped packages are recognized. An unscoped URL such as
/// `https://host/pkg/-/pkg-1.0.0.tgz` fails rather than being returned unchanged,
/// since rebasing it would produce a broken download link.
///
/// # Examples
///
/// ```rust
/// use npm_meta::non_relative_part;
///
/// let part = non_relative_part("https://origin.example.com/@scope/pkg/-/@scope/pkg-1.0.0.tgz").unwrap();
/// assert_eq!(part, "@scope/pkg/-/@scope/pkg-1.0.0.tgz");
/// assert!(non_relative_part("https://host/plain/path/file.tgz").is_err());
/// ```
pub fn non_relative_part(tarball: &str) -> MetaResult<&str> {
    NON_RELATIVE_REGEX
        .find(tarball)
        .map(|m| m.as_str())
        .ok_or_else(|| MetaError::UnrecognizedTarballPath {
            tarball: tarball.to_string(),
        })
}
