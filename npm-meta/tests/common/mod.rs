//! Shared fixtures for metadata integration tests

#![allow(dead_code)]

use serde_json::{json, Value};

pub const PREFIX: &str = "https://registry.example.com/";

/// A version descriptor as `npm publish` uploads it
pub fn version_descriptor(version: &str, tarball: &str) -> Value {
    json!({
        "name": "@scope/pkg",
        "version": version,
        "description": "fixture package",
        "dependencies": {"left-pad": "^1.3.0"},
        "dist": {
            "integrity": "sha512-deadbeef",
            "shasum": "0123456789abcdef",
            "tarball": tarball
        }
    })
}

pub fn origin_tarball(version: &str) -> String {
    format!("https://origin.example.com/@scope/pkg/-/@scope/pkg-{version}.tgz")
}

/// Stored metadata with two published versions
pub fn stored_meta() -> Value {
    json!({
        "_id": "@scope/pkg",
        "name": "@scope/pkg",
        "dist-tags": {"latest": "0.2.0", "legacy": "0.1.0"},
        "versions": {
            "0.1.0": version_descriptor("0.1.0", &format!("{PREFIX}@scope/pkg/-/@scope/pkg-0.1.0.tgz")),
            "0.2.0": version_descriptor("0.2.0", &format!("{PREFIX}@scope/pkg/-/@scope/pkg-0.2.0.tgz"))
        }
    })
}

/// A publish payload for the given versions, tagged `latest` at the last one
pub fn publish_upload(versions: &[&str]) -> Value {
    let mut entries = serde_json::Map::new();
    for v in versions {
        entries.insert(v.to_string(), version_descriptor(v, &origin_tarball(v)));
    }
    let latest = versions.last().copied().unwrap_or("0.2.0");
    json!({
        "_id": "@scope/pkg",
        "name": "@scope/pkg",
        "dist-tags": {"latest": latest},
        "versions": entries,
        "_attachments": {}
    })
}
