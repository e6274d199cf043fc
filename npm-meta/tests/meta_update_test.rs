//! Integration tests for merging publish uploads into package metadata

mod common;

use common::{origin_tarball, publish_upload, stored_meta, version_descriptor, PREFIX};
use futures_util::StreamExt;
use npm_meta::{MetaDocument, MetaError};
use serde_json::{json, Value};

#[test]
fn test_noop_upload_is_idempotent() {
    let stored = stored_meta();
    let meta = MetaDocument::new(stored.clone(), Some(PREFIX.to_string()));

    let upload = json!({"dist-tags": stored["dist-tags"].clone(), "versions": {}});
    let updated = meta.update(&upload).unwrap();

    assert_eq!(updated.json(), &stored);
    assert_eq!(updated.to_bytes(), meta.to_bytes());
}

#[test]
fn test_existing_versions_are_preserved() {
    let stored = stored_meta();
    let meta = MetaDocument::new(stored.clone(), Some(PREFIX.to_string()));

    let updated = meta.update(&publish_upload(&["1.0.0"])).unwrap();

    let versions = updated.json()["versions"].as_object().unwrap();
    assert_eq!(versions.len(), 3);
    for key in ["0.1.0", "0.2.0"] {
        assert_eq!(versions[key], stored["versions"][key], "version {key} changed");
    }
}

#[test]
fn test_dist_tags_are_replaced_not_merged() {
    let meta = MetaDocument::new(stored_meta(), None);

    let updated = meta.update(&publish_upload(&["1.0.0"])).unwrap();

    assert_eq!(updated.json()["dist-tags"], json!({"latest": "1.0.0"}));
    assert!(updated.json()["dist-tags"].get("legacy").is_none());
}

#[test]
fn test_tarball_rewrite() {
    let meta = MetaDocument::new(json!({"dist-tags": {}, "versions": {}}), Some(PREFIX.to_string()));

    let updated = meta.update(&publish_upload(&["1.0.0"])).unwrap();

    assert_eq!(
        updated.json()["versions"]["1.0.0"]["dist"]["tarball"],
        "https://registry.example.com/@scope/pkg/-/@scope/pkg-1.0.0.tgz"
    );
    assert_eq!(
        updated.json()["versions"]["1.0.0"]["dist"]["integrity"],
        "sha512-deadbeef"
    );
}

#[test]
fn test_no_prefix_passes_tarball_through() {
    let meta = MetaDocument::new(stored_meta(), None);

    let updated = meta.update(&publish_upload(&["1.0.0"])).unwrap();

    assert_eq!(
        updated.json()["versions"]["1.0.0"],
        version_descriptor("1.0.0", &origin_tarball("1.0.0"))
    );
}

#[test]
fn test_unrecognized_tarball_fails_without_effect() {
    let stored = stored_meta();
    let meta = MetaDocument::new(stored.clone(), Some(PREFIX.to_string()));
    let mut upload = publish_upload(&["1.0.0", "1.0.1"]);
    upload["versions"]["1.0.1"]["dist"]["tarball"] = json!("https://host/plain/path/file.tgz");

    let err = meta.update(&upload).unwrap_err();

    assert!(matches!(err, MetaError::UnrecognizedTarballPath { ref tarball } if tarball == "https://host/plain/path/file.tgz"));
    assert_eq!(err.error_code().http_status(), 400);
    assert_eq!(meta.json(), &stored);
}

#[test]
fn test_multiple_versions_each_rewritten() {
    let meta = MetaDocument::new(stored_meta(), Some(PREFIX.to_string()));

    let updated = meta.update(&publish_upload(&["1.0.0", "1.0.1"])).unwrap();

    for v in ["1.0.0", "1.0.1"] {
        assert_eq!(
            updated.json()["versions"][v]["dist"]["tarball"],
            format!("{PREFIX}@scope/pkg/-/@scope/pkg-{v}.tgz")
        );
    }
    assert_eq!(updated.json()["dist-tags"]["latest"], "1.0.1");
}

#[test]
fn test_sequential_publishes_accumulate() {
    let first = MetaDocument::new(json!({"dist-tags": {}, "versions": {}}), Some(PREFIX.to_string()));

    let second = first.update(&publish_upload(&["1.0.0"])).unwrap();
    let third = second.update(&publish_upload(&["1.1.0"])).unwrap();

    let keys: Vec<&String> = third.json()["versions"].as_object().unwrap().keys().collect();
    assert_eq!(keys, ["1.0.0", "1.1.0"]);
    assert_eq!(third.json()["dist-tags"], json!({"latest": "1.1.0"}));
    assert_eq!(second.json()["versions"].as_object().unwrap().len(), 1);
}

#[test]
fn test_stored_document_without_versions() {
    let meta = MetaDocument::new(json!({"name": "@scope/pkg"}), None);

    let err = meta.update(&publish_upload(&["1.0.0"])).unwrap_err();

    assert!(matches!(err, MetaError::PatchApplication { .. }));
    assert_eq!(err.error_code().http_status(), 500);
}

#[tokio::test]
async fn test_serialized_stream_round_trips() {
    let meta = MetaDocument::new(stored_meta(), Some(PREFIX.to_string()));
    let updated = meta.update(&publish_upload(&["1.0.0", "1.0.1"])).unwrap();

    let body: Vec<u8> = updated
        .serialize()
        .fold(Vec::new(), |mut acc, chunk| async move {
            acc.extend_from_slice(&chunk);
            acc
        })
        .await;
    let parsed: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(&parsed, updated.json());
    assert_eq!(MetaDocument::CONTENT_TYPE, "application/json");
}
