//! Scenario: One script entry, no hashing
//!
//! Journey: a project builds `example.js` into `test/output` with hashing
//! disabled and wants a manifest next to it.
//!
//! Success Criteria:
//! - The key, file and source are the output path
//! - etag/integrity are computed over the written bytes
//! - Short names shorten the key and file but not the source

use std::fs;

use asset_manifest::{
    BuildOutput, BuildResult, JsonManifestRepository, ManifestBuilder, NamingPolicy,
    NamingTemplate, Side,
};
use insta::assert_snapshot;

use crate::common::*;

/// SCENARIO: hash disabled, default naming
#[test]
fn scenario_unhashed_entry_maps_to_itself() {
    let builder = ManifestBuilder::new(
        JsonManifestRepository::new(),
        NamingPolicy::new().with_hash(false),
    )
    .unwrap();
    let build = unhashed_build(
        "test/output",
        &[MetaOutput::entry("test/output/example.js", "src/example.js", HELLO)],
    );

    let manifest = builder.resolve(&build).unwrap();

    let entry = manifest.get("test/output/example.js").unwrap();
    assert_eq!(entry.file(), "test/output/example.js");
    assert_eq!(entry.source(), "test/output/example.js");
    assert_eq!(entry.etag(), HELLO_ETAG);
    assert_eq!(entry.integrity(), HELLO_INTEGRITY);
}

/// SCENARIO: the manifest file on disk
#[test]
fn scenario_unhashed_entry_manifest_file() {
    let env = TestEnv::new();
    let build = unhashed_build(
        "test/output",
        &[MetaOutput::entry("test/output/example.js", "src/example.js", HELLO)],
    );
    let builder = ManifestBuilder::new(
        JsonManifestRepository::new(),
        NamingPolicy::new().with_hash(false),
    )
    .unwrap()
    .with_working_dir(env.project_root.path());

    let outcome = builder.run(&build).unwrap();

    assert_eq!(outcome.path, env.project_path("test/output/manifest.json"));
    assert_snapshot!(env.read("test/output/manifest.json"), @r###"
    {
      "test/output/example.js": {
        "file": "test/output/example.js",
        "source": "test/output/example.js",
        "etag": "5d41402abc4b2a76b9719d911017c592",
        "integrity": "sha384-WeF0h3dEjGnea4ANejO7+5/xtGPkQ1TDVTvNucZm+pASWjx5+QOXvfX2oT3oKGhP"
      }
    }
    "###);
}

/// SCENARIO: short names on both sides
#[test]
fn scenario_short_names_shorten_key_and_file() {
    let builder = ManifestBuilder::new(
        JsonManifestRepository::new(),
        NamingPolicy::new()
            .with_hash(false)
            .with_short_names(Side::Both),
    )
    .unwrap();
    let build = unhashed_build(
        "test/output",
        &[MetaOutput::entry("test/output/example.js", "src/example.js", HELLO)],
    );

    let manifest = builder.resolve(&build).unwrap();

    let keys: Vec<&str> = manifest.keys().collect();
    assert_eq!(keys, vec!["example.js"]);
    let entry = manifest.get("example.js").unwrap();
    assert_eq!(entry.file(), "example.js");
    assert_eq!(entry.source(), "test/output/example.js");
}

/// SCENARIO: hashed entry keeps the hashed file under the unhashed key
#[test]
fn scenario_hashed_entry_keyed_by_unhashed_path() {
    let builder = ManifestBuilder::new(JsonManifestRepository::new(), NamingPolicy::new()).unwrap();
    let build = hashed_build(
        "test/output",
        &[MetaOutput::entry("test/output/example-T2DMNXSU.js", "src/example.js", HELLO)],
    );

    let manifest = builder.resolve(&build).unwrap();

    let entry = manifest.get("test/output/example.js").unwrap();
    assert_eq!(entry.file(), "test/output/example-T2DMNXSU.js");
    assert_eq!(entry.source(), "test/output/example.js");
}

/// SCENARIO: relative and extensionless keys for server-side lookups
#[test]
fn scenario_relative_extensionless_keys() {
    let builder = ManifestBuilder::new(
        JsonManifestRepository::new(),
        NamingPolicy::new()
            .with_relative(Side::Both)
            .with_extensionless(Side::Input),
    )
    .unwrap();
    let build = hashed_build(
        "test/output",
        &[
            MetaOutput::entry("test/output/js/example-T2DMNXSU.js", "src/example.js", HELLO),
            MetaOutput::asset("test/output/js/example-T2DMNXSU.js.map", "{}"),
        ],
    );

    let manifest = builder.resolve(&build).unwrap();

    let keys: Vec<&str> = manifest.keys().collect();
    assert_eq!(keys, vec!["/js/example", "/js/example.map"]);
    assert_eq!(
        manifest.get("/js/example").unwrap().file(),
        "/js/example-T2DMNXSU.js"
    );
    assert_eq!(
        manifest.get("/js/example.map").unwrap().file(),
        "/js/example-T2DMNXSU.js.map"
    );
}

/// SCENARIO: outfile builds put the manifest next to the bundle
#[test]
fn scenario_outfile_destination() {
    let env = TestEnv::new();
    let build = outfile_build("dist/bundle.js");
    let builder = ManifestBuilder::new(
        JsonManifestRepository::new(),
        NamingPolicy::new().with_hash(false),
    )
    .unwrap()
    .with_filename("assets.json")
    .with_working_dir(env.project_root.path());

    builder.run(&build).unwrap();

    let written = fs::read_to_string(env.project_path("dist/assets.json")).unwrap();
    assert!(written.contains("\"dist/bundle.js\""));
}

/// SCENARIO: relative keys for a single-outfile build are taken from the
/// outfile's directory
#[test]
fn scenario_outfile_relative_keys() {
    let builder = ManifestBuilder::new(
        JsonManifestRepository::new(),
        NamingPolicy::new()
            .with_hash(false)
            .with_relative(Side::Both),
    )
    .unwrap();

    let manifest = builder.resolve(&outfile_build("dist/app.js")).unwrap();

    assert_eq!(manifest.keys().collect::<Vec<_>>(), vec!["/app.js"]);
    assert_eq!(manifest.get("/app.js").unwrap().file(), "/app.js");
    assert_eq!(manifest.get("/app.js").unwrap().source(), "dist/app.js");
}

fn outfile_build(outfile: &str) -> BuildResult {
    BuildResult::new(
        vec![BuildOutput::new(outfile, HELLO).with_entry_point("src/main.js")],
        NamingTemplate::unhashed(),
        NamingTemplate::unhashed(),
    )
    .with_outfile(outfile)
}
