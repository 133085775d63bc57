//! Scenario: Several builds share one manifest
//!
//! Journey: a project runs two bundler configurations (say, a client and a
//! server bundle) that both append to `public/manifest.json`.
//!
//! Success Criteria:
//! - Keys written by an earlier build survive a later one
//! - A key rebuilt with new content takes the new values
//! - Concurrent appenders never lose each other's entries

use std::thread;

use asset_manifest::{JsonManifestRepository, ManifestBuilder, NamingPolicy};
use serde_json::json;

use crate::common::*;

fn appender(env: &TestEnv) -> ManifestBuilder<JsonManifestRepository> {
    ManifestBuilder::new(
        JsonManifestRepository::new(),
        NamingPolicy::new().with_hash(false),
    )
    .unwrap()
    .with_append(true)
    .with_working_dir(env.project_root.path())
}

/// SCENARIO: a second build touches one key and keeps the other
#[test]
fn scenario_append_updates_touched_keys_only() {
    let env = TestEnv::new();
    let builder = appender(&env);

    builder
        .run(&unhashed_build(
            "public",
            &[
                MetaOutput::entry("public/a.js", "src/a.js", HELLO),
                MetaOutput::entry("public/b.js", "src/b.js", HELLO),
            ],
        ))
        .unwrap();
    builder
        .run(&unhashed_build(
            "public",
            &[MetaOutput::entry("public/a.js", "src/a.js", HELLO_V2)],
        ))
        .unwrap();

    let manifest = env.read_json("public/manifest.json");
    let keys: Vec<&String> = manifest.as_object().unwrap().keys().collect();
    // Rewritten keys follow the untouched ones.
    assert_eq!(keys, vec!["public/b.js", "public/a.js"]);
    assert_eq!(manifest["public/a.js"]["etag"], json!(HELLO_V2_ETAG));
    assert_eq!(manifest["public/b.js"]["etag"], json!(HELLO_ETAG));
}

/// SCENARIO: new keys land after the existing ones
#[test]
fn scenario_append_adds_new_keys_at_the_end() {
    let env = TestEnv::new();
    env.write(
        "public/manifest.json",
        "{\n  \"legacy.js\": \"kept verbatim\"\n}",
    );

    let outcome = appender(&env)
        .run(&unhashed_build(
            "public",
            &[MetaOutput::entry("public/app.js", "src/app.js", HELLO)],
        ))
        .unwrap();

    let keys: Vec<&String> = outcome.document.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["legacy.js", "public/app.js"]);
    assert_eq!(outcome.document["legacy.js"], json!("kept verbatim"));
    assert_eq!(env.read_json("public/manifest.json"), outcome.document);
}

/// SCENARIO: without append the file is replaced
#[test]
fn scenario_replace_drops_previous_keys() {
    let env = TestEnv::new();
    env.write("public/manifest.json", "{\"legacy.js\": \"gone\"}");

    appender(&env)
        .with_append(false)
        .run(&unhashed_build(
            "public",
            &[MetaOutput::entry("public/app.js", "src/app.js", HELLO)],
        ))
        .unwrap();

    let manifest = env.read_json("public/manifest.json");
    assert!(manifest.get("legacy.js").is_none());
    assert!(manifest.get("public/app.js").is_some());
}

/// SCENARIO: parallel builds appending at the same time
#[test]
fn scenario_concurrent_appenders_keep_every_key() {
    let env = TestEnv::new();
    let names: Vec<String> = (0..6).map(|i| format!("bundle{}", i)).collect();

    thread::scope(|scope| {
        for name in &names {
            let env = &env;
            scope.spawn(move || {
                let output = format!("public/{}.js", name);
                let entry = format!("src/{}.js", name);
                appender(env)
                    .run(&unhashed_build(
                        "public",
                        &[MetaOutput::entry(&output, &entry, HELLO)],
                    ))
                    .unwrap();
            });
        }
    });

    let manifest = env.read_json("public/manifest.json");
    let object = manifest.as_object().unwrap();
    assert_eq!(object.len(), names.len());
    for name in &names {
        assert!(
            object.contains_key(&format!("public/{}.js", name)),
            "missing {}",
            name
        );
    }
}
