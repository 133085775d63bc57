//! Scenario: The build fails
//!
//! Journey: the bundler reports errors (an unresolved import). The manifest
//! step still runs as part of the build's end hook.
//!
//! Success Criteria:
//! - The run reports the build errors
//! - An existing manifest is left byte-for-byte as it was
//! - No manifest is created where none existed

use asset_manifest::{
    BuildMessage, JsonManifestRepository, ManifestBuilder, ManifestError, NamingPolicy,
};

use crate::common::*;

fn failed_build() -> asset_manifest::BuildResult {
    hashed_build("public", &script_with_stylesheet("public")).with_errors(vec![
        BuildMessage::new("Could not resolve \"./missing\""),
    ])
}

fn builder(env: &TestEnv, append: bool) -> ManifestBuilder<JsonManifestRepository> {
    ManifestBuilder::new(JsonManifestRepository::new(), NamingPolicy::new())
        .unwrap()
        .with_append(append)
        .with_working_dir(env.project_root.path())
}

/// SCENARIO: failed build next to an existing manifest
#[test]
fn scenario_failed_build_keeps_existing_manifest() {
    let env = TestEnv::new();
    let previous = "{\n  \"public/app.js\": {\"file\": \"public/app-OLDHASH1.js\"}\n}\n";
    env.write("public/manifest.json", previous);

    for append in [false, true] {
        let err = builder(&env, append).run(&failed_build()).unwrap_err();

        match err {
            ManifestError::BuildFailed { errors } => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].text().contains("Could not resolve"));
            }
            other => panic!("expected BuildFailed, got {:?}", other),
        }
        assert_eq!(env.read("public/manifest.json"), previous);
    }
}

/// SCENARIO: failed first build
#[test]
fn scenario_failed_build_creates_nothing() {
    let env = TestEnv::new();

    assert!(builder(&env, false).run(&failed_build()).is_err());

    assert!(!env.project_path("public/manifest.json").exists());
    assert!(!env.project_path("public/manifest.json.lock").exists());
}
