//! Property tests for resolving build outputs into manifest keys.

use std::collections::BTreeMap;

use proptest::prelude::*;

use asset_manifest::{
    BuildOutput, BuildResult, JsonManifestRepository, Manifest, ManifestBuilder, ManifestError,
    NamingPolicy, NamingTemplate, Side,
};

fn side() -> impl Strategy<Value = Side> {
    prop_oneof![
        Just(Side::Off),
        Just(Side::Input),
        Just(Side::Output),
        Just(Side::Both),
    ]
}

fn policy() -> impl Strategy<Value = NamingPolicy> {
    (side(), side(), side()).prop_map(|(short_names, extensionless, relative)| {
        NamingPolicy::new()
            .with_short_names(short_names)
            .with_extensionless(extensionless)
            .with_relative(relative)
    })
}

/// Entry outputs with unique output paths; short names may still collide.
fn entry_outputs() -> impl Strategy<Value = Vec<BuildOutput>> {
    let dir = proptest::sample::select(&["", "a/", "b/", "a/b/"][..]);
    let stem = proptest::sample::select(&["index", "app", "main"][..]);
    let ext = proptest::sample::select(&[".js", ".css", ".mjs"][..]);
    let hash = proptest::string::string_regex("[A-Z0-9]{8}").unwrap();

    proptest::collection::vec((dir, stem, ext, hash), 1..6).prop_map(|outputs| {
        let mut seen = BTreeMap::new();
        for (dir, stem, ext, hash) in outputs {
            let unhashed = format!("out/{}{}{}", dir, stem, ext);
            let path = format!("out/{}{}-{}{}", dir, stem, hash, ext);
            let output = BuildOutput::new(&path, hash.as_bytes())
                .with_entry_point(format!("src/{}{}{}", dir, stem, ext));
            seen.entry(unhashed).or_insert(output);
        }
        seen.into_values().collect()
    })
}

fn build(outputs: Vec<BuildOutput>) -> BuildResult {
    let template = NamingTemplate::parse(NamingTemplate::DEFAULT).unwrap();
    BuildResult::new(outputs, template.clone(), template).with_outdir("out")
}

fn resolve(policy: &NamingPolicy, outputs: Vec<BuildOutput>) -> Result<Manifest, ManifestError> {
    ManifestBuilder::new(JsonManifestRepository::new(), *policy)
        .unwrap()
        .resolve(&build(outputs))
}

/// Manifest as a key-sorted map, to compare without insertion order
fn sorted(manifest: &Manifest) -> BTreeMap<String, String> {
    manifest
        .iter()
        .map(|(key, entry)| (key.to_string(), entry.file().to_string()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Whether a key collision happens does not depend on output order,
    /// and a clean resolution yields the same entries in any order.
    #[test]
    fn property_collisions_independent_of_order(
        policy in policy(),
        (outputs, shuffled) in entry_outputs()
            .prop_flat_map(|outputs| (Just(outputs.clone()), Just(outputs).prop_shuffle())),
    ) {
        let forward = resolve(&policy, outputs);
        let permuted = resolve(&policy, shuffled);

        match (forward, permuted) {
            (Ok(a), Ok(b)) => prop_assert_eq!(sorted(&a), sorted(&b)),
            (Err(ManifestError::Conflict { .. }), Err(ManifestError::Conflict { .. })) => {}
            (a, b) => prop_assert!(
                false,
                "diverged: {:?} vs {:?}",
                a.map(|m| m.len()),
                b.map(|m| m.len())
            ),
        }
    }

    /// PROPERTY: Resolving the same build twice yields the same document.
    #[test]
    fn property_resolution_is_idempotent(
        policy in policy(),
        outputs in entry_outputs(),
    ) {
        let first = resolve(&policy, outputs.clone());
        let second = resolve(&policy, outputs);

        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a.to_document(), b.to_document()),
            (Err(a), Err(b)) => prop_assert_eq!(a.to_string(), b.to_string()),
            _ => prop_assert!(false, "one run failed and the other did not"),
        }
    }

    /// PROPERTY: Every recorded entry points at a file the build wrote, and
    /// full-path keys never collide when output paths are unique.
    #[test]
    fn property_full_path_keys_cover_every_entry(outputs in entry_outputs()) {
        let count = outputs.len();
        let manifest = resolve(&NamingPolicy::new(), outputs.clone()).unwrap();

        prop_assert_eq!(manifest.len(), count);
        for (key, entry) in manifest.iter() {
            prop_assert!(outputs.iter().any(|o| o.output_path() == entry.file()));
            prop_assert_eq!(key, entry.source());
        }
    }
}
