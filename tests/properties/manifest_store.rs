//! Property tests for persisting and merging manifest documents.

use proptest::prelude::*;
use serde_json::{Map, Value};

use asset_manifest::{JsonManifestRepository, ManifestRepository, MetafileReader};

fn document() -> impl Strategy<Value = Map<String, Value>> {
    let key = proptest::string::string_regex("[a-z]{1,3}\\.(js|css)").unwrap();
    let value = proptest::string::string_regex("[a-zA-Z0-9./-]{0,12}").unwrap();
    proptest::collection::vec((key, value), 0..8).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Appending keeps untouched keys in their order, then lists
    /// the incoming keys with the incoming values.
    #[test]
    fn property_append_merge_round_trip(
        existing in document(),
        incoming in document(),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        let repo = JsonManifestRepository::new();

        repo.update(Value::Object(existing.clone()), &path, false).unwrap();
        repo.update(Value::Object(incoming.clone()), &path, true).unwrap();
        let merged = repo.load(&path).unwrap().unwrap_or_default();

        let mut expected_keys: Vec<&String> =
            existing.keys().filter(|k| !incoming.contains_key(*k)).collect();
        expected_keys.extend(incoming.keys());
        let merged_keys: Vec<&String> = merged.keys().collect();
        prop_assert_eq!(merged_keys, expected_keys);

        for (key, value) in &merged {
            let expected = incoming.get(key).or_else(|| existing.get(key));
            prop_assert_eq!(Some(value), expected);
        }
    }

    /// PROPERTY: Replacing then loading returns the document unchanged.
    #[test]
    fn property_replace_round_trip(document in document()) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/manifest.json");
        let repo = JsonManifestRepository::new();

        repo.update(Value::Object(document.clone()), &path, false).unwrap();
        let loaded = repo.load(&path).unwrap().unwrap_or_default();

        prop_assert_eq!(
            loaded.keys().collect::<Vec<_>>(),
            document.keys().collect::<Vec<_>>()
        );
        prop_assert_eq!(loaded, document);
    }

    /// PROPERTY: Reading an arbitrary metadata document never panics.
    #[test]
    fn property_metafile_parse_never_panics(content in "(?s).{0,256}") {
        let reader = MetafileReader::new(".");
        let template = asset_manifest::NamingTemplate::unhashed();
        let _ = reader.parse(
            &content,
            std::path::Path::new("meta.json"),
            template.clone(),
            template,
        );
    }
}
