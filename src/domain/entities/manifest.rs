//! Manifest entity - maps logical artifact keys to the files actually written
//!
//! A pure, insertion-ordered data structure. Persistence is handled by the
//! `ManifestRepository` port.

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::domain::value_objects::ContentDigest;

/// One manifest record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Path of the written output (after output-side naming transforms)
    file: String,
    /// Output path with the content hash removed
    source: String,
    etag: String,
    integrity: String,
}

impl ManifestEntry {
    pub fn new(
        file: impl Into<String>,
        source: impl Into<String>,
        etag: impl Into<String>,
        integrity: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            source: source.into(),
            etag: etag.into(),
            integrity: integrity.into(),
        }
    }

    pub fn from_digest(
        file: impl Into<String>,
        source: impl Into<String>,
        digest: &ContentDigest,
    ) -> Self {
        Self::new(file, source, digest.etag(), digest.integrity())
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn etag(&self) -> &str {
        &self.etag
    }

    pub fn integrity(&self) -> &str {
        &self.integrity
    }

    /// JSON object form, fields in file/source/etag/integrity order
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("file".to_string(), Value::String(self.file.clone()));
        object.insert("source".to_string(), Value::String(self.source.clone()));
        object.insert("etag".to_string(), Value::String(self.etag.clone()));
        object.insert(
            "integrity".to_string(),
            Value::String(self.integrity.clone()),
        );
        Value::Object(object)
    }
}

/// Ordered key -> entry mapping in write order.
///
/// A key written again moves to the end, the same rule append mode applies
/// when merging into an existing manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    order: Vec<String>,
    entries: HashMap<String, ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ManifestEntry> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace; a replaced key moves to the end
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        entry: ManifestEntry,
    ) -> Option<ManifestEntry> {
        let key = key.into();
        if self.entries.contains_key(&key) {
            self.order.retain(|existing| *existing != key);
        }
        self.order.push(key.clone());
        self.entries.insert(key, entry)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ManifestEntry)> {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(key).map(|entry| (key.as_str(), entry)))
    }

    /// The raw JSON document written when no `generate` hook is installed
    pub fn to_document(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(key, entry)| (key.to_string(), entry.to_value()))
                .collect(),
        )
    }
}

impl Serialize for Manifest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, entry) in self.iter() {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ManifestVisitor;

        impl<'de> Visitor<'de> for ManifestVisitor {
            type Value = Manifest;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of manifest keys to entries")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut manifest = Manifest::new();
                while let Some((key, entry)) = access.next_entry::<String, ManifestEntry>()? {
                    manifest.insert(key, entry);
                }
                Ok(manifest)
            }
        }

        deserializer.deserialize_map(ManifestVisitor)
    }
}
