//! Manifest merging for append mode
//!
//! Works on JSON objects rather than `Manifest` so that documents reshaped
//! by a `generate` hook merge the same way as raw manifests.

use serde_json::{Map, Value};

/// Merge `incoming` over `existing`.
///
/// Keys untouched by `incoming` keep their values and relative order. Keys
/// present in `incoming` take its values and move to the end in `incoming`'s
/// order, the same rule `Manifest::insert` applies to a replaced key.
pub fn merge_documents(
    existing: Map<String, Value>,
    incoming: Map<String, Value>,
) -> Map<String, Value> {
    let mut merged: Map<String, Value> = existing
        .into_iter()
        .filter(|(key, _)| !incoming.contains_key(key))
        .collect();
    merged.extend(incoming);
    merged
}
