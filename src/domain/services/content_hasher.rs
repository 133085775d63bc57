//! Content Hasher
//!
//! Computes `etag`/`integrity` for output bytes, memoized per output path.
//! One hasher lives for exactly one build; nothing is shared across builds.

use std::collections::HashMap;

use crate::domain::entities::BuildOutput;
use crate::domain::value_objects::ContentDigest;

/// Per-build digest cache keyed by output path
#[derive(Debug, Default)]
pub struct ContentHasher {
    cache: HashMap<String, ContentDigest>,
    computed: usize,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Digest for an output, computed on first request
    pub fn digest(&mut self, output: &BuildOutput) -> &ContentDigest {
        self.digest_bytes(output.output_path(), output.bytes())
    }

    pub fn digest_bytes(&mut self, output_path: &str, bytes: &[u8]) -> &ContentDigest {
        if !self.cache.contains_key(output_path) {
            self.computed += 1;
            self.cache
                .insert(output_path.to_string(), ContentDigest::compute(bytes));
        }
        &self.cache[output_path]
    }

    /// How many digests were actually computed (cache misses)
    pub fn computed(&self) -> usize {
        self.computed
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
