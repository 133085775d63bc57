//! Conflict Detector
//!
//! Tracks which output claimed each manifest key during one build.

use std::collections::HashMap;

use crate::error::{ManifestError, ManifestResult};

#[derive(Debug, Default)]
pub struct ConflictDetector {
    claimed: HashMap<String, String>,
}

impl ConflictDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key` for `output_path`.
    ///
    /// Re-claiming a key for the same output is a no-op; a different output
    /// is a conflict.
    pub fn claim(&mut self, key: &str, output_path: &str) -> ManifestResult<()> {
        match self.claimed.get(key) {
            Some(first) if first != output_path => Err(ManifestError::Conflict {
                key: key.to_string(),
                first: first.clone(),
                second: output_path.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.claimed
                    .insert(key.to_string(), output_path.to_string());
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
