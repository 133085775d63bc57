//! Content Digest Value Object
//!
//! The integrity metadata recorded for every manifest entry: a short MD5
//! `etag` and a SHA-384 subresource-integrity string.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use md5::Md5;
use sha2::{Digest, Sha384};

/// Checksums computed over the exact bytes of one output file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDigest {
    etag: String,
    integrity: String,
}

impl ContentDigest {
    /// Prefix of the SRI string
    pub const INTEGRITY_PREFIX: &'static str = "sha384-";

    /// Compute both checksums for a buffer
    pub fn compute(bytes: &[u8]) -> Self {
        let etag = format!("{:x}", Md5::digest(bytes));
        let integrity = format!(
            "{}{}",
            Self::INTEGRITY_PREFIX,
            STANDARD.encode(Sha384::digest(bytes))
        );
        Self { etag, integrity }
    }

    /// 32-character lowercase hex MD5
    pub fn etag(&self) -> &str {
        &self.etag
    }

    /// `sha384-<base64>`
    pub fn integrity(&self) -> &str {
        &self.integrity
    }
}
