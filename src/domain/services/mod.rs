//! Domain Services
//!
//! Stateless or per-build logic that resolves build outputs into manifest
//! entries. No I/O happens here.

mod conflict_detector;
mod content_hasher;
pub mod key_resolver;
mod merge;
mod sibling_matcher;

pub use conflict_detector::ConflictDetector;
pub use content_hasher::ContentHasher;
pub use key_resolver::{KeyResolver, ResolvedPaths};
pub use merge::merge_documents;
pub use sibling_matcher::{ClassifiedOutput, OutputRole, SiblingMatcher};
