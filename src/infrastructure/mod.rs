//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `repositories/` - Manifest store (JSON file, locked, atomic writes)
//! - `metafile` - Reads bundler metadata and output bytes from disk

pub mod metafile;
pub mod repositories;

// Re-export for convenience
pub use metafile::MetafileReader;
pub use repositories::JsonManifestRepository;
