//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod manifest_repository;

pub use manifest_repository::{ManifestRepository, StoreError, StoreResult};
