//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `ManifestBuilder` - Resolves a finished build into manifest entries and persists them

pub mod builder;

pub use builder::{FilterFn, GenerateFn, ManifestBuilder, ManifestOutcome};
