//! Domain Entities
//!
//! - `BuildOutput` / `BuildResult` - what the bundler produced
//! - `Manifest` / `ManifestEntry` - what gets recorded

mod build;
mod manifest;

pub(crate) use build::normalize_output_path;
pub use build::{BuildMessage, BuildOutput, BuildResult};
pub use manifest::{Manifest, ManifestEntry};
