//! asset-manifest - build manifests for content-hashed bundler outputs
//!
//! Bundlers put content hashes into output filenames, so nothing downstream
//! can predict `app-T2DMNXSU.js` from `app.js`. This crate records, for every
//! output of a finished build, a stable key together with the hashed file,
//! its unhashed source path and integrity metadata, and persists the result
//! as a JSON manifest that concurrent builds can safely share.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{ManifestBuilder, ManifestOutcome};
pub use config::{ConfigWarning, ManifestOptions};
pub use domain::entities::{BuildMessage, BuildOutput, BuildResult, Manifest, ManifestEntry};
pub use domain::policies::{NamingPolicy, PolicyError};
pub use domain::ports::{ManifestRepository, StoreError};
pub use domain::value_objects::{ContentDigest, HashSpan, NamingTemplate, Side, TemplateError};
pub use error::{ConfigError, ManifestError, ManifestResult};
pub use infrastructure::{JsonManifestRepository, MetafileReader};
