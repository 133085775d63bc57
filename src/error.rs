//! Error types for asset-manifest
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::entities::BuildMessage;
use crate::domain::policies::PolicyError;
use crate::domain::ports::StoreError;
use crate::domain::value_objects::TemplateError;

/// Result type alias for manifest operations
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Main error type for manifest operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Options rejected before any build output was looked at
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A generated filename did not fit its naming template
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Two distinct outputs resolved to the same manifest key
    #[error(
        "there is a conflicting manifest key for '{key}': first conflicting output '{first}', \
         second conflicting output '{second}'"
    )]
    Conflict {
        key: String,
        first: String,
        second: String,
    },

    /// The upstream build reported errors; the manifest was left untouched
    #[error("build failed with {} error(s); manifest not written", errors.len())]
    BuildFailed { errors: Vec<BuildMessage> },

    /// Lock, load or write failure on the manifest file
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Build metadata (metafile) could not be read or parsed
    #[error("invalid build metadata {path}: {message}")]
    Metafile { path: PathBuf, message: String },

    /// An output listed by the build could not be read back from disk
    #[error("failed to read build output {path}: {source}")]
    OutputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration errors, all detected before output processing starts
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(
        "cannot determine where to write the manifest: configure an output directory \
         or a single output file"
    )]
    MissingDestination,

    #[error("invalid {kind} naming template: {source}")]
    Template {
        kind: &'static str,
        #[source]
        source: TemplateError,
    },

    #[error("invalid filter pattern '{pattern}': {message}")]
    InvalidFilter { pattern: String, message: String },

    #[error("invalid manifest filename '{filename}'")]
    InvalidFilename { filename: String },

    #[error("invalid config file {file}: {message}")]
    InvalidFile { file: PathBuf, message: String },
}
