//! Configuration type definitions

use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::policies::NamingPolicy;
use crate::domain::value_objects::{NamingTemplate, Side, DEFAULT_HASH_LENGTH};
use crate::error::{ConfigError, ManifestResult};

use super::loader::{self, ConfigWarning};

/// Options controlling how a build is turned into a manifest.
///
/// Keys accept both snake_case and the camelCase spelling used by bundler
/// plugin configs (`shortNames`, `useEntrypointKeys`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestOptions {
    /// Hashed output names (`false` asks the bundler for `[dir]/[name]`)
    #[serde(default = "default_true")]
    pub hash: bool,

    #[serde(default, alias = "shortNames")]
    pub short_names: Side,

    #[serde(default)]
    pub extensionless: Side,

    #[serde(default)]
    pub relative: Side,

    #[serde(default, alias = "useEntrypointKeys")]
    pub use_entrypoint_keys: bool,

    #[serde(default)]
    pub append: bool,

    /// Manifest file name, placed in the build's output directory
    #[serde(default = "default_filename")]
    pub filename: String,

    /// Only output paths matching this regex are recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    #[serde(default, alias = "entryNames", skip_serializing_if = "Option::is_none")]
    pub entry_names: Option<String>,

    #[serde(default, alias = "assetNames", skip_serializing_if = "Option::is_none")]
    pub asset_names: Option<String>,

    /// Width of the hashes the bundler writes
    #[serde(default = "default_hash_length", alias = "hashLength")]
    pub hash_length: usize,

    #[serde(default = "default_lock_timeout_ms", alias = "lockTimeoutMs")]
    pub lock_timeout_ms: u64,

    /// Bundler output directory, when the build metadata does not say
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outdir: Option<String>,

    /// Bundler single output file, used when there is no outdir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outfile: Option<String>,
}

impl Default for ManifestOptions {
    fn default() -> Self {
        Self {
            hash: true,
            short_names: Side::Off,
            extensionless: Side::Off,
            relative: Side::Off,
            use_entrypoint_keys: false,
            append: false,
            filename: default_filename(),
            filter: None,
            entry_names: None,
            asset_names: None,
            hash_length: default_hash_length(),
            lock_timeout_ms: default_lock_timeout_ms(),
            outdir: None,
            outfile: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_filename() -> String {
    "manifest.json".to_string()
}

fn default_hash_length() -> usize {
    DEFAULT_HASH_LENGTH
}

fn default_lock_timeout_ms() -> u64 {
    10_000
}

impl ManifestOptions {
    /// Load options from a TOML file
    pub fn load(path: &Path) -> ManifestResult<Self> {
        let (options, _warnings) = loader::load_with_warnings(path)?;
        Ok(options)
    }

    /// Load options and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> ManifestResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load from an explicit file, the project file, the user file, or defaults
    pub fn discover(
        explicit: Option<&Path>,
        project_root: &Path,
    ) -> ManifestResult<(Self, Vec<ConfigWarning>, Option<PathBuf>)> {
        loader::discover(explicit, project_root)
    }

    /// Apply environment variable overrides (ASSET_MANIFEST_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_overrides(self, |name| std::env::var(name).ok())
    }

    /// The naming policy these options describe, validated
    pub fn naming_policy(&self) -> Result<NamingPolicy, ConfigError> {
        let policy = NamingPolicy::new()
            .with_hash(self.hash)
            .with_short_names(self.short_names)
            .with_extensionless(self.extensionless)
            .with_relative(self.relative)
            .with_entrypoint_keys(self.use_entrypoint_keys)
            .validate()?;
        Ok(policy)
    }

    /// Template strings the bundler has to be configured with (entry, asset)
    pub fn bundler_templates(&self) -> (String, String) {
        NamingPolicy::new()
            .with_hash(self.hash)
            .bundler_templates(self.entry_names.as_deref(), self.asset_names.as_deref())
    }

    /// Parsed entry and asset templates
    pub fn templates(&self) -> Result<(NamingTemplate, NamingTemplate), ConfigError> {
        let (entry, asset) = self.bundler_templates();
        let parse = |kind: &'static str, raw: &str| {
            NamingTemplate::with_hash_length(raw, self.hash_length)
                .map_err(|source| ConfigError::Template { kind, source })
        };
        Ok((parse("entry", &entry)?, parse("asset", &asset)?))
    }

    pub fn filter_regex(&self) -> Result<Option<Regex>, ConfigError> {
        self.filter
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidFilter {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// Check every option that can be wrong on its own, before any build
    /// output is processed
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.naming_policy()?;
        self.templates()?;
        self.filter_regex()?;
        Ok(())
    }
}
