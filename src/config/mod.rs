//! Configuration module for asset-manifest
//!
//! Options are resolved in this order:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (ASSET_MANIFEST_*)
//! 3. Explicit `--config` file, else project config (./asset-manifest.toml)
//! 4. User config (~/.config/asset-manifest/config.toml)
//! 5. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{user_config_path, with_overrides, ConfigWarning, ENV_PREFIX, PROJECT_CONFIG};
pub use types::ManifestOptions;
