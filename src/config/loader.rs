//! Configuration loading

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::value_objects::Side;
use crate::error::{ConfigError, ManifestResult};

use super::types::ManifestOptions;

/// Project-level options file, looked up in the working directory
pub const PROJECT_CONFIG: &str = "asset-manifest.toml";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "ASSET_MANIFEST_";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Load options and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> ManifestResult<(ManifestOptions, Vec<ConfigWarning>)> {
    let invalid = |message: String| ConfigError::InvalidFile {
        file: path.to_path_buf(),
        message,
    };
    let content = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let options: ManifestOptions = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| invalid(e.to_string()))?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((options, warnings))
}

/// Load from an explicit file, then `<project_root>/asset-manifest.toml`,
/// then the user config dir, falling back to defaults.
///
/// An explicit file must exist; discovered files only count when present.
/// Environment overrides are applied on top. Returns the file that was used.
pub fn discover(
    explicit: Option<&Path>,
    project_root: &Path,
) -> ManifestResult<(ManifestOptions, Vec<ConfigWarning>, Option<PathBuf>)> {
    let path = match explicit {
        Some(path) => Some(project_root.join(path)),
        None => [Some(project_root.join(PROJECT_CONFIG)), user_config_path()]
            .into_iter()
            .flatten()
            .find(|path| path.is_file()),
    };

    if let Some(path) = path {
        let (options, warnings) = load_with_warnings(&path)?;
        debug!(config = %path.display(), "options loaded");
        for warning in &warnings {
            warn!("{}", warning);
        }
        return Ok((options.with_env_overrides(), warnings, Some(path)));
    }

    Ok((ManifestOptions::default().with_env_overrides(), Vec::new(), None))
}

/// `<config dir>/asset-manifest/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("asset-manifest").join("config.toml"))
}

/// Apply `ASSET_MANIFEST_*` overrides read through `lookup`.
///
/// Unparseable values are ignored with a warning.
pub fn with_overrides<F>(mut options: ManifestOptions, lookup: F) -> ManifestOptions
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

    if let Some(val) = var("HASH") {
        options.hash = parse_flag(&val);
    }
    if let Some(val) = var("APPEND") {
        options.append = parse_flag(&val);
    }
    if let Some(val) = var("USE_ENTRYPOINT_KEYS") {
        options.use_entrypoint_keys = parse_flag(&val);
    }
    if let Some(val) = var("FILENAME") {
        if !val.trim().is_empty() {
            options.filename = val;
        }
    }

    let sides: [(&str, &mut Side); 3] = [
        ("SHORT_NAMES", &mut options.short_names),
        ("EXTENSIONLESS", &mut options.extensionless),
        ("RELATIVE", &mut options.relative),
    ];
    for (name, side) in sides {
        if let Some(val) = var(name) {
            match val.parse::<Side>() {
                Ok(parsed) => *side = parsed,
                Err(e) => warn!("ignoring {}{}: {}", ENV_PREFIX, name, e),
            }
        }
    }

    if let Some(val) = var("LOCK_TIMEOUT_MS") {
        match val.trim().parse::<u64>() {
            Ok(ms) => options.lock_timeout_ms = ms,
            Err(e) => warn!("ignoring {}LOCK_TIMEOUT_MS: {}", ENV_PREFIX, e),
        }
    }

    options
}

fn parse_flag(val: &str) -> bool {
    let val = val.trim().to_lowercase();
    val != "false" && val != "0" && val != "no" && val != "off"
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "hash",
        "short_names",
        "extensionless",
        "relative",
        "use_entrypoint_keys",
        "append",
        "filename",
        "filter",
        "entry_names",
        "asset_names",
        "hash_length",
        "lock_timeout_ms",
        "outdir",
        "outfile",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
