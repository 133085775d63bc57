//! JSON Manifest Repository
//!
//! Stores the manifest as pretty-printed JSON. Each read-merge-write cycle
//! holds an exclusive `fs2` lock on `<manifest>.lock`, so parallel builds
//! targeting the same file serialize instead of interleaving. The file is
//! replaced through a temp file in the same directory plus a rename.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::domain::ports::{ManifestRepository, StoreError, StoreResult};
use crate::domain::services::merge_documents;

/// JSON file manifest store with cross-process locking
#[derive(Debug, Clone)]
pub struct JsonManifestRepository {
    lock_timeout: Duration,
    poll_interval: Duration,
}

impl JsonManifestRepository {
    pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new() -> Self {
        Self::with_lock_timeout(Self::DEFAULT_LOCK_TIMEOUT)
    }

    /// Give up on the lock after `timeout` instead of blocking forever
    pub fn with_lock_timeout(timeout: Duration) -> Self {
        Self {
            lock_timeout: timeout,
            poll_interval: Duration::from_millis(10),
        }
    }

    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    /// `<dir>/manifest.json` -> `<dir>/manifest.json.lock`
    pub fn lock_path(path: &Path) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        path.with_file_name(name)
    }

    fn write_atomic(&self, path: &Path, content: &str) -> StoreResult<()> {
        let write_err = |e: std::io::Error| StoreError::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(write_err)?;

        let mut temp = NamedTempFile::new_in(parent).map_err(write_err)?;
        temp.write_all(content.as_bytes()).map_err(write_err)?;
        temp.as_file().sync_all().map_err(write_err)?;

        // Temp files are created 0600; keep the manifest readable like any other output.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(path)
                .map(|m| m.permissions().mode())
                .unwrap_or(0o644);
            temp.as_file()
                .set_permissions(fs::Permissions::from_mode(mode))
                .map_err(write_err)?;
        }

        temp.persist(path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

impl Default for JsonManifestRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestRepository for JsonManifestRepository {
    fn load(&self, path: &Path) -> StoreResult<Option<Map<String, Value>>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|e| StoreError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if content.trim().is_empty() {
            debug!(path = %path.display(), "existing manifest is empty");
            return Ok(None);
        }

        let value: Value = serde_json::from_str(&content).map_err(|e| StoreError::Corrupted {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        match value {
            Value::Object(map) => Ok(Some(map)),
            _ => Err(StoreError::NotAnObject {
                path: path.to_path_buf(),
                what: "the existing manifest",
            }),
        }
    }

    fn save(&self, document: &Value, path: &Path) -> StoreResult<()> {
        let content =
            serde_json::to_string_pretty(document).map_err(|e| StoreError::Serialization {
                message: e.to_string(),
            })?;
        self.write_atomic(path, &content)
    }

    fn update(&self, document: Value, path: &Path, append: bool) -> StoreResult<Value> {
        let _lock = ManifestLock::acquire(
            Self::lock_path(path),
            self.lock_timeout,
            self.poll_interval,
        )?;

        let document = if append {
            let Value::Object(incoming) = document else {
                return Err(StoreError::NotAnObject {
                    path: path.to_path_buf(),
                    what: "the generated manifest",
                });
            };
            match self.load(path)? {
                Some(existing) => {
                    debug!(
                        path = %path.display(),
                        existing = existing.len(),
                        incoming = incoming.len(),
                        "merging into existing manifest"
                    );
                    Value::Object(merge_documents(existing, incoming))
                }
                None => Value::Object(incoming),
            }
        } else {
            document
        };

        self.save(&document, path)?;
        Ok(document)
    }
}

/// Exclusive lock held for one read-merge-write cycle; released on drop
struct ManifestLock {
    file: fs::File,
    path: PathBuf,
}

impl ManifestLock {
    fn acquire(path: PathBuf, timeout: Duration, poll_interval: Duration) -> StoreResult<Self> {
        let lock_err = |path: &Path, e: std::io::Error| StoreError::Lock {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| lock_err(&path, e))?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| lock_err(&path, e))?;

        let started = Instant::now();
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    trace!(lock = %path.display(), "manifest lock acquired");
                    return Ok(Self { file, path });
                }
                Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                    let waited = started.elapsed();
                    if waited >= timeout {
                        return Err(StoreError::LockTimeout {
                            path,
                            waited_ms: waited.as_millis(),
                        });
                    }
                    thread::sleep(poll_interval);
                }
                Err(e) => return Err(lock_err(&path, e)),
            }
        }
    }
}

impl Drop for ManifestLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        trace!(lock = %self.path.display(), "manifest lock released");
    }
}
