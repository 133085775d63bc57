//! Isolated test environment for asset-manifest.
//!
//! Provides `TestEnv` - a temp project directory with its own config home,
//! helpers to lay out build outputs and a metafile, and a runner for the CLI.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::{Map, Value};
use tempfile::TempDir;

use super::fixtures::MetaOutput;

/// Result of running an asset-manifest CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated project with its own config directory
pub struct TestEnv {
    pub project_root: TempDir,
    pub home_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project_root: tempfile::tempdir().unwrap(),
            home_dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Path relative to the project root
    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.project_path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.project_path(relative)).unwrap()
    }

    pub fn read_json(&self, relative: &str) -> Value {
        serde_json::from_str(&self.read(relative)).unwrap()
    }

    /// Write every output to disk and describe them in `meta.json`
    pub fn write_build(&self, outputs: &[MetaOutput]) -> PathBuf {
        for output in outputs {
            self.write(&output.path, &output.content);
        }
        self.write_metafile("meta.json", outputs)
    }

    pub fn write_metafile(&self, relative: &str, outputs: &[MetaOutput]) -> PathBuf {
        let mut described = Map::new();
        for output in outputs {
            described.insert(output.path.clone(), output.to_metafile_value());
        }
        let mut metafile = Map::new();
        metafile.insert("inputs".to_string(), Value::Object(Map::new()));
        metafile.insert("outputs".to_string(), Value::Object(described));
        self.write(
            relative,
            &serde_json::to_string_pretty(&Value::Object(metafile)).unwrap(),
        )
    }

    /// Run the CLI from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        run_in(self.project_root.path(), self.home_dir.path(), args, env_vars)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

fn run_in(cwd: &Path, home: &Path, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
    let bin = env!("CARGO_BIN_EXE_asset-manifest");
    let mut cmd = Command::new(bin);
    cmd.current_dir(cwd)
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("APPDATA", home)
        .env_remove("RUST_LOG");

    for (key, _) in std::env::vars() {
        if key.starts_with("ASSET_MANIFEST_") {
            cmd.env_remove(key);
        }
    }
    for (key, value) in env_vars {
        cmd.env(key, value);
    }

    let output = cmd.output().unwrap();
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}
