//! Metafile Reader
//!
//! Loads what the bundler reports about a finished build. Two shapes are
//! accepted:
//!
//! - a bare metafile: `{"outputs": {"<path>": {"entryPoint"?, "inputs", "cssBundle"?}}}`
//! - a build result: `{"errors": [...], "metafile": {...}}`
//!
//! Output order is the order of the `outputs` object. Output bytes are read
//! from disk relative to the working directory, except for failed builds,
//! which are never looked at beyond their error list.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::entities::{BuildMessage, BuildOutput, BuildResult};
use crate::domain::value_objects::NamingTemplate;
use crate::error::{ManifestError, ManifestResult};

#[derive(Debug, Default, Deserialize)]
struct MetafileDe {
    #[serde(default)]
    outputs: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OutputMetaDe {
    #[serde(default)]
    entry_point: Option<String>,
    #[serde(default)]
    inputs: Map<String, Value>,
    #[serde(default)]
    css_bundle: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BuildResultDe {
    #[serde(default)]
    errors: Vec<MessageDe>,
    #[serde(default)]
    metafile: Option<MetafileDe>,
}

#[derive(Debug, Deserialize)]
struct MessageDe {
    text: String,
    #[serde(default)]
    location: Option<LocationDe>,
}

#[derive(Debug, Deserialize)]
struct LocationDe {
    file: String,
    #[serde(default)]
    line: Option<u64>,
    #[serde(default)]
    column: Option<u64>,
}

impl From<MessageDe> for BuildMessage {
    fn from(de: MessageDe) -> Self {
        let message = BuildMessage::new(de.text);
        match de.location {
            Some(LocationDe {
                file,
                line: Some(line),
                column: Some(column),
            }) => message.with_location(format!("{}:{}:{}", file, line, column)),
            Some(LocationDe {
                file,
                line: Some(line),
                column: None,
            }) => message.with_location(format!("{}:{}", file, line)),
            Some(LocationDe { file, .. }) => message.with_location(file),
            None => message,
        }
    }
}

/// Reads bundler metadata into a `BuildResult`
#[derive(Debug, Clone)]
pub struct MetafileReader {
    working_dir: PathBuf,
}

impl MetafileReader {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Load the metadata file at `path` (relative paths are taken from the
    /// working directory)
    pub fn load(
        &self,
        path: &Path,
        entry_names: NamingTemplate,
        asset_names: NamingTemplate,
    ) -> ManifestResult<BuildResult> {
        let path = self.working_dir.join(path);
        let content = fs::read_to_string(&path).map_err(|e| ManifestError::Metafile {
            path: path.clone(),
            message: e.to_string(),
        })?;
        self.parse(&content, &path, entry_names, asset_names)
    }

    /// Parse metadata already in memory; `origin` only labels errors
    pub fn parse(
        &self,
        content: &str,
        origin: &Path,
        entry_names: NamingTemplate,
        asset_names: NamingTemplate,
    ) -> ManifestResult<BuildResult> {
        let invalid = |message: String| ManifestError::Metafile {
            path: origin.to_path_buf(),
            message,
        };

        let value: Value = serde_json::from_str(content).map_err(|e| invalid(e.to_string()))?;
        let Value::Object(object) = &value else {
            return Err(invalid("expected a JSON object".to_string()));
        };
        let is_metafile = object.contains_key("outputs");
        let is_result = object.contains_key("metafile") || object.contains_key("errors");

        let (metafile, errors) = if is_metafile {
            let metafile: MetafileDe =
                serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;
            (metafile, Vec::new())
        } else if is_result {
            let result: BuildResultDe =
                serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;
            let errors: Vec<BuildMessage> = result.errors.into_iter().map(Into::into).collect();
            match result.metafile {
                Some(metafile) => (metafile, errors),
                None if !errors.is_empty() => (MetafileDe::default(), errors),
                None => return Err(invalid("build result carries no metafile".to_string())),
            }
        } else {
            return Err(invalid(
                "expected an `outputs` object or a build result with a `metafile`".to_string(),
            ));
        };

        let failed = !errors.is_empty();
        let mut outputs = Vec::with_capacity(metafile.outputs.len());
        for (output_path, meta) in metafile.outputs {
            let meta: OutputMetaDe = serde_json::from_value(meta)
                .map_err(|e| invalid(format!("output '{}': {}", output_path, e)))?;

            // Failed builds are reported, never read.
            let bytes = if failed {
                Vec::new()
            } else {
                self.read_output(&output_path)?
            };

            let mut output = BuildOutput::new(&output_path, bytes)
                .with_sources(meta.inputs.keys());
            if let Some(entry_point) = &meta.entry_point {
                output = output.with_entry_point(entry_point);
            }
            if let Some(css_bundle) = &meta.css_bundle {
                output = output.with_css_bundle(css_bundle);
            }
            outputs.push(output);
        }

        debug!(
            metafile = %origin.display(),
            outputs = outputs.len(),
            errors = errors.len(),
            "build metadata loaded"
        );
        Ok(BuildResult::new(outputs, entry_names, asset_names).with_errors(errors))
    }

    fn read_output(&self, output_path: &str) -> ManifestResult<Vec<u8>> {
        let path = self.working_dir.join(output_path);
        fs::read(&path).map_err(|source| ManifestError::OutputRead { path, source })
    }
}
