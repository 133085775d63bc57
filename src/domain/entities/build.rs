//! Build entities - what the bundler hands over once a build finishes
//!
//! These are immutable snapshots. Reading them from a metafile on disk is
//! the job of `infrastructure::metafile`.

use crate::domain::value_objects::NamingTemplate;

/// Normalize a bundler path (forward slashes, no leading `./`).
pub(crate) fn normalize_output_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut trimmed = path.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    trimmed.to_string()
}

/// One file written by the bundler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    output_path: String,
    source_paths: Vec<String>,
    entry_point: Option<String>,
    css_bundle: Option<String>,
    bytes: Vec<u8>,
}

impl BuildOutput {
    pub fn new(output_path: impl AsRef<str>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            output_path: normalize_output_path(output_path.as_ref()),
            source_paths: Vec::new(),
            entry_point: None,
            css_bundle: None,
            bytes: bytes.into(),
        }
    }

    /// Mark this output as the result of a declared entry point
    pub fn with_entry_point(mut self, entry_point: impl AsRef<str>) -> Self {
        self.entry_point = Some(normalize_output_path(entry_point.as_ref()));
        self
    }

    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.source_paths = sources
            .into_iter()
            .map(|s| normalize_output_path(s.as_ref()))
            .collect();
        self
    }

    /// Stylesheet the bundler reports as emitted for this entry
    pub fn with_css_bundle(mut self, css_bundle: impl AsRef<str>) -> Self {
        self.css_bundle = Some(normalize_output_path(css_bundle.as_ref()));
        self
    }

    pub fn output_path(&self) -> &str {
        &self.output_path
    }

    pub fn source_paths(&self) -> &[String] {
        &self.source_paths
    }

    pub fn entry_point(&self) -> Option<&str> {
        self.entry_point.as_deref()
    }

    pub fn css_bundle(&self) -> Option<&str> {
        self.css_bundle.as_deref()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_entry(&self) -> bool {
        self.entry_point.is_some()
    }

    pub fn is_source_map(&self) -> bool {
        self.output_path.ends_with(".map")
    }
}

/// An error (or warning) message reported by the bundler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildMessage {
    text: String,
    location: Option<String>,
}

impl BuildMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

impl std::fmt::Display for BuildMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}: {}", location, self.text),
            None => write!(f, "{}", self.text),
        }
    }
}

/// The finished build: outputs in bundler order plus the naming in effect
#[derive(Debug, Clone)]
pub struct BuildResult {
    outputs: Vec<BuildOutput>,
    errors: Vec<BuildMessage>,
    entry_names: NamingTemplate,
    asset_names: NamingTemplate,
    outdir: Option<String>,
    outfile: Option<String>,
}

impl BuildResult {
    pub fn new(
        outputs: Vec<BuildOutput>,
        entry_names: NamingTemplate,
        asset_names: NamingTemplate,
    ) -> Self {
        Self {
            outputs,
            errors: Vec::new(),
            entry_names,
            asset_names,
            outdir: None,
            outfile: None,
        }
    }

    pub fn with_errors(mut self, errors: Vec<BuildMessage>) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_outdir(mut self, outdir: impl AsRef<str>) -> Self {
        self.outdir = Some(normalize_output_path(outdir.as_ref()));
        self
    }

    pub fn with_outfile(mut self, outfile: impl AsRef<str>) -> Self {
        self.outfile = Some(normalize_output_path(outfile.as_ref()));
        self
    }

    pub fn outputs(&self) -> &[BuildOutput] {
        &self.outputs
    }

    pub fn errors(&self) -> &[BuildMessage] {
        &self.errors
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn entry_names(&self) -> &NamingTemplate {
        &self.entry_names
    }

    pub fn asset_names(&self) -> &NamingTemplate {
        &self.asset_names
    }

    pub fn outdir(&self) -> Option<&str> {
        self.outdir.as_deref()
    }

    pub fn outfile(&self) -> Option<&str> {
        self.outfile.as_deref()
    }

    /// Directory the outputs were written below: the outdir, else the
    /// directory of the single outfile
    pub fn output_dir(&self) -> Option<&str> {
        if let Some(outdir) = self.outdir.as_deref() {
            return Some(outdir);
        }
        let outfile = self.outfile.as_deref()?;
        Some(match outfile.rfind('/') {
            Some(0) => "/",
            Some(slash) => &outfile[..slash],
            None => ".",
        })
    }
}
