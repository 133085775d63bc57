//! Manifest Builder Use Case
//!
//! Runs once per finished build:
//! 1. Refuse failed builds without touching the manifest
//! 2. Resolve the destination path
//! 3. Classify outputs (entries, siblings, sourcemaps)
//! 4. Resolve keys, claim them and hash the recorded outputs
//! 5. Apply the `generate` hook
//! 6. Persist through the repository (locked, optionally merged)
//!
//! All business rules live in the domain services; this is orchestration.

use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, info, trace, warn};

use crate::domain::entities::{BuildOutput, BuildResult, Manifest, ManifestEntry};
use crate::domain::policies::NamingPolicy;
use crate::domain::ports::ManifestRepository;
use crate::domain::services::key_resolver::{extension_of, with_extension};
use crate::domain::services::{
    ClassifiedOutput, ConflictDetector, ContentHasher, KeyResolver, OutputRole, SiblingMatcher,
};
use crate::domain::value_objects::NamingTemplate;
use crate::error::{ConfigError, ManifestError, ManifestResult};

/// Decides whether an output path is recorded at all
pub type FilterFn = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Turns the assembled manifest into the document that gets written
pub type GenerateFn = Box<dyn Fn(&Manifest) -> Value + Send + Sync>;

/// What a successful run wrote
#[derive(Debug, Clone)]
pub struct ManifestOutcome {
    /// Manifest file that was written
    pub path: PathBuf,
    /// Entries resolved from this build
    pub manifest: Manifest,
    /// Document on disk after the write (merged when appending)
    pub document: Value,
}

/// Manifest builder use case, parameterized by its store
pub struct ManifestBuilder<R>
where
    R: ManifestRepository,
{
    repo: R,
    policy: NamingPolicy,
    filename: String,
    append: bool,
    working_dir: Option<PathBuf>,
    filter: Option<FilterFn>,
    generate: Option<GenerateFn>,
}

impl<R> ManifestBuilder<R>
where
    R: ManifestRepository,
{
    pub const DEFAULT_FILENAME: &'static str = "manifest.json";

    /// Create a builder; incompatible policies are rejected here, before any
    /// build output is looked at.
    pub fn new(repo: R, policy: NamingPolicy) -> Result<Self, ConfigError> {
        Ok(Self {
            repo,
            policy: policy.validate()?,
            filename: Self::DEFAULT_FILENAME.to_string(),
            append: false,
            working_dir: None,
            filter: None,
            generate: None,
        })
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    /// Directory the build's outdir/outfile are relative to
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn with_generate<G>(mut self, generate: G) -> Self
    where
        G: Fn(&Manifest) -> Value + Send + Sync + 'static,
    {
        self.generate = Some(Box::new(generate));
        self
    }

    pub fn policy(&self) -> &NamingPolicy {
        &self.policy
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn append(&self) -> bool {
        self.append
    }

    /// Where the manifest goes: the build's outdir, else the directory of
    /// its single outfile.
    pub fn destination(&self, build: &BuildResult) -> Result<PathBuf, ConfigError> {
        let filename = self.filename.trim();
        if filename.is_empty() || filename.ends_with('/') || filename == "." || filename == ".."
        {
            return Err(ConfigError::InvalidFilename {
                filename: self.filename.clone(),
            });
        }

        let dir = build
            .output_dir()
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingDestination)?;

        let dir = match &self.working_dir {
            Some(root) => root.join(dir),
            None => dir,
        };
        Ok(dir.join(filename))
    }

    /// Resolve every recorded output into a manifest entry, without writing.
    ///
    /// Fails on the first key claimed by two distinct outputs.
    pub fn resolve(&self, build: &BuildResult) -> ManifestResult<Manifest> {
        if !build.is_success() {
            return Err(ManifestError::BuildFailed {
                errors: build.errors().to_vec(),
            });
        }

        // Unhashed bundler naming leaves nothing to strip.
        let unhashed = NamingTemplate::unhashed();
        let (entry_names, asset_names) = if self.policy.hash() {
            (build.entry_names(), build.asset_names())
        } else {
            (&unhashed, &unhashed)
        };

        let outputs = build.outputs();
        let classified = SiblingMatcher::new(entry_names, asset_names).classify(outputs)?;
        let resolver = KeyResolver::new(&self.policy, build.output_dir());
        let mut detector = ConflictDetector::new();
        let mut hasher = ContentHasher::new();
        let mut manifest = Manifest::new();

        for (i, (output, class)) in outputs.iter().zip(&classified).enumerate() {
            let path = output.output_path();
            if !class.role.is_recorded() {
                trace!(output = path, "not linked to an entry; skipped");
                continue;
            }
            if let Some(filter) = &self.filter {
                if !filter(path) {
                    trace!(output = path, "excluded by filter");
                    continue;
                }
            }

            let basis = self.key_basis(outputs, &classified, i);
            let resolved = resolver.resolve(path, &class.unhashed, &basis);
            detector.claim(&resolved.key, path)?;

            let digest = hasher.digest(output);
            debug!(key = %resolved.key, file = %resolved.file, role = ?class.role, "resolved");
            manifest.insert(
                resolved.key,
                ManifestEntry::from_digest(resolved.file, resolved.source, digest),
            );
        }

        debug!(
            entries = manifest.len(),
            hashed = hasher.computed(),
            "manifest resolved"
        );
        Ok(manifest)
    }

    /// Resolve, shape and persist the manifest for a finished build
    pub fn run(&self, build: &BuildResult) -> ManifestResult<ManifestOutcome> {
        if !build.is_success() {
            warn!(
                errors = build.errors().len(),
                "build failed; leaving the manifest untouched"
            );
            return Err(ManifestError::BuildFailed {
                errors: build.errors().to_vec(),
            });
        }

        let path = self.destination(build)?;
        let manifest = self.resolve(build)?;
        let document = match &self.generate {
            Some(generate) => generate(&manifest),
            None => manifest.to_document(),
        };

        let document = self.repo.update(document, &path, self.append)?;
        info!(
            path = %path.display(),
            entries = manifest.len(),
            append = self.append,
            "manifest written"
        );

        Ok(ManifestOutcome {
            path,
            manifest,
            document,
        })
    }

    /// Untransformed key of output `index`
    fn key_basis(
        &self,
        outputs: &[BuildOutput],
        classified: &[ClassifiedOutput],
        index: usize,
    ) -> String {
        let class = &classified[index];
        if !self.policy.use_entrypoint_keys() {
            return class.unhashed.clone();
        }

        match class.role {
            OutputRole::Entry => outputs[index]
                .entry_point()
                .map_or_else(|| class.unhashed.clone(), str::to_string),
            OutputRole::Sibling { entry } => match outputs[entry].entry_point() {
                Some(entry_point) => with_extension(entry_point, extension_of(&class.unhashed)),
                None => class.unhashed.clone(),
            },
            OutputRole::SourceMap { partner } => {
                format!("{}.map", self.key_basis(outputs, classified, partner))
            }
            OutputRole::Unlinked => class.unhashed.clone(),
        }
    }
}
