//! Key Resolver
//!
//! Turns one output into its manifest key and recorded paths.
//!
//! - key: derived from a basis (the unhashed output path, or the declared
//!   entry point when entry-point keys are on) with input-side transforms
//! - `file`: the written output path with output-side transforms
//! - `source`: the unhashed output path, untransformed
//!
//! Transforms always run in the order relative -> short names -> extensionless.

use crate::domain::policies::NamingPolicy;
use crate::domain::value_objects::Side;

/// Key plus the two paths recorded under it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub key: String,
    pub source: String,
    pub file: String,
}

/// Applies a `NamingPolicy` to output paths
#[derive(Debug, Clone, Copy)]
pub struct KeyResolver<'a> {
    policy: &'a NamingPolicy,
    outdir: Option<&'a str>,
}

impl<'a> KeyResolver<'a> {
    pub fn new(policy: &'a NamingPolicy, outdir: Option<&'a str>) -> Self {
        Self { policy, outdir }
    }

    /// Resolve one output.
    ///
    /// `basis` is the untransformed key; `unhashed` is `output_path` with its
    /// hash removed (identical to it when hashing is off).
    pub fn resolve(&self, output_path: &str, unhashed: &str, basis: &str) -> ResolvedPaths {
        ResolvedPaths {
            key: self.transform(basis, Side::covers_input),
            source: unhashed.to_string(),
            file: self.transform(output_path, Side::covers_output),
        }
    }

    fn transform(&self, path: &str, covers: fn(Side) -> bool) -> String {
        let mut path = path.to_string();
        if covers(self.policy.relative()) {
            path = strip_outdir(&path, self.outdir);
        }
        if covers(self.policy.short_names()) {
            path = short_name(&path).to_string();
        }
        if covers(self.policy.extensionless()) {
            path = strip_extension(&path);
        }
        path
    }
}

/// Remove the outdir prefix, keeping the leading separator
/// (`out/js/app.js` with outdir `out` -> `/js/app.js`).
///
/// Paths outside the outdir are returned unchanged.
pub fn strip_outdir(path: &str, outdir: Option<&str>) -> String {
    let Some(outdir) = outdir else {
        return path.to_string();
    };
    let outdir = outdir.trim_end_matches('/');
    if outdir.is_empty() || outdir == "." {
        return if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
    }
    match path.strip_prefix(outdir) {
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => path.to_string(),
    }
}

/// Last path segment
pub fn short_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Drop the final extension; a trailing `.map` is kept and the extension
/// before it dropped instead (`app.js.map` -> `app.map`).
pub fn strip_extension(path: &str) -> String {
    match path.strip_suffix(".map") {
        Some(base) if !base.is_empty() && !base.ends_with('/') => {
            format!("{}.map", drop_extension(base))
        }
        _ => drop_extension(path).to_string(),
    }
}

/// Final extension including the dot, or `""`
pub fn extension_of(path: &str) -> &str {
    let name = short_name(path);
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[dot..],
        _ => "",
    }
}

/// Replace the final extension (`src/app.ts` + `.css` -> `src/app.css`)
pub fn with_extension(path: &str, extension: &str) -> String {
    format!("{}{}", drop_extension(path), extension)
}

fn drop_extension(path: &str) -> &str {
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..name_start + dot],
        _ => path,
    }
}
