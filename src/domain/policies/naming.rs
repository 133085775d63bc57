//! Naming Policy
//!
//! Decides how manifest keys and recorded paths are derived from output
//! paths. Built once per build from user options and validated as a whole
//! before any output is looked at.

use thiserror::Error;

use crate::domain::value_objects::{NamingTemplate, Side};

/// Option combinations that can never produce unambiguous keys
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error(
        "extensionless = {extensionless} cannot be combined with useEntrypointKeys: entry points \
         differing only by extension (e.g. 'index.js' and 'index.ts') would collapse onto one \
         conflicting manifest key; use extensionless = \"output\" instead"
    )]
    ExtensionlessEntrypointKeys { extensionless: Side },
}

/// Naming rules in effect for one build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamingPolicy {
    hash: bool,
    short_names: Side,
    extensionless: Side,
    relative: Side,
    use_entrypoint_keys: bool,
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self {
            hash: true,
            short_names: Side::Off,
            extensionless: Side::Off,
            relative: Side::Off,
            use_entrypoint_keys: false,
        }
    }
}

impl NamingPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hash(mut self, hash: bool) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_short_names(mut self, side: Side) -> Self {
        self.short_names = side;
        self
    }

    pub fn with_extensionless(mut self, side: Side) -> Self {
        self.extensionless = side;
        self
    }

    pub fn with_relative(mut self, side: Side) -> Self {
        self.relative = side;
        self
    }

    pub fn with_entrypoint_keys(mut self, enabled: bool) -> Self {
        self.use_entrypoint_keys = enabled;
        self
    }

    /// Reject combinations that cannot yield distinct keys.
    ///
    /// Depends only on the options, never on actual output names.
    pub fn validate(self) -> Result<Self, PolicyError> {
        if self.use_entrypoint_keys && self.extensionless.covers_input() {
            return Err(PolicyError::ExtensionlessEntrypointKeys {
                extensionless: self.extensionless,
            });
        }
        Ok(self)
    }

    pub fn hash(&self) -> bool {
        self.hash
    }

    pub fn short_names(&self) -> Side {
        self.short_names
    }

    pub fn extensionless(&self) -> Side {
        self.extensionless
    }

    pub fn relative(&self) -> Side {
        self.relative
    }

    pub fn use_entrypoint_keys(&self) -> bool {
        self.use_entrypoint_keys
    }

    /// Entry and asset naming templates the bundler must be configured with.
    ///
    /// With hashing off, any template that still carries `[hash]` is
    /// replaced by `[dir]/[name]`.
    pub fn bundler_templates(
        &self,
        entry_names: Option<&str>,
        asset_names: Option<&str>,
    ) -> (String, String) {
        let pick = |requested: Option<&str>| -> String {
            match requested {
                Some(template) if !self.hash && template.contains("[hash]") => {
                    NamingTemplate::UNHASHED.to_string()
                }
                Some(template) => template.to_string(),
                None if self.hash => NamingTemplate::DEFAULT.to_string(),
                None => NamingTemplate::UNHASHED.to_string(),
            }
        };
        (pick(entry_names), pick(asset_names))
    }
}
