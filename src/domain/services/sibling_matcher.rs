//! Sibling Matcher
//!
//! Bundlers emit some outputs on behalf of an entry without linking them to
//! it: the stylesheet collected from a script entry's CSS imports, and the
//! sourcemaps written next to each file. Those outputs are hashed on their
//! own, so their hashes differ from the entry's. Pairing happens on the
//! hash-stripped path instead: same directory, same stem, different
//! extension.
//!
//! Outputs with a declared entry point are entries in their own right and
//! never go through sibling search; this includes stylesheets built directly
//! as entries.

use std::collections::HashMap;

use tracing::trace;

use crate::domain::entities::BuildOutput;
use crate::domain::services::key_resolver::extension_of;
use crate::domain::value_objects::{NamingTemplate, TemplateError};

/// How an output relates to the declared entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputRole {
    Entry,
    /// Emitted for the entry output at index `entry`
    Sibling { entry: usize },
    /// Sourcemap of the output at index `partner`
    SourceMap { partner: usize },
    /// Shared chunk or loose asset; not recorded
    Unlinked,
}

impl OutputRole {
    pub fn is_recorded(&self) -> bool {
        !matches!(self, OutputRole::Unlinked)
    }
}

/// Role of an output together with its hash-stripped path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedOutput {
    pub role: OutputRole,
    pub unhashed: String,
}

/// Pairs non-entry outputs with the entry they were emitted for
#[derive(Debug, Clone, Copy)]
pub struct SiblingMatcher<'a> {
    entry_names: &'a NamingTemplate,
    asset_names: &'a NamingTemplate,
}

impl<'a> SiblingMatcher<'a> {
    pub fn new(entry_names: &'a NamingTemplate, asset_names: &'a NamingTemplate) -> Self {
        Self {
            entry_names,
            asset_names,
        }
    }

    /// Classify every output; the result is index-aligned with `outputs`.
    ///
    /// Fails only when an entry output does not fit the entry template.
    pub fn classify(
        &self,
        outputs: &[BuildOutput],
    ) -> Result<Vec<ClassifiedOutput>, TemplateError> {
        let by_path: HashMap<&str, usize> = outputs
            .iter()
            .enumerate()
            .map(|(i, output)| (output.output_path(), i))
            .collect();
        let mut classified: Vec<Option<ClassifiedOutput>> = vec![None; outputs.len()];
        let mut identities: HashMap<(String, String), Vec<usize>> = HashMap::new();

        for (i, output) in outputs.iter().enumerate() {
            if !output.is_entry() {
                continue;
            }
            let unhashed = self.entry_names.strip(output.output_path())?;
            identities.entry(identity(&unhashed)).or_default().push(i);
            classified[i] = Some(ClassifiedOutput {
                role: OutputRole::Entry,
                unhashed,
            });
        }

        // Links the bundler reported itself win over name matching.
        for (i, output) in outputs.iter().enumerate() {
            let Some(css) = output.css_bundle().filter(|_| output.is_entry()) else {
                continue;
            };
            let Some(&j) = by_path.get(css) else {
                continue;
            };
            if classified[j].is_none() {
                classified[j] = Some(ClassifiedOutput {
                    role: OutputRole::Sibling { entry: i },
                    unhashed: self.strip_sibling(css).unwrap_or_else(|| css.to_string()),
                });
            }
        }

        for (i, output) in outputs.iter().enumerate() {
            if classified[i].is_some() || output.is_source_map() {
                continue;
            }
            let path = output.output_path();
            let found = self.strip_sibling(path).map(|unhashed| {
                let extension = extension_of(&unhashed);
                let entry = identities.get(&identity(&unhashed)).and_then(|candidates| {
                    candidates.iter().copied().find(|&e| {
                        classified[e]
                            .as_ref()
                            .is_some_and(|c| extension_of(&c.unhashed) != extension)
                    })
                });
                (entry, unhashed)
            });

            classified[i] = Some(match found {
                Some((Some(entry), unhashed)) => ClassifiedOutput {
                    role: OutputRole::Sibling { entry },
                    unhashed,
                },
                Some((None, unhashed)) => {
                    trace!(output = path, "no entry shares this output's name");
                    ClassifiedOutput {
                        role: OutputRole::Unlinked,
                        unhashed,
                    }
                }
                None => {
                    trace!(output = path, "output does not fit any naming template");
                    unlinked(path)
                }
            });
        }

        // Sourcemaps sit next to the file they describe: `<output>.map`.
        for (i, output) in outputs.iter().enumerate() {
            if classified[i].is_some() {
                continue;
            }
            let path = output.output_path();
            let partner = path
                .strip_suffix(".map")
                .and_then(|base| by_path.get(base).copied())
                .and_then(|p| classified[p].as_ref().map(|c| (p, c)))
                .filter(|(_, c)| c.role.is_recorded());

            classified[i] = Some(match partner {
                Some((p, c)) => ClassifiedOutput {
                    role: OutputRole::SourceMap { partner: p },
                    unhashed: format!("{}.map", c.unhashed),
                },
                None => {
                    trace!(output = path, "sourcemap without a recorded partner");
                    unlinked(path)
                }
            });
        }

        Ok(classified
            .into_iter()
            .zip(outputs)
            .map(|(c, output)| c.unwrap_or_else(|| unlinked(output.output_path())))
            .collect())
    }

    /// Non-entry outputs normally use the asset template; bundlers that name
    /// entry-derived stylesheets with the entry template are covered too.
    fn strip_sibling(&self, path: &str) -> Option<String> {
        self.asset_names
            .strip(path)
            .or_else(|_| self.entry_names.strip(path))
            .ok()
    }
}

fn unlinked(path: &str) -> ClassifiedOutput {
    ClassifiedOutput {
        role: OutputRole::Unlinked,
        unhashed: path.to_string(),
    }
}

/// `(directory, stem)` of a hash-stripped path
fn identity(unhashed: &str) -> (String, String) {
    let (dir, name) = match unhashed.rfind('/') {
        Some(slash) => (&unhashed[..slash], &unhashed[slash + 1..]),
        None => ("", unhashed),
    };
    let stem = match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    };
    (dir.to_string(), stem.to_string())
}
