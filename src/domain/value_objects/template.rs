//! Naming Template Value Object
//!
//! Bundlers name their outputs from placeholder templates such as
//! `[dir]/[name]-[hash]`. A template is parsed into tagged segments and
//! compiled into a matcher that finds where the content hash sits inside a
//! concrete output path, so the path can be mapped back to its unhashed form.
//!
//! `[dir]`, `[name]` and `[ext]` are wildcards; literals are matched
//! verbatim; `[hash]` is a fixed-width, case-sensitive alphanumeric run.
//! When the template has no `[ext]`, the extension the bundler appends
//! (`.js`, `.css`, `.js.map`, ...) is accepted after the last segment.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use thiserror::Error;

/// Width of the hashes esbuild writes into filenames.
pub const DEFAULT_HASH_LENGTH: usize = 8;

/// Literal characters that are dropped together with an adjacent hash.
const SEPARATORS: &[char] = &['-', '_', '.', '~', '+', '@'];

/// Errors raised while parsing a template or matching a filename against it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("naming template is empty")]
    Empty,

    #[error("unknown placeholder '{placeholder}' in naming template '{template}'")]
    UnknownPlaceholder {
        template: String,
        placeholder: String,
    },

    #[error("naming template '{template}' contains more than one [hash] placeholder")]
    MultipleHashes { template: String },

    #[error("hash length must be at least 1 (got {length})")]
    InvalidHashLength { length: usize },

    /// `[name]FOO[hash]`: the alphanumeric literal runs straight into the
    /// hash, so the boundary between the two cannot be told apart.
    #[error(
        "unsupported naming template '{template}': literal '{literal}' sits directly between \
         a placeholder and [hash] without a separator"
    )]
    Unsupported { template: String, literal: String },

    /// `[dir]/[hash]`: nothing of the file name is left once the hash goes.
    #[error("unsupported naming template '{template}': [hash] is the whole file name")]
    BareHash { template: String },

    #[error("naming template '{template}' could not be compiled: {message}")]
    Invalid { template: String, message: String },

    #[error("could not locate the [hash] of '{filename}' using naming template '{template}'")]
    NoMatch { template: String, filename: String },
}

/// One tagged piece of a naming template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Dir,
    Name,
    Hash,
    Ext,
}

impl Segment {
    fn is_wildcard(&self) -> bool {
        matches!(self, Segment::Dir | Segment::Name | Segment::Ext)
    }
}

/// Byte offsets of the hash inside a filename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashSpan {
    start: usize,
    end: usize,
}

impl HashSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The hash text itself
    pub fn slice<'a>(&self, filename: &'a str) -> &'a str {
        &filename[self.start..self.end]
    }
}

/// A parsed naming template with its compiled hash matcher
#[derive(Debug, Clone)]
pub struct NamingTemplate {
    raw: String,
    segments: Vec<Segment>,
    hash_length: usize,
    matcher: Option<Regex>,
}

impl NamingTemplate {
    /// esbuild's default output naming.
    pub const DEFAULT: &'static str = "[dir]/[name]-[hash]";
    /// Naming requested from the bundler when hashing is disabled.
    pub const UNHASHED: &'static str = "[dir]/[name]";

    /// Parse a template assuming the default hash width
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        Self::with_hash_length(raw, DEFAULT_HASH_LENGTH)
    }

    /// Parse a template whose hashes are `hash_length` characters wide
    pub fn with_hash_length(raw: &str, hash_length: usize) -> Result<Self, TemplateError> {
        if hash_length == 0 {
            return Err(TemplateError::InvalidHashLength {
                length: hash_length,
            });
        }

        let segments = parse_segments(raw)?;
        validate_segments(raw, &segments)?;

        let matcher = if segments.contains(&Segment::Hash) {
            let pattern = compile_pattern(&segments, hash_length);
            let regex = Regex::new(&pattern).map_err(|e| TemplateError::Invalid {
                template: raw.to_string(),
                message: e.to_string(),
            })?;
            Some(regex)
        } else {
            None
        };

        Ok(Self {
            raw: raw.to_string(),
            segments,
            hash_length,
            matcher,
        })
    }

    /// `[dir]/[name]`, which never carries a hash
    pub fn unhashed() -> Self {
        Self {
            raw: Self::UNHASHED.to_string(),
            segments: vec![
                Segment::Dir,
                Segment::Literal("/".to_string()),
                Segment::Name,
            ],
            hash_length: DEFAULT_HASH_LENGTH,
            matcher: None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn hash_length(&self) -> usize {
        self.hash_length
    }

    pub fn has_hash(&self) -> bool {
        self.matcher.is_some()
    }

    /// Find the hash inside a path generated from this template.
    ///
    /// Returns `Ok(None)` when the template has no `[hash]`.
    pub fn locate(&self, filename: &str) -> Result<Option<HashSpan>, TemplateError> {
        let Some(matcher) = &self.matcher else {
            return Ok(None);
        };
        let hash = matcher
            .captures(filename)
            .and_then(|caps| caps.name("hash"))
            .ok_or_else(|| self.no_match(filename))?;
        Ok(Some(HashSpan::new(hash.start(), hash.end())))
    }

    /// The path with its hash (and the separator joining it) removed
    pub fn strip(&self, filename: &str) -> Result<String, TemplateError> {
        let Some(matcher) = &self.matcher else {
            return Ok(filename.to_string());
        };
        let caps = matcher
            .captures(filename)
            .ok_or_else(|| self.no_match(filename))?;
        let hash = caps.name("hash").ok_or_else(|| self.no_match(filename))?;

        let (start, end) = match caps.name("sep") {
            Some(sep) => (sep.start().min(hash.start()), sep.end().max(hash.end())),
            None => (hash.start(), hash.end()),
        };

        let mut stripped = String::with_capacity(filename.len() - (end - start));
        stripped.push_str(&filename[..start]);
        stripped.push_str(&filename[end..]);
        Ok(stripped)
    }

    fn no_match(&self, filename: &str) -> TemplateError {
        TemplateError::NoMatch {
            template: self.raw.clone(),
            filename: filename.to_string(),
        }
    }
}

impl PartialEq for NamingTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw && self.hash_length == other.hash_length
    }
}

impl Eq for NamingTemplate {}

impl fmt::Display for NamingTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl FromStr for NamingTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Split a template into literal and placeholder segments.
///
/// Brackets that do not form a placeholder (`[`, `[1]`, `[]`) stay literal;
/// a bracketed lowercase word that is not a known placeholder is an error.
pub fn parse_segments(template: &str) -> Result<Vec<Segment>, TemplateError> {
    if template.is_empty() {
        return Err(TemplateError::Empty);
    }

    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(open) = rest.find('[') {
        literal.push_str(&rest[..open]);
        let tail = &rest[open..];

        let Some(close) = tail.find(']') else {
            literal.push_str(tail);
            rest = "";
            break;
        };

        let token = &tail[1..close];
        let placeholder = match token {
            "dir" => Some(Segment::Dir),
            "name" => Some(Segment::Name),
            "hash" => Some(Segment::Hash),
            "ext" => Some(Segment::Ext),
            _ => None,
        };

        match placeholder {
            Some(segment) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(segment);
                rest = &tail[close + 1..];
            }
            None if !token.is_empty() && token.chars().all(|c| c.is_ascii_lowercase()) => {
                return Err(TemplateError::UnknownPlaceholder {
                    template: template.to_string(),
                    placeholder: format!("[{}]", token),
                });
            }
            None => {
                literal.push('[');
                rest = &tail[1..];
            }
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

fn validate_segments(template: &str, segments: &[Segment]) -> Result<(), TemplateError> {
    let hashes = segments.iter().filter(|s| **s == Segment::Hash).count();
    if hashes > 1 {
        return Err(TemplateError::MultipleHashes {
            template: template.to_string(),
        });
    }

    let Some(at) = segments.iter().position(|s| *s == Segment::Hash) else {
        return Ok(());
    };
    if at >= 2 {
        if let Segment::Literal(literal) = &segments[at - 1] {
            if segments[at - 2].is_wildcard() && literal.chars().all(|c| c.is_ascii_alphanumeric())
            {
                return Err(TemplateError::Unsupported {
                    template: template.to_string(),
                    literal: literal.clone(),
                });
            }
        }
    }

    if hash_starts_file_name(segments, at) && !names_follow(&segments[at + 1..]) {
        return Err(TemplateError::BareHash {
            template: template.to_string(),
        });
    }

    Ok(())
}

/// Nothing from the template precedes the hash in the last path segment
fn hash_starts_file_name(segments: &[Segment], at: usize) -> bool {
    match at.checked_sub(1).map(|i| &segments[i]) {
        None | Some(Segment::Dir) => true,
        Some(Segment::Literal(literal)) => {
            literal == "/" && (at == 1 || segments[at - 2] == Segment::Dir)
        }
        Some(_) => false,
    }
}

/// A `[name]` or a further directory level comes after the hash
fn names_follow(rest: &[Segment]) -> bool {
    rest.iter().any(|segment| match segment {
        Segment::Name => true,
        Segment::Literal(literal) => literal.contains('/'),
        _ => false,
    })
}

fn is_separator(literal: &str) -> bool {
    !literal.is_empty() && literal.chars().all(|c| SEPARATORS.contains(&c))
}

/// Which part of a literal is captured as `sep` and removed with the hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SepCapture {
    Whole(usize),
    /// The `/` opening the literal after a hash that fills a directory level
    LeadingSlash(usize),
    /// The `/` closing the literal before a hash that fills the file stem
    TrailingSlash(usize),
}

/// The literal as it appears in the compiled pattern
fn effective_literal<'a>(segments: &'a [Segment], i: usize) -> Option<&'a str> {
    match segments.get(i) {
        Some(Segment::Literal(literal)) => {
            // `[dir]/` may collapse to nothing when the output sits at the root.
            if i > 0 && segments[i - 1] == Segment::Dir {
                Some(literal.strip_prefix('/').unwrap_or(literal))
            } else {
                Some(literal.as_str())
            }
        }
        _ => None,
    }
}

fn sep_capture(segments: &[Segment], hash_at: usize) -> Option<SepCapture> {
    let before = hash_at
        .checked_sub(1)
        .and_then(|i| effective_literal(segments, i));
    let after = effective_literal(segments, hash_at + 1);

    if before.is_some_and(is_separator) {
        Some(SepCapture::Whole(hash_at - 1))
    } else if after.is_some_and(is_separator) {
        Some(SepCapture::Whole(hash_at + 1))
    } else if after.is_some_and(|l| l.starts_with('/')) {
        Some(SepCapture::LeadingSlash(hash_at + 1))
    } else if before.is_some_and(|l| l.ends_with('/')) {
        Some(SepCapture::TrailingSlash(hash_at - 1))
    } else {
        None
    }
}

/// Build the anchored regex for a template that contains `[hash]`.
fn compile_pattern(segments: &[Segment], hash_length: usize) -> String {
    let hash_at = segments
        .iter()
        .position(|s| *s == Segment::Hash)
        .unwrap_or(segments.len());
    let sep = sep_capture(segments, hash_at);

    // Outputs live below the outdir, so any leading directories are accepted.
    let mut pattern = String::from("^(?:.*/)?");

    for (i, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Literal(_) => {
                let literal = effective_literal(segments, i).unwrap_or_default();
                if literal.is_empty() {
                    continue;
                }
                match sep {
                    Some(SepCapture::Whole(at)) if at == i => {
                        pattern.push_str(&format!("(?P<sep>{})", regex::escape(literal)));
                    }
                    Some(SepCapture::LeadingSlash(at)) if at == i => {
                        pattern.push_str("(?P<sep>/)");
                        pattern.push_str(&regex::escape(&literal[1..]));
                    }
                    Some(SepCapture::TrailingSlash(at)) if at == i => {
                        pattern.push_str(&regex::escape(&literal[..literal.len() - 1]));
                        pattern.push_str("(?P<sep>/)");
                    }
                    _ => pattern.push_str(&regex::escape(literal)),
                }
            }
            Segment::Dir => {
                let slash_follows =
                    matches!(segments.get(i + 1), Some(Segment::Literal(l)) if l.starts_with('/'));
                pattern.push_str(if slash_follows { "(?:.*/)?" } else { ".*" });
            }
            Segment::Name => pattern.push_str("[^/]*"),
            Segment::Hash => {
                pattern.push_str(&format!("(?P<hash>[A-Za-z0-9]{{{}}})", hash_length));
            }
            Segment::Ext => pattern.push_str("[^/.]+"),
        }
    }

    if !segments.contains(&Segment::Ext) {
        pattern.push_str(r"(?:\.[^/]*)?");
    }
    pattern.push('$');
    pattern
}
