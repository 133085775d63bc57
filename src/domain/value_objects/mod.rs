//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod digest;
mod side;
mod template;

pub use digest::ContentDigest;
pub use side::Side;
pub use template::{
    parse_segments, HashSpan, NamingTemplate, Segment, TemplateError, DEFAULT_HASH_LENGTH,
};
