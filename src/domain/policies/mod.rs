//! Domain Policies
//!
//! Business rules that govern how manifest keys are named.

mod naming;

pub use naming::{NamingPolicy, PolicyError};
