//! Common test utilities for asset-manifest scenario, property and CLI tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated project directory plus helpers to run the CLI
//! - Fixtures: Build outputs, metafiles and known digests

#![allow(dead_code)]

pub mod env;

pub use env::*;
pub use fixtures::*;
