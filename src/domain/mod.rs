//! Domain Layer
//!
//! The manifest-entry resolution engine: pure logic without I/O.
//!
//! ## Structure
//!
//! - `entities/` - Build outputs and the manifest itself
//! - `value_objects/` - Naming templates, digests, policy sides
//! - `policies/` - The naming policy and its validation
//! - `services/` - Key resolution, sibling matching, conflict detection, hashing
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system directly
//! 2. **Pure Functions** - Services are deterministic and testable
//! 3. **Ports & Adapters** - Persistence goes through trait-defined ports

pub mod entities;
pub mod policies;
pub mod ports;
pub mod services;
pub mod value_objects;
