//! Version derivation from CI refs
//!
//! # Modules
//!
//! - [`git_ref`]: Ref grammar, `Ref` value object and `RefKind` classification
//! - [`resolver`]: Override/ref precedence and per-kind formatting
//! - [`error`]: Error types for ref parsing and config loading

pub mod error;
pub mod git_ref;
pub mod resolver;

pub use git_ref::{Ref, RefKind};
pub use resolver::{Resolution, VersionResolver, resolve_version};
