//! Derive a build version from an explicit override or a CI ref.
//!
//! ```
//! use ref_version::resolve_version;
//!
//! assert_eq!(resolve_version(None, Some("refs/tags/v2.0.0")).as_deref(), Some("v2.0.0"));
//! assert_eq!(resolve_version(Some("1.0.0"), Some("refs/heads/main")).as_deref(), Some("1.0.0"));
//! assert_eq!(resolve_version(None, None), None);
//! ```

pub mod cli;
pub mod config;
pub mod logging;
pub mod version;

pub use version::resolve_version;
