use serde::Deserialize;
use std::path::Path;

use crate::version::error::ConfigError;

// =============================================================================
// Naming constants
// =============================================================================

/// Build property that, when set, is used as the version verbatim
pub const PROJECT_VERSION_PROPERTY_NAME: &str = "projectVersion";

/// Environment variable holding the ref being built on GitHub Actions
pub const GITHUB_REF: &str = "GITHUB_REF";

/// Prefix for pull request versions (`PR-42-SNAPSHOT`)
pub const PULL_REQUEST_PREFIX: &str = "PR";

/// Suffix marking a non-release build
pub const SNAPSHOT_SUFFIX: &str = "SNAPSHOT";

/// Printed when no version could be determined
pub const DEFAULT_FALLBACK: &str = "unspecified";

/// Resolver configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
    /// Explicit version that bypasses ref-based derivation
    pub project_version: Option<String>,
    /// Environment variable read for the ref
    pub ref_variable: String,
    pub fallback: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            project_version: None,
            ref_variable: GITHUB_REF.to_string(),
            fallback: DEFAULT_FALLBACK.to_string(),
        }
    }
}

impl ResolverConfig {
    /// Load configuration from a JSON file. Missing fields use defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
