//! Build version resolution
//!
//! Precedence (first satisfied wins):
//! 1. Explicit override value, used verbatim
//! 2. CI ref, formatted by kind:
//!    - Tag: `refs/tags/v1.2.3` -> `v1.2.3`
//!    - Pull request: `refs/pull/42/merge` -> `PR-42-SNAPSHOT`
//!    - Branch: `refs/heads/feature/login` -> `feature-login-SNAPSHOT`
//! 3. Undetermined

use tracing::{info, warn};

use crate::config::{
    GITHUB_REF, PROJECT_VERSION_PROPERTY_NAME, PULL_REQUEST_PREFIX, SNAPSHOT_SUFFIX,
};
use crate::version::git_ref::{Ref, RefKind};

/// Outcome of a resolution, including where the version came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Override(String),
    Ref { git_ref: Ref, version: String },
    Undetermined,
}

impl Resolution {
    pub fn version(&self) -> Option<&str> {
        match self {
            Resolution::Override(version) | Resolution::Ref { version, .. } => {
                Some(version.as_str())
            }
            Resolution::Undetermined => None,
        }
    }

    pub fn into_version(self) -> Option<String> {
        match self {
            Resolution::Override(version) | Resolution::Ref { version, .. } => Some(version),
            Resolution::Undetermined => None,
        }
    }

    pub fn git_ref(&self) -> Option<&Ref> {
        match self {
            Resolution::Ref { git_ref, .. } => Some(git_ref),
            _ => None,
        }
    }

    /// Returns the string representation of the version source
    pub fn source(&self) -> &'static str {
        match self {
            Resolution::Override(_) => "override",
            Resolution::Ref { .. } => "ref",
            Resolution::Undetermined => "undetermined",
        }
    }
}

/// Stateless resolver; `ref_variable` only names the input in log messages
#[derive(Debug, Clone)]
pub struct VersionResolver {
    ref_variable: String,
}

impl Default for VersionResolver {
    fn default() -> Self {
        Self::new(GITHUB_REF)
    }
}

impl VersionResolver {
    pub fn new(ref_variable: impl Into<String>) -> Self {
        Self {
            ref_variable: ref_variable.into(),
        }
    }

    pub fn ref_variable(&self) -> &str {
        &self.ref_variable
    }

    pub fn resolve(&self, override_value: Option<&str>, env_ref: Option<&str>) -> Resolution {
        if let Some(version) = override_value {
            info!(
                "Using the value of the '{}' property as the project version.",
                PROJECT_VERSION_PROPERTY_NAME
            );
            return Resolution::Override(version.to_string());
        }

        let Some(git_ref) = self.read_ref(env_ref) else {
            return Resolution::Undetermined;
        };

        let version = format_ref(&git_ref);
        info!("Setting project version to '{}'.", version);
        Resolution::Ref { git_ref, version }
    }

    pub fn resolve_version(
        &self,
        override_value: Option<&str>,
        env_ref: Option<&str>,
    ) -> Option<String> {
        self.resolve(override_value, env_ref).into_version()
    }

    fn read_ref(&self, env_ref: Option<&str>) -> Option<Ref> {
        let raw = match env_ref {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => {
                info!("Environment variable '{}' is not set.", self.ref_variable);
                return None;
            }
        };

        Ref::parse(raw)
            .inspect_err(|_| {
                warn!(
                    "The value of environment variable '{}' ('{}') does not match the expected format!",
                    self.ref_variable, raw
                )
            })
            .ok()
    }
}

/// Resolve with the default `GITHUB_REF` variable name
pub fn resolve_version(override_value: Option<&str>, env_ref: Option<&str>) -> Option<String> {
    VersionResolver::default().resolve_version(override_value, env_ref)
}

/// Format a parsed ref as a version string
pub fn format_ref(git_ref: &Ref) -> String {
    let value = git_ref.value();
    match git_ref.kind() {
        RefKind::Tag => value.to_string(),
        RefKind::PullRequest => {
            let number = value.split_once('/').map_or(value, |(number, _)| number);
            format!("{PULL_REQUEST_PREFIX}-{number}-{SNAPSHOT_SUFFIX}")
        }
        RefKind::Branch => format!("{}-{SNAPSHOT_SUFFIX}", value.replace('/', "-")),
    }
}
