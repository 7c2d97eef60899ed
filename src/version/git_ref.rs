//! CI ref parsing
//!
//! A ref is the string a CI platform exposes to identify what is being built:
//! - Branch: `refs/heads/main`
//! - Pull request: `refs/pull/42/merge`
//! - Tag: `refs/tags/v1.2.3`

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::version::error::RefParseError;

/// Grammar every accepted ref must match. The `kind` alternatives are exactly
/// the identifiers listed in [`RefKind::ALL`]. The value may not contain any
/// line terminator (`\n`, `\r`, U+0085, U+2028, U+2029).
static REF_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^refs/(?<kind>heads|pull|tags)/(?<value>[^\n\r\x{85}\x{2028}\x{2029}]+)$")
        .expect("ref grammar is valid")
});

/// Kind of ref, determined by the segment after `refs/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    /// `refs/heads/<branch>`
    Branch,
    /// `refs/pull/<number>/<suffix>`
    PullRequest,
    /// `refs/tags/<tag>`
    Tag,
}

impl RefKind {
    pub const ALL: [RefKind; 3] = [RefKind::Branch, RefKind::PullRequest, RefKind::Tag];

    /// Returns the ref path segment identifying this kind
    pub fn identifier(&self) -> &'static str {
        match self {
            RefKind::Branch => "heads",
            RefKind::PullRequest => "pull",
            RefKind::Tag => "tags",
        }
    }

    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.identifier() == identifier)
    }
}

/// A successfully parsed ref
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ref {
    kind: RefKind,
    value: String,
}

impl Ref {
    /// Parse a raw ref string.
    ///
    /// The kind and the captured value are produced from the same match, so a
    /// `Ref` only exists for input that satisfies the grammar.
    pub fn parse(raw: &str) -> Result<Self, RefParseError> {
        let captures = REF_FORMAT
            .captures(raw)
            .ok_or_else(|| RefParseError::Malformed {
                raw: raw.to_string(),
            })?;

        let identifier = &captures["kind"];
        let Some(kind) = RefKind::from_identifier(identifier) else {
            unreachable!("ref grammar accepted unknown kind '{identifier}'");
        };

        Ok(Self {
            kind,
            value: captures["value"].to_string(),
        })
    }

    pub fn kind(&self) -> RefKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}
