//! Command-line entry points
//!
//! Every command exits successfully: an undetermined version is an expected
//! outcome for local builds, not a failure.

use std::env::VarError;
use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::ResolverConfig;
use crate::version::{Ref, Resolution, VersionResolver};

#[derive(Parser)]
#[command(name = "ref-version")]
#[command(version, about = "Derive a build version from an override or a CI ref")]
pub struct Cli {
    #[command(flatten)]
    pub resolve: ResolveArgs,

    /// Log at info level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Default)]
pub struct ResolveArgs {
    /// JSON config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Use this version verbatim, ignoring the ref
    #[arg(long, global = true, value_name = "VERSION")]
    pub project_version: Option<String>,

    /// Environment variable holding the CI ref
    #[arg(long, global = true, value_name = "NAME")]
    pub ref_variable: Option<String>,

    /// Printed when no version can be determined
    #[arg(long, global = true, value_name = "VALUE")]
    pub fallback: Option<String>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print the resolved version to stdout
    PrintVersion,
    /// Print the resolution as JSON
    Describe,
}

/// JSON payload of the `describe` command
#[derive(Debug, Serialize)]
pub struct Description<'a> {
    pub version: Option<&'a str>,
    pub source: &'static str,
    #[serde(rename = "ref")]
    pub git_ref: Option<&'a Ref>,
}

impl<'a> From<&'a Resolution> for Description<'a> {
    fn from(resolution: &'a Resolution) -> Self {
        Self {
            version: resolution.version(),
            source: resolution.source(),
            git_ref: resolution.git_ref(),
        }
    }
}

/// Merge the config file (if any) with command-line overrides.
///
/// An unreadable config file is logged and replaced by defaults.
pub fn effective_config(args: &ResolveArgs) -> ResolverConfig {
    let mut config = match &args.config {
        Some(path) => ResolverConfig::from_file(path)
            .inspect_err(|e| warn!("Ignoring config file '{}': {}", path.display(), e))
            .unwrap_or_default(),
        None => ResolverConfig::default(),
    };

    if let Some(project_version) = &args.project_version {
        config.project_version = Some(project_version.clone());
    }
    if let Some(ref_variable) = &args.ref_variable {
        config.ref_variable = ref_variable.clone();
    }
    if let Some(fallback) = &args.fallback {
        config.fallback = fallback.clone();
    }

    config
}

/// Value of the ref variable, read once at the call boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvRef {
    Set(String),
    Unset,
    /// Present but not valid UTF-8
    Unreadable,
}

impl EnvRef {
    pub fn read(name: &str) -> Self {
        Self::from_var(name, std::env::var(name))
    }

    /// Convert a `std::env::var` result. A non-UTF-8 value is warned about
    /// here so it is not later reported as unset.
    pub fn from_var(name: &str, value: Result<String, VarError>) -> Self {
        match value {
            Ok(value) => EnvRef::Set(value),
            Err(VarError::NotPresent) => EnvRef::Unset,
            Err(VarError::NotUnicode(raw)) => {
                warn!(
                    "The value of environment variable '{}' ('{}') is not valid UTF-8!",
                    name,
                    raw.to_string_lossy()
                );
                EnvRef::Unreadable
            }
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            EnvRef::Set(value) => Some(value.as_str()),
            EnvRef::Unset | EnvRef::Unreadable => None,
        }
    }
}

impl From<Option<&str>> for EnvRef {
    fn from(value: Option<&str>) -> Self {
        value.map_or(EnvRef::Unset, |value| EnvRef::Set(value.to_string()))
    }
}

pub fn resolve(config: &ResolverConfig, env_ref: &EnvRef) -> Resolution {
    let override_value = config.project_version.as_deref();
    if *env_ref == EnvRef::Unreadable && override_value.is_none() {
        return Resolution::Undetermined;
    }

    VersionResolver::new(config.ref_variable.as_str()).resolve(override_value, env_ref.value())
}

pub fn run_command(
    command: Command,
    config: &ResolverConfig,
    env_ref: &EnvRef,
    out: &mut impl Write,
) -> std::io::Result<()> {
    let resolution = resolve(config, env_ref);

    match command {
        Command::PrintVersion => {
            let version = resolution.version().unwrap_or_else(|| {
                info!("No version determined, printing '{}'.", config.fallback);
                config.fallback.as_str()
            });
            writeln!(out, "{version}")
        }
        Command::Describe => {
            let payload = serde_json::to_string(&Description::from(&resolution))?;
            writeln!(out, "{payload}")
        }
    }
}
