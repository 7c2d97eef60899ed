//! Tracing subscriber setup
//!
//! Logs go to stderr or to a file, never to stdout, which carries the version.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Level used when verbose output is requested
pub const VERBOSE_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Default)]
pub struct LogOptions<'a> {
    pub verbose: bool,
    pub json: bool,
    pub file: Option<&'a Path>,
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the program.
pub fn init(options: &LogOptions<'_>) -> WorkerGuard {
    let filter = build_filter(std::env::var("RUST_LOG").ok().as_deref(), options.verbose);

    let appender = options.file.and_then(|path| {
        open_log_file(path)
            .inspect_err(|e| {
                eprintln!(
                    "Failed to open log file '{}', logging to stderr: {e}",
                    path.display()
                )
            })
            .ok()
    });
    let to_file = appender.is_some();

    let (writer, guard) = match appender {
        Some(appender) => tracing_appender::non_blocking(appender),
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(!to_file);

    let result = if options.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    // A subscriber may already be installed when embedded in another tool.
    if let Err(e) = result {
        eprintln!("Failed to install log subscriber: {e}");
    }

    guard
}

fn open_log_file(path: &Path) -> Result<RollingFileAppender, InitError> {
    let directory = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().unwrap_or(path.as_os_str());

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(directory)
}

fn build_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    if let Some(directives) = rust_log.filter(|s| !s.trim().is_empty()) {
        if let Ok(filter) = EnvFilter::try_new(directives) {
            return filter;
        }
    }

    if verbose {
        EnvFilter::new(VERBOSE_LOG_LEVEL)
    } else {
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    }
}
