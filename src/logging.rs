//! Tracing configuration and log routing.
//!
//! Events go to stdout through a compact formatter and, unless disabled, to a log file through a
//! non-blocking writer so request handlers never wait on disk. `RUST_LOG` controls filtering.
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_FILE: &str = "notes-summarizer.log";

/// Where file logs should be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Stdout only.
    StdoutOnly,
    /// Stdout plus an append-only file at the given path.
    File(PathBuf),
}

impl LogTarget {
    /// Resolve the target from `NOTES_SUMMARIZER_LOG_FILE`.
    ///
    /// Unset means `logs/notes-summarizer.log`; the literal value `off` disables file logging.
    pub fn from_env() -> Self {
        Self::from_value(std::env::var("NOTES_SUMMARIZER_LOG_FILE").ok().as_deref())
    }

    fn from_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("off") => Self::StdoutOnly,
            Some(path) if !path.is_empty() => Self::File(PathBuf::from(path)),
            _ => Self::File(Path::new(DEFAULT_LOG_DIR).join(DEFAULT_LOG_FILE)),
        }
    }
}

/// Install the global subscriber: env filter (default `info`), compact stdout, optional file.
pub fn init_tracing(target: &LogTarget) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false).compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    let writer = match target {
        LogTarget::StdoutOnly => None,
        LogTarget::File(path) => open_file_writer(path),
    };

    match writer {
        Some(writer) => {
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .compact();
            registry.with(file_layer).init();
        }
        None => registry.init(),
    }
}

/// Open `path` for appending, creating its parent directory first.
///
/// Failures are reported on stderr because the subscriber is not installed yet.
fn open_file_writer(path: &Path) -> Option<NonBlocking> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        if let Err(err) = std::fs::create_dir_all(parent) {
            eprintln!("Failed to create log directory {}: {err}", parent.display());
            return None;
        }
    }

    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let _ = LOG_GUARD.set(guard);
            Some(non_blocking)
        }
        Err(err) => {
            eprintln!("Failed to open log file {}: {err}", path.display());
            None
        }
    }
}
