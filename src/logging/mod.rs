// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Logging for fleet runs, built on `tracing`.
//!
//! ```text
//! init_logging(&LogConfig)
//!   registry
//!   |-- stderr layer   EnvFilter(console level), ANSI
//!   `-- file layer     EnvFilter(file level), non_blocking, span close events
//!   --> LogGuard (flushes the file on drop)
//! ```
//!
//! Console logs go to stderr so the run summary on stdout stays clean.
//!
//! Levels as accepted by `-l/--log-level`:
//!
//! | level | shows |
//! |-------|-------|
//! | 0 | nothing |
//! | 1 | errors |
//! | 2 | warnings |
//! | 3 | one line per repository/branch step (default) |
//! | 4 | every git/mvn/oc command line and its output |
//! | 5 | booster internals at trace |
//! | 6 | trace from every crate |

use anyhow::Context;
use bon::Builder;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self as tracing_fmt, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Silent,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
    Dump,
}

impl LogLevel {
    /// `None` above 6.
    #[must_use]
    pub const fn from_u8(level: u8) -> Option<Self> {
        Some(match level {
            0 => Self::Silent,
            1 => Self::Error,
            2 => Self::Warn,
            3 => Self::Info,
            4 => Self::Debug,
            5 => Self::Trace,
            6 => Self::Dump,
            _ => return None,
        })
    }

    /// Progress bars would interleave with per-command debug output.
    #[must_use]
    pub const fn allows_progress(self) -> bool {
        matches!(self, Self::Silent | Self::Error | Self::Warn | Self::Info)
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::new(match self {
            Self::Silent => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "booster_rs=debug,booster=debug,warn",
            Self::Trace => "booster_rs=trace,booster=trace,info",
            Self::Dump => "trace",
        })
    }
}

#[derive(Debug, Clone, Default, Builder)]
pub struct LogConfig {
    #[builder(setters(name = with_console_level), default)]
    console_level: LogLevel,
    /// Defaults to the console level.
    #[builder(setters(name = with_file_level))]
    file_level: Option<LogLevel>,
    #[builder(setters(name = with_log_file))]
    log_file: Option<PathBuf>,
}

impl LogConfig {
    #[must_use]
    pub const fn console_level(&self) -> LogLevel {
        self.console_level
    }

    #[must_use]
    pub fn file_level(&self) -> LogLevel {
        self.file_level.unwrap_or(self.console_level)
    }

    #[must_use]
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

/// Keeps the file writer alive; dropping it flushes pending lines.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if the log file or its directory cannot be created.
pub fn init_logging(config: &LogConfig) -> Result<LogGuard> {
    let console_layer = tracing_fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true)
        .with_filter(config.console_level().filter());

    let (file_layer, file_guard) = match config.log_file() {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(open_log_file(path)?);
            let layer = tracing_fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_span_events(FmtSpan::CLOSE)
                .with_filter(config.file_level().filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(LogGuard {
        _file_guard: file_guard,
    })
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    File::create(path).with_context(|| format!("failed to create log file {}", path.display()))
}

/// The repository/branch pair a log line is about, shown as `[crud/master]`.
#[derive(Debug, Clone, Copy)]
pub struct LogContext<'a> {
    repo: &'a str,
    branch: &'a str,
}

impl<'a> LogContext<'a> {
    #[must_use]
    pub const fn pair(repo: &'a str, branch: &'a str) -> Self {
        Self { repo, branch }
    }
}

impl fmt::Display for LogContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}]", self.repo, self.branch)
    }
}
