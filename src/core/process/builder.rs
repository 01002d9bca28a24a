// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Describing a child process before it runs.

use bitflags::bitflags;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

bitflags! {
    /// What happens to each line the child writes to stdout or stderr.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OutputMode: u8 {
        /// Emit the line as a debug event.
        const LOG = 0b01;
        /// Keep the line in [`ProcessOutput`].
        const KEEP = 0b10;
    }
}

impl Default for OutputMode {
    fn default() -> Self {
        Self::LOG
    }
}

/// Result of a finished (or interrupted) child.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub(super) exit_code: i32,
    pub(super) stdout: String,
    pub(super) stderr: String,
    pub(super) interrupted: bool,
}

impl ProcessOutput {
    pub(super) fn interrupted(stdout: String, stderr: String) -> Self {
        Self {
            exit_code: -1,
            stdout,
            stderr,
            interrupted: true,
        }
    }

    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Kept stdout lines joined by `\n`; empty unless [`OutputMode::KEEP`] was set.
    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// The child was killed because the run was cancelled.
    #[must_use]
    pub const fn is_interrupted(&self) -> bool {
        self.interrupted
    }
}

/// A child process to spawn with [`ProcessBuilder::run`].
#[derive(Debug)]
pub struct ProcessBuilder {
    pub(super) program: PathBuf,
    pub(super) args: Vec<OsString>,
    pub(super) cwd: Option<PathBuf>,
    /// Added on top of the inherited environment.
    pub(super) env: Vec<(String, String)>,
    pub(super) stdin: Option<String>,
    pub(super) label: Option<String>,
    pub(super) output: OutputMode,
}

impl ProcessBuilder {
    /// A bare program name is resolved via PATH at spawn time.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
            stdin: None,
            label: None,
            output: OutputMode::default(),
        }
    }

    /// `command` run through `/bin/sh -c`.
    pub fn shell(command: impl Into<String>) -> Self {
        Self::new("/bin/sh").arg("-c").arg(command.into())
    }

    /// Whether `program` resolves to an executable, either as a path or via PATH.
    #[must_use]
    pub fn exists(program: &str) -> bool {
        which::which(program).is_ok()
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    #[must_use]
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Written to the child's stdin, which is then closed.
    #[must_use]
    pub fn stdin(mut self, content: impl Into<String>) -> Self {
        self.stdin = Some(content.into());
        self
    }

    /// Name used in log events instead of the program's file stem.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Keep stdout and stderr in the output as well as logging them.
    #[must_use]
    pub const fn capture(mut self) -> Self {
        self.output = OutputMode::LOG.union(OutputMode::KEEP);
        self
    }
}
