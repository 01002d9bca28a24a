// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Spawning, draining and reaping a child.
//!
//! ```text
//! run(&cancel)
//!   cancelled already?  --> interrupted, nothing spawned
//!   spawn, one drain task per stream, feed stdin
//!   select { child exits | cancel -> kill }
//!   join drains
//!   exit 0 --> ProcessOutput     else --> ProcessError::NonZeroExit
//! ```

use crate::error::{ProcessError, Result};
use anyhow::Context;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::builder::{OutputMode, ProcessBuilder, ProcessOutput};

impl ProcessBuilder {
    fn display_label(&self) -> String {
        self.label.clone().unwrap_or_else(|| {
            self.program
                .file_stem()
                .map_or_else(|| "process".to_string(), |s| s.to_string_lossy().into_owned())
        })
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.to_string_lossy())
            .chain(self.args.iter().map(|arg| arg.to_string_lossy()))
            .map(|part| {
                if part.contains(char::is_whitespace) {
                    format!("'{part}'")
                } else {
                    part.into_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .stdin(if self.stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }
        command
    }

    /// Runs the child to completion.
    ///
    /// Cancelling `cancel` kills the child; the result is then an output with
    /// [`ProcessOutput::is_interrupted`] set rather than an error.
    ///
    /// # Errors
    ///
    /// Fails when the child cannot be spawned, its stdin cannot be written,
    /// or it exits with a non-zero code.
    pub async fn run(self, cancel: &CancellationToken) -> Result<ProcessOutput> {
        if cancel.is_cancelled() {
            return Ok(ProcessOutput::interrupted(String::new(), String::new()));
        }

        let label = self.display_label();
        let line = self.command_line();
        debug!(cmd = %line, cwd = ?self.cwd, "exec");

        let mut child = self
            .command()
            .spawn()
            .map_err(|source| ProcessError::SpawnFailed {
                command: line.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .map(|stream| tokio::spawn(drain(stream, self.output, label.clone(), "stdout")));
        let stderr = child
            .stderr
            .take()
            .map(|stream| tokio::spawn(drain(stream, self.output, label.clone(), "stderr")));

        if let Some(content) = &self.stdin
            && let Some(mut pipe) = child.stdin.take()
        {
            pipe.write_all(content.as_bytes())
                .await
                .with_context(|| format!("failed to write stdin of {label}"))?;
        }

        let status = tokio::select! {
            status = child.wait() => Some(status.with_context(|| format!("failed waiting for {label}"))?),
            () = cancel.cancelled() => {
                warn!(process = %label, "cancelled, killing child");
                child.kill().await.ok();
                None
            }
        };

        let stdout = joined(stdout).await;
        let stderr = joined(stderr).await;

        let Some(status) = status else {
            return Ok(ProcessOutput::interrupted(stdout, stderr));
        };
        let exit_code = status.code().unwrap_or(-1);
        if exit_code != 0 {
            if let Some(last) = stderr.lines().last() {
                error!(process = %label, exit_code, stderr = %last, "failed");
            }
            return Err(ProcessError::NonZeroExit {
                command: line,
                code: exit_code,
            }
            .into());
        }

        debug!(process = %label, "done");
        Ok(ProcessOutput {
            exit_code,
            stdout,
            stderr,
            interrupted: false,
        })
    }
}

/// Reads `stream` to the end, returning the kept lines.
async fn drain<R>(stream: R, mode: OutputMode, label: String, name: &'static str) -> String
where
    R: AsyncRead + Unpin,
{
    let mut kept = Vec::new();
    let mut lines = BufReader::new(stream).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if mode.contains(OutputMode::LOG) {
                    debug!(process = %label, stream = name, "{line}");
                }
                if mode.contains(OutputMode::KEEP) {
                    kept.push(line);
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(process = %label, stream = name, error = %e, "unreadable output");
                break;
            }
        }
    }
    kept.join("\n")
}

async fn joined(task: Option<JoinHandle<String>>) -> String {
    match task {
        Some(handle) => handle.await.unwrap_or_default(),
        None => String::new(),
    }
}
