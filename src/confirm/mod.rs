// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Confirmation prompts for destructive operations.

use anyhow::Result;
use std::io::{BufRead, BufReader, Stderr, Stdin, Write};
use std::sync::Mutex;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Yes,
    No,
}

/// Asks the operator before data is lost.
pub trait Confirm: Send + Sync {
    /// # Errors
    ///
    /// Fails if the prompt cannot be written. An unreadable answer is `No`.
    fn confirm(&self, action: &str) -> Result<Decision>;
}

/// `y`/`yes`, trimmed and case-insensitive.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == "y" || answer == "yes"
}

/// Line-based prompt over any reader/writer pair.
///
/// When disabled every question is answered `Yes` without touching I/O.
pub struct ConfirmationGate<R, W> {
    enabled: bool,
    input: Mutex<R>,
    output: Mutex<W>,
}

impl<R: BufRead, W: Write> ConfirmationGate<R, W> {
    pub const fn new(enabled: bool, input: R, output: W) -> Self {
        Self {
            enabled,
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl ConfirmationGate<BufReader<Stdin>, Stderr> {
    /// Prompt on stderr, read from stdin.
    #[must_use]
    pub fn stdio(enabled: bool) -> Self {
        Self::new(enabled, BufReader::new(std::io::stdin()), std::io::stderr())
    }
}

impl<R, W> Confirm for ConfirmationGate<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn confirm(&self, action: &str) -> Result<Decision> {
        if !self.enabled {
            return Ok(Decision::Yes);
        }

        {
            let mut output = self
                .output
                .lock()
                .map_err(|_| anyhow::anyhow!("prompt output poisoned"))?;
            write!(
                output,
                "\nWARNING: {action}\nUncommitted work will be lost. Continue? (y/N): "
            )?;
            output.flush()?;
        }

        let mut answer = String::new();
        let read = self
            .input
            .lock()
            .map_err(|_| anyhow::anyhow!("prompt input poisoned"))?
            .read_line(&mut answer)
            .unwrap_or_else(|e| {
                warn!("could not read the answer, treating it as no: {e}");
                0
            });

        if read > 0 && is_affirmative(&answer) {
            Ok(Decision::Yes)
        } else {
            Ok(Decision::No)
        }
    }
}
