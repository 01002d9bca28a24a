// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fmt;

/// One recorded pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub branch: String,
    pub repository: String,
    pub reason: Option<String>,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.branch, self.repository)?;
        if let Some(reason) = &self.reason {
            write!(f, ": {reason}")?;
        }
        Ok(())
    }
}

/// Outcomes of a run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    processed: Vec<Outcome>,
    failed: Vec<Outcome>,
    ignored: Vec<Outcome>,
    cancelled: bool,
}

impl RunReport {
    pub fn processed(&mut self, branch: &str, repository: &str, note: Option<String>) {
        self.processed.push(Outcome {
            branch: branch.to_string(),
            repository: repository.to_string(),
            reason: note,
        });
    }

    pub fn failed(&mut self, branch: &str, repository: &str, reason: impl Into<String>) {
        self.failed.push(Outcome {
            branch: branch.to_string(),
            repository: repository.to_string(),
            reason: Some(reason.into()),
        });
    }

    pub fn ignored(&mut self, branch: &str, repository: &str, reason: impl Into<String>) {
        self.ignored.push(Outcome {
            branch: branch.to_string(),
            repository: repository.to_string(),
            reason: Some(reason.into()),
        });
    }

    pub const fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    #[must_use]
    pub const fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    #[must_use]
    pub fn processed_outcomes(&self) -> &[Outcome] {
        &self.processed
    }

    #[must_use]
    pub fn failed_outcomes(&self) -> &[Outcome] {
        &self.failed
    }

    #[must_use]
    pub fn ignored_outcomes(&self) -> &[Outcome] {
        &self.ignored
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sections = [
            ("Processed", &self.processed),
            ("Failed", &self.failed),
            ("Ignored", &self.ignored),
        ];
        for (title, outcomes) in sections {
            writeln!(f, "{title} ({}):", outcomes.len())?;
            for outcome in outcomes {
                writeln!(f, "  - {outcome}")?;
            }
        }
        if self.cancelled {
            writeln!(f, "Run cancelled before all repositories were visited.")?;
        }
        Ok(())
    }
}
