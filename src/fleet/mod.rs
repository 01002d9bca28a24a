// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The repository x branch loop.
//!
//! ```text
//! for repository in selection(discovered):
//!     no working copy?   clone, or ignored "not cloned"
//!     no git metadata?   ignored "not under git control"
//!     for branch in branches:
//!         fetch
//!         local branch / tracking branch / ignored "branch b does not exist"
//!         dirty and not bypassed?   ignored "uncommitted changes"
//!         checkout, rebase onto <remote>/<branch>
//!         operation.run()  -> processed | failed | ignored
//! ```
//!
//! Every error stops at the pair boundary and is recorded as a failure;
//! the loop itself only fails when nothing was discovered.

pub mod repository;
pub mod report;
pub mod selection;
pub mod workspace;

pub use repository::Repository;
pub use report::{Outcome, RunReport};
pub use selection::Selection;
pub use workspace::Workspace;

use crate::config::Config;
use crate::context::{RepoContext, Services};
use crate::error::{ConfigError, Result};
use crate::forge::RepositoryDescriptor;
use crate::logging::LogContext;
use crate::ops::{Operation, OperationStatus};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use tracing::{debug, error, info, warn};

/// Outcome of preparing a pair before the operation runs.
enum Prepared {
    Ready,
    Ignored(String),
}

/// Drives one operation across the fleet.
pub struct Fleet<'a> {
    config: &'a Config,
    services: Services<'a>,
    show_progress: bool,
}

impl<'a> Fleet<'a> {
    #[must_use]
    pub const fn new(config: &'a Config, services: Services<'a>) -> Self {
        Self {
            config,
            services,
            show_progress: false,
        }
    }

    /// Show an indicatif bar over repositories (only when stdout is a terminal).
    #[must_use]
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled && std::io::stdout().is_terminal();
        self
    }

    /// Selected repositories, in discovery order, with working copies under `workspace`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an invalid selection or an empty discovery.
    pub fn select(
        &self,
        discovered: &[RepositoryDescriptor],
        workspace: &Workspace,
    ) -> std::result::Result<Vec<Repository>, ConfigError> {
        if discovered.is_empty() {
            return Err(ConfigError::NoRepositories {
                query: self.config.forge.search_query(),
            });
        }
        let fleet = &self.config.fleet;
        let selection = Selection::from_config(fleet)?;
        Ok(discovered
            .iter()
            .map(|d| {
                Repository::from_descriptor(d, workspace.root(), &fleet.name_prefix, &fleet.name_suffix)
            })
            .filter(|r| selection.allows(&r.short_name))
            .collect())
    }

    /// Ensure a working copy exists. `Some(reason)` means the repository is ignored.
    fn ensure_working_copy(&self, repository: &Repository) -> Result<Option<String>> {
        let git = self.services.git;
        if !repository.path.exists() {
            if !self.config.fleet.clone_missing {
                return Ok(Some("not cloned".to_string()));
            }
            info!(repo = %repository.name, "cloning {}", repository.clone_url);
            git.clone_repo(&repository.clone_url, &repository.path)?;
        }
        if !git.is_repository(&repository.path) {
            return Ok(Some("not under git control".to_string()));
        }
        Ok(None)
    }

    fn prepare_branch(&self, repository: &Repository, branch: &str) -> Result<Prepared> {
        let git = self.services.git;
        let repo = repository.path.as_path();
        let remote = &self.config.fleet.remote;

        git.fetch(repo, remote)?;
        if !git.local_branch_exists(repo, branch)? {
            if !git.remote_tracking_exists(repo, remote, branch)? {
                return Ok(Prepared::Ignored(format!("branch {branch} does not exist")));
            }
            git.create_tracking_branch(repo, branch, remote)?;
        }

        let dirty = !git.status(repo)?.is_clean();
        if dirty && !self.config.global.ignore_local_changes {
            return Ok(Prepared::Ignored("uncommitted changes".to_string()));
        }

        git.checkout(repo, branch)?;
        let upstream = format!("{remote}/{branch}");
        if dirty {
            // A rebase refuses to start over local modifications.
            warn!(repo = %repository.name, "local changes present, not rebasing onto {upstream}");
        } else {
            git.rebase(repo, &upstream)?;
        }
        Ok(Prepared::Ready)
    }

    async fn run_pair(
        &self,
        repository: &Repository,
        branch: &str,
        operation: &Operation,
        report: &mut RunReport,
    ) {
        let name = repository.name.as_str();
        let pair = LogContext::pair(&repository.short_name, branch);
        let outcome = match self.prepare_branch(repository, branch) {
            Ok(Prepared::Ignored(reason)) => {
                report.ignored(branch, name, reason);
                return;
            }
            Ok(Prepared::Ready) => {
                let ctx = RepoContext::new(repository, branch, self.config);
                operation.run(&ctx, &self.services).await
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(OperationStatus::Done(note)) => {
                info!("{pair} {} done", operation.name());
                report.processed(branch, name, note);
            }
            Ok(OperationStatus::Skipped(reason)) => {
                info!("{pair} skipped: {reason}");
                report.ignored(branch, name, reason);
            }
            Ok(OperationStatus::Aborted) => {
                warn!("{pair} aborted by user");
                report.ignored(branch, name, "aborted by user");
            }
            Err(e) => {
                error!("{pair} {e:#}");
                report.failed(branch, name, format!("{e:#}"));
            }
        }
    }

    fn progress_bar(&self, len: usize) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let bar = ProgressBar::new(len as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(bar)
    }

    /// Apply `operation` to every selected repository and configured branch.
    ///
    /// Stops early, keeping the outcomes so far, when the cancellation token fires.
    pub async fn run(&self, repositories: &[Repository], operation: &Operation) -> RunReport {
        let mut report = RunReport::default();
        let progress = self.progress_bar(repositories.len());

        'repos: for repository in repositories {
            if self.services.cancel.is_cancelled() {
                report.mark_cancelled();
                break;
            }
            if let Some(bar) = &progress {
                bar.set_message(repository.short_name.clone());
            }

            match self.ensure_working_copy(repository) {
                Ok(None) => {}
                Ok(Some(reason)) => {
                    debug!(repo = %repository.name, "{reason}");
                    for branch in &self.config.fleet.branches {
                        report.ignored(branch, &repository.name, reason.clone());
                    }
                    continue;
                }
                Err(e) => {
                    error!(repo = %repository.name, "{e:#}");
                    for branch in &self.config.fleet.branches {
                        report.failed(branch, &repository.name, format!("{e:#}"));
                    }
                    continue;
                }
            }

            for branch in &self.config.fleet.branches {
                if self.services.cancel.is_cancelled() {
                    report.mark_cancelled();
                    break 'repos;
                }
                self.run_pair(repository, branch, operation, &mut report).await;
            }

            if let Some(bar) = &progress {
                bar.inc(1);
            }
        }

        if let Some(bar) = progress {
            bar.finish_and_clear();
        }
        report
    }
}
