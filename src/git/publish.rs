// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Dry-run aware commits, tags and pushes.
//!
//! Operations never call `commit_all`/`create_tag`/`push` directly; they go
//! through a [`Publisher`] so that dry runs log instead of writing history.

use super::RepositoryClient;
use crate::error::{BoosterResult, ReleaseError};
use std::path::Path;
use tracing::info;

/// History writer for one working copy.
///
/// Remembers the tags it created so the final push can carry them.
pub struct Publisher<'a> {
    git: &'a dyn RepositoryClient,
    repo: &'a Path,
    dry_run: bool,
    tags: Vec<String>,
    commits: usize,
}

impl<'a> Publisher<'a> {
    #[must_use]
    pub fn new(git: &'a dyn RepositoryClient, repo: &'a Path, dry_run: bool) -> Self {
        Self {
            git,
            repo,
            dry_run,
            tags: Vec::new(),
            commits: 0,
        }
    }

    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Tags created (or, in a dry run, announced) so far.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Whether anything was committed or tagged.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.commits > 0 || !self.tags.is_empty()
    }

    /// Stage everything and commit. Returns `false` when nothing was committed.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git fails.
    pub fn commit(&mut self, message: &str) -> BoosterResult<bool> {
        if self.dry_run {
            let pending = !self.git.status(self.repo)?.is_clean();
            if pending {
                info!("[DRY-RUN] would commit: {message}");
            }
            return Ok(false);
        }

        let committed = self.git.commit_all(self.repo, message)?;
        if committed {
            self.commits += 1;
            info!("committed: {message}");
        }
        Ok(committed)
    }

    /// Create an annotated tag at HEAD, refusing to overwrite one.
    ///
    /// # Errors
    ///
    /// Returns `ReleaseError::TagExists` if the tag is already present, or a
    /// `GitError` if git fails.
    pub fn tag(&mut self, tag: &str, message: &str) -> BoosterResult<()> {
        if self.git.tag_exists(self.repo, tag)? {
            return Err(ReleaseError::TagExists {
                tag: tag.to_string(),
            }
            .into());
        }

        if self.dry_run {
            info!("[DRY-RUN] would tag: {tag}");
        } else {
            self.git.create_tag(self.repo, tag, message)?;
            info!("tagged: {tag}");
        }
        self.tags.push(tag.to_string());
        Ok(())
    }

    /// Push `branch` together with every recorded tag in one batch.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the push fails.
    pub fn push_branch(&self, remote: &str, branch: &str) -> BoosterResult<()> {
        let mut refspecs = vec![branch.to_string()];
        refspecs.extend(self.tags.iter().map(|tag| format!("refs/tags/{tag}")));

        if self.dry_run {
            info!("[DRY-RUN] would push {} to {remote}", refspecs.join(" "));
            return Ok(());
        }
        self.git.push(self.repo, remote, &refspecs, false)?;
        info!("pushed {} to {remote}", refspecs.join(" "));
        Ok(())
    }

    /// Push the recorded tags only.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the push fails.
    pub fn push_tags(&self, remote: &str) -> BoosterResult<()> {
        if self.tags.is_empty() {
            return Ok(());
        }
        let refspecs: Vec<String> = self
            .tags
            .iter()
            .map(|tag| format!("refs/tags/{tag}"))
            .collect();

        if self.dry_run {
            info!("[DRY-RUN] would push {} to {remote}", refspecs.join(" "));
            return Ok(());
        }
        self.git.push(self.repo, remote, &refspecs, false)?;
        info!("pushed {} to {remote}", refspecs.join(" "));
        Ok(())
    }
}
