// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! RepositoryClient (trait, &dyn-friendly)
//!        |
//!        v
//!     ShellGit
//!     reads:  gix  (is_repository, current_branch)
//!     writes: git CLI (fetch, checkout, commit, tag, push, ...)
//! ```

use crate::error::{BoosterResult, GitError, GixError};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Changed paths reported by `git status --porcelain`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingTreeStatus {
    changed: Vec<String>,
}

impl WorkingTreeStatus {
    #[must_use]
    pub const fn new(changed: Vec<String>) -> Self {
        Self { changed }
    }

    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.changed.is_empty()
    }

    /// Paths with staged, unstaged or untracked changes.
    #[must_use]
    pub fn changed(&self) -> &[String] {
        &self.changed
    }

    fn from_porcelain(output: &str) -> Self {
        let changed = output
            .lines()
            .filter_map(|line| line.get(3..))
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty())
            .collect();
        Self { changed }
    }
}

/// Everything the tool asks of a git working copy.
///
/// `repo` is always the root of a working copy.
pub trait RepositoryClient: Send + Sync {
    /// Whether `path` is the root of a git working copy.
    fn is_repository(&self, path: &Path) -> bool;

    /// Clone `url` into `dest`; the parent directory must exist.
    ///
    /// # Errors
    ///
    /// Returns `GitError::CloneFailed` if git fails.
    fn clone_repo(&self, url: &str, dest: &Path) -> BoosterResult<()>;

    /// Current branch name, `None` when HEAD is detached.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be opened.
    fn current_branch(&self, repo: &Path) -> BoosterResult<Option<String>>;

    /// # Errors
    ///
    /// Returns a `GitError` if git fails.
    fn status(&self, repo: &Path) -> BoosterResult<WorkingTreeStatus>;

    /// Fetch branches and tags, pruning deleted remote branches.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git fails.
    fn fetch(&self, repo: &Path, remote: &str) -> BoosterResult<()>;

    /// # Errors
    ///
    /// Returns a `GitError` if git cannot be run.
    fn local_branch_exists(&self, repo: &Path, branch: &str) -> BoosterResult<bool>;

    /// Whether `refs/remotes/<remote>/<branch>` exists after the last fetch.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git cannot be run.
    fn remote_tracking_exists(&self, repo: &Path, remote: &str, branch: &str)
    -> BoosterResult<bool>;

    /// Whether the remote itself advertises `refname` (asks the server).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the remote cannot be queried.
    fn remote_has_ref(&self, repo: &Path, remote: &str, refname: &str) -> BoosterResult<bool>;

    /// Create `name` at `start_point` without checking it out.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git fails.
    fn create_branch(&self, repo: &Path, name: &str, start_point: &str) -> BoosterResult<()>;

    /// Create a local `branch` tracking `<remote>/<branch>`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git fails.
    fn create_tracking_branch(&self, repo: &Path, branch: &str, remote: &str)
    -> BoosterResult<()>;

    /// # Errors
    ///
    /// Returns a `GitError` if git fails.
    fn checkout(&self, repo: &Path, what: &str) -> BoosterResult<()>;

    /// Force-delete a local branch.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git fails.
    fn delete_branch(&self, repo: &Path, name: &str) -> BoosterResult<()>;

    /// Rebase the current branch onto `onto`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git fails (the rebase is aborted first).
    fn rebase(&self, repo: &Path, onto: &str) -> BoosterResult<()>;

    /// # Errors
    ///
    /// Returns a `GitError` if git fails.
    fn reset_hard(&self, repo: &Path, target: &str) -> BoosterResult<()>;

    /// Remove untracked and ignored files.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git fails.
    fn clean(&self, repo: &Path) -> BoosterResult<()>;

    /// Stage everything and commit. Returns `false` when there was nothing to commit.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git fails.
    fn commit_all(&self, repo: &Path, message: &str) -> BoosterResult<bool>;

    /// # Errors
    ///
    /// Returns a `GitError` if git cannot be run.
    fn tag_exists(&self, repo: &Path, tag: &str) -> BoosterResult<bool>;

    /// Create an annotated tag at HEAD.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git fails.
    fn create_tag(&self, repo: &Path, tag: &str, message: &str) -> BoosterResult<()>;

    /// # Errors
    ///
    /// Returns a `GitError` if git fails.
    fn delete_tag(&self, repo: &Path, tag: &str) -> BoosterResult<()>;

    /// Tags matching a `git tag --list` pattern.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git fails.
    fn list_tags(&self, repo: &Path, pattern: &str) -> BoosterResult<Vec<String>>;

    /// Push `refspecs` to `remote`, optionally recording upstream tracking.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git fails.
    fn push(
        &self,
        repo: &Path,
        remote: &str,
        refspecs: &[String],
        set_upstream: bool,
    ) -> BoosterResult<()>;

    /// Delete `refname` on `remote`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git fails.
    fn push_delete(&self, repo: &Path, remote: &str, refname: &str) -> BoosterResult<()>;
}

/// Git CLI backend, with gix for cheap reads.
#[derive(Debug, Clone)]
pub struct ShellGit {
    program: PathBuf,
}

impl Default for ShellGit {
    fn default() -> Self {
        Self::new("git")
    }
}

impl ShellGit {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Runs git with prompts disabled.
    fn output(&self, args: &[&str], cwd: &Path) -> BoosterResult<Output> {
        debug!(cwd = %cwd.display(), cmd = %format!("git {}", args.join(" ")), "exec");
        Command::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|e| std::io::Error::new(e.kind(), format!("failed to execute git: {e}")).into())
    }

    /// Runs git and returns stdout, failing on a non-zero exit.
    fn git(&self, args: &[&str], cwd: &Path) -> BoosterResult<String> {
        let output = self.output(args, cwd)?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Runs a git query whose answer is its exit status.
    fn git_succeeds(&self, args: &[&str], cwd: &Path) -> BoosterResult<bool> {
        Ok(self.output(args, cwd)?.status.success())
    }

    fn open(path: &Path) -> BoosterResult<gix::Repository> {
        gix::open(path).map_err(|e| GitError::Gix(GixError::Open(Box::new(e))).into())
    }
}

impl RepositoryClient for ShellGit {
    fn is_repository(&self, path: &Path) -> bool {
        gix::open(path).is_ok_and(|repo| repo.workdir().is_some())
    }

    fn clone_repo(&self, url: &str, dest: &Path) -> BoosterResult<()> {
        let clone_failed = |message: String| GitError::CloneFailed {
            url: url.to_string(),
            message,
        };
        let dest_str = dest
            .to_str()
            .ok_or_else(|| clone_failed("invalid destination path".to_string()))?;
        let parent = dest.parent().unwrap_or_else(|| Path::new("."));

        self.git(&["clone", "--quiet", url, dest_str], parent)
            .map_err(|e| clone_failed(e.to_string()))?;
        Ok(())
    }

    fn current_branch(&self, repo: &Path) -> BoosterResult<Option<String>> {
        let repo = Self::open(repo)?;
        let head = repo
            .head_name()
            .map_err(|e| GitError::Gix(GixError::Head(e)))?;
        Ok(head.map(|name| name.shorten().to_string()))
    }

    fn status(&self, repo: &Path) -> BoosterResult<WorkingTreeStatus> {
        let output = self.git(&["status", "--porcelain"], repo)?;
        Ok(WorkingTreeStatus::from_porcelain(&output))
    }

    fn fetch(&self, repo: &Path, remote: &str) -> BoosterResult<()> {
        self.git(&["fetch", "--quiet", "--tags", "--prune", remote], repo)?;
        Ok(())
    }

    fn local_branch_exists(&self, repo: &Path, branch: &str) -> BoosterResult<bool> {
        let refname = format!("refs/heads/{branch}");
        self.git_succeeds(&["show-ref", "--verify", "--quiet", &refname], repo)
    }

    fn remote_tracking_exists(
        &self,
        repo: &Path,
        remote: &str,
        branch: &str,
    ) -> BoosterResult<bool> {
        let refname = format!("refs/remotes/{remote}/{branch}");
        self.git_succeeds(&["show-ref", "--verify", "--quiet", &refname], repo)
    }

    fn remote_has_ref(&self, repo: &Path, remote: &str, refname: &str) -> BoosterResult<bool> {
        let output = self.output(&["ls-remote", "--exit-code", remote, refname], repo)?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(2) => Ok(false),
            _ => Err(GitError::CommandFailed {
                command: format!("git ls-remote {remote} {refname}"),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into()),
        }
    }

    fn create_branch(&self, repo: &Path, name: &str, start_point: &str) -> BoosterResult<()> {
        self.git(&["branch", "--no-track", name, start_point], repo)?;
        Ok(())
    }

    fn create_tracking_branch(
        &self,
        repo: &Path,
        branch: &str,
        remote: &str,
    ) -> BoosterResult<()> {
        let upstream = format!("{remote}/{branch}");
        self.git(&["branch", "--track", branch, &upstream], repo)?;
        Ok(())
    }

    fn checkout(&self, repo: &Path, what: &str) -> BoosterResult<()> {
        self.git(
            &["-c", "advice.detachedHead=false", "checkout", "-q", what],
            repo,
        )?;
        Ok(())
    }

    fn delete_branch(&self, repo: &Path, name: &str) -> BoosterResult<()> {
        self.git(&["branch", "-q", "-D", name], repo)?;
        Ok(())
    }

    fn rebase(&self, repo: &Path, onto: &str) -> BoosterResult<()> {
        if let Err(e) = self.git(&["rebase", "-q", onto], repo) {
            let _ = self.output(&["rebase", "--abort"], repo);
            return Err(e);
        }
        Ok(())
    }

    fn reset_hard(&self, repo: &Path, target: &str) -> BoosterResult<()> {
        self.git(&["reset", "-q", "--hard", target], repo)?;
        Ok(())
    }

    fn clean(&self, repo: &Path) -> BoosterResult<()> {
        self.git(&["clean", "-q", "-fdx"], repo)?;
        Ok(())
    }

    fn commit_all(&self, repo: &Path, message: &str) -> BoosterResult<bool> {
        self.git(&["add", "-A"], repo)?;
        if self.git_succeeds(&["diff", "--cached", "--quiet"], repo)? {
            return Ok(false);
        }
        self.git(&["commit", "-q", "-m", message], repo)?;
        Ok(true)
    }

    fn tag_exists(&self, repo: &Path, tag: &str) -> BoosterResult<bool> {
        let refname = format!("refs/tags/{tag}");
        self.git_succeeds(&["show-ref", "--verify", "--quiet", &refname], repo)
    }

    fn create_tag(&self, repo: &Path, tag: &str, message: &str) -> BoosterResult<()> {
        self.git(&["tag", "-a", tag, "-m", message], repo)?;
        Ok(())
    }

    fn delete_tag(&self, repo: &Path, tag: &str) -> BoosterResult<()> {
        self.git(&["tag", "-d", tag], repo)?;
        Ok(())
    }

    fn list_tags(&self, repo: &Path, pattern: &str) -> BoosterResult<Vec<String>> {
        let output = self.git(&["tag", "--list", pattern], repo)?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    fn push(
        &self,
        repo: &Path,
        remote: &str,
        refspecs: &[String],
        set_upstream: bool,
    ) -> BoosterResult<()> {
        let mut args = vec!["push", "--quiet"];
        if set_upstream {
            args.push("--set-upstream");
        }
        args.push(remote);
        args.extend(refspecs.iter().map(String::as_str));
        self.git(&args, repo)?;
        Ok(())
    }

    fn push_delete(&self, repo: &Path, remote: &str, refname: &str) -> BoosterResult<()> {
        self.git(&["push", "--quiet", "--delete", remote, refname], repo)?;
        Ok(())
    }
}
