// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! What an operation handler gets to work with.
//!
//! ```text
//! Services     external collaborators, shared by every pair
//!   git / build / catalog / platform / confirm / cancel
//!
//! RepoContext  one (repository, branch) pair plus the run configuration
//! ```

use crate::build::BuildClient;
use crate::config::Config;
use crate::confirm::Confirm;
use crate::fleet::Repository;
use crate::git::{Publisher, RepositoryClient};
use crate::net::CatalogSource;
use crate::platform::PlatformClient;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// External collaborators.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub git: &'a dyn RepositoryClient,
    pub build: &'a dyn BuildClient,
    pub catalog: &'a dyn CatalogSource,
    pub platform: &'a dyn PlatformClient,
    pub confirm: &'a dyn Confirm,
    /// Cancelled on Ctrl-C; passed to spawned processes.
    pub cancel: &'a CancellationToken,
}

/// The pair an operation runs against.
#[derive(Clone, Copy)]
pub struct RepoContext<'a> {
    pub repository: &'a Repository,
    pub branch: &'a str,
    pub config: &'a Config,
}

impl<'a> RepoContext<'a> {
    #[must_use]
    pub const fn new(repository: &'a Repository, branch: &'a str, config: &'a Config) -> Self {
        Self {
            repository,
            branch,
            config,
        }
    }

    /// Working copy root.
    #[must_use]
    pub fn path(&self) -> &'a Path {
        &self.repository.path
    }

    #[must_use]
    pub const fn dry_run(&self) -> bool {
        self.config.global.dry
    }

    #[must_use]
    pub fn remote(&self) -> &'a str {
        &self.config.fleet.remote
    }

    /// `<remote>/<branch>`.
    #[must_use]
    pub fn upstream(&self) -> String {
        format!("{}/{}", self.remote(), self.branch)
    }

    /// History writer honouring the dry-run switch.
    #[must_use]
    pub fn publisher(&self, git: &'a dyn RepositoryClient) -> Publisher<'a> {
        Publisher::new(git, self.path(), self.dry_run())
    }
}
