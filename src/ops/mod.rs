// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Operations applied to every (repository, branch) pair.
//!
//! ```text
//! Operation                      handler
//!   Release                        release::release
//!   ProdTag                        release::prod_tag::run
//!   ChangeVersion / SetMavenProperty     version.rs
//!   CreateBranch / DeleteBranch / DeleteTag / Revert   branch.rs
//!   Command / Script               exec.rs
//!   RunIntegrationTests / RunSmokeTests  testing.rs
//!
//! `fn <name>` resolves through FUNCTIONS (parameterless operations only)
//! ```

mod branch;
mod exec;
mod testing;
mod version;

use crate::cli::DeploymentKind;
use crate::context::{RepoContext, Services};
use crate::error::{ConfigError, Result};
use crate::git::Publisher;
use crate::release;
use std::path::PathBuf;

/// Names accepted by `fn`.
pub const FUNCTIONS: &[&str] = &[
    "release",
    "prod_tag",
    "change_version",
    "revert",
    "run_smoke_tests",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Release,
    ProdTag,
    /// Explicit version, or the next revision of the current one.
    ChangeVersion { version: Option<String> },
    RunIntegrationTests { deployment: DeploymentKind },
    RunSmokeTests,
    CreateBranch { name: String },
    DeleteBranch { name: String },
    DeleteTag { tag: String },
    /// Shell command run through `/bin/sh -c`.
    Command { command: String },
    Revert,
    SetMavenProperty { name: String, value: String },
    Script { path: PathBuf },
}

/// How a handler finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    /// Work was done; the note ends up in the summary.
    Done(Option<String>),
    /// Nothing to do for this pair.
    Skipped(String),
    /// The operator declined the confirmation.
    Aborted,
}

impl Operation {
    /// Resolve a `fn` name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownFunction` for names outside [`FUNCTIONS`].
    pub fn from_name(name: &str) -> std::result::Result<Self, ConfigError> {
        match name {
            "release" => Ok(Self::Release),
            "prod_tag" => Ok(Self::ProdTag),
            "change_version" => Ok(Self::ChangeVersion { version: None }),
            "revert" => Ok(Self::Revert),
            "run_smoke_tests" => Ok(Self::RunSmokeTests),
            _ => Err(ConfigError::UnknownFunction {
                name: name.to_string(),
                known: FUNCTIONS.join(", "),
            }),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::ProdTag => "prod_tag",
            Self::ChangeVersion { .. } => "change_version",
            Self::RunIntegrationTests { .. } => "run_integration_tests",
            Self::RunSmokeTests => "run_smoke_tests",
            Self::CreateBranch { .. } => "create_branch",
            Self::DeleteBranch { .. } => "delete_branch",
            Self::DeleteTag { .. } => "delete_tag",
            Self::Command { .. } => "cmd",
            Self::Revert => "revert",
            Self::SetMavenProperty { .. } => "set_maven_property",
            Self::Script { .. } => "script",
        }
    }

    /// Whether the handler shells out to Maven.
    #[must_use]
    pub const fn needs_maven(&self) -> bool {
        matches!(
            self,
            Self::Release
                | Self::ProdTag
                | Self::ChangeVersion { .. }
                | Self::RunIntegrationTests { .. }
                | Self::RunSmokeTests
                | Self::SetMavenProperty { .. }
        )
    }

    #[must_use]
    pub const fn needs_platform(&self) -> bool {
        matches!(self, Self::RunIntegrationTests { .. })
    }

    /// Run against one checked-out pair.
    ///
    /// # Errors
    ///
    /// Any failure of the handler; the loop records it against the pair.
    pub async fn run(
        &self,
        ctx: &RepoContext<'_>,
        services: &Services<'_>,
    ) -> Result<OperationStatus> {
        match self {
            Self::Release => {
                let released = release::release(ctx, services).await?;
                Ok(OperationStatus::Done(Some(format!("released {released}"))))
            }
            Self::ProdTag => {
                let tag = release::prod_tag::run(ctx, services).await?;
                Ok(OperationStatus::Done(Some(format!("tagged {tag}"))))
            }
            Self::ChangeVersion { version } => {
                version::change_version(ctx, services, version.as_deref()).await
            }
            Self::SetMavenProperty { name, value } => {
                version::set_maven_property(ctx, services, name, value).await
            }
            Self::RunIntegrationTests { deployment } => {
                testing::integration_tests(ctx, services, *deployment).await
            }
            Self::RunSmokeTests => testing::smoke_tests(ctx, services).await,
            Self::CreateBranch { name } => branch::create_branch(ctx, services, name),
            Self::DeleteBranch { name } => branch::delete_branch(ctx, services, name),
            Self::DeleteTag { tag } => branch::delete_tag(ctx, services, tag),
            Self::Revert => branch::revert(ctx, services),
            Self::Command { command } => exec::command(ctx, services, command).await,
            Self::Script { path } => exec::script(ctx, services, path).await,
        }
    }
}

/// Push the processed branch when something was committed (or announce it in a dry run).
fn push_if_changed(ctx: &RepoContext<'_>, publisher: &Publisher<'_>) -> Result<()> {
    if publisher.has_changes() || publisher.is_dry_run() {
        publisher.push_branch(ctx.remote(), ctx.branch)?;
    }
    Ok(())
}
