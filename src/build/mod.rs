// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Maven build descriptor access.
//!
//! ```text
//! BuildClient (trait)
//!   evaluate / project_version     help:evaluate -q -DforceStdout
//!   set_version                    versions:set
//!   set_property                   versions:set-property
//!   verify_dependencies            dependency:tree
//!   build / run_goals              clean install, verify -P...
//!        |
//!        v
//!   MavenClient --> core::process::ProcessBuilder("mvn -B ...")
//! ```
//!
//! The version in `pom.xml` is authoritative: callers re-read it after every
//! mutation instead of caching it.

use crate::core::process::builder::{ProcessBuilder, ProcessOutput};
use crate::error::{BoosterResult, BuildError, bail_out};
use futures_util::future::BoxFuture;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Expression holding the project version.
pub const PROJECT_VERSION: &str = "project.version";

/// Build tool operations used by the workflows.
pub trait BuildClient: Send + Sync {
    /// Evaluate a Maven expression such as `project.version`.
    fn evaluate<'a>(&'a self, repo: &'a Path, expression: &'a str)
    -> BoxFuture<'a, BoosterResult<String>>;

    fn set_version<'a>(&'a self, repo: &'a Path, version: &'a str)
    -> BoxFuture<'a, BoosterResult<()>>;

    fn set_property<'a>(
        &'a self,
        repo: &'a Path,
        name: &'a str,
        value: &'a str,
    ) -> BoxFuture<'a, BoosterResult<()>>;

    /// Resolve the full dependency graph; fails on unresolvable dependencies.
    fn verify_dependencies<'a>(&'a self, repo: &'a Path) -> BoxFuture<'a, BoosterResult<()>>;

    /// `clean install`, optionally skipping tests.
    fn build<'a>(&'a self, repo: &'a Path, skip_tests: bool) -> BoxFuture<'a, BoosterResult<()>>;

    /// Run arbitrary goals and flags.
    fn run_goals<'a>(&'a self, repo: &'a Path, goals: &'a [String])
    -> BoxFuture<'a, BoosterResult<()>>;

    fn project_version<'a>(&'a self, repo: &'a Path) -> BoxFuture<'a, BoosterResult<String>> {
        self.evaluate(repo, PROJECT_VERSION)
    }
}

/// `mvn` driven through the process runner.
#[derive(Debug, Clone)]
pub struct MavenClient {
    program: PathBuf,
    cancel: CancellationToken,
}

impl MavenClient {
    pub fn new(program: impl Into<PathBuf>, cancel: CancellationToken) -> Self {
        Self {
            program: program.into(),
            cancel,
        }
    }

    async fn mvn<I, S>(&self, repo: &Path, goal: &str, args: I) -> BoosterResult<ProcessOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let output = ProcessBuilder::new(&self.program)
            .label("mvn")
            .arg("-B")
            .args(args)
            .cwd(repo)
            .capture()
            .run(&self.cancel)
            .await
            .map_err(|e| BuildError::CommandFailed {
                goal: goal.to_string(),
                message: format!("{e:#}"),
            })?;

        if output.is_interrupted() {
            return Err(bail_out(format!("mvn {goal} interrupted")));
        }
        Ok(output)
    }
}

/// Extract the value printed by `help:evaluate -q -DforceStdout`.
pub(crate) fn parse_evaluated(expression: &str, stdout: &str) -> BoosterResult<String> {
    let value = stdout
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .unwrap_or_default();

    if value.is_empty() || value == "null object or invalid expression" || value.starts_with("[ERROR]") {
        return Err(BuildError::PropertyNotFound {
            expression: expression.to_string(),
        }
        .into());
    }
    Ok(value.to_string())
}

impl BuildClient for MavenClient {
    fn evaluate<'a>(
        &'a self,
        repo: &'a Path,
        expression: &'a str,
    ) -> BoxFuture<'a, BoosterResult<String>> {
        Box::pin(async move {
            let output = self
                .mvn(
                    repo,
                    "help:evaluate",
                    [
                        "help:evaluate".to_string(),
                        format!("-Dexpression={expression}"),
                        "-q".to_string(),
                        "-DforceStdout".to_string(),
                    ],
                )
                .await?;
            let value = parse_evaluated(expression, output.stdout())?;
            debug!(expression, value = %value, "evaluated");
            Ok(value)
        })
    }

    fn set_version<'a>(
        &'a self,
        repo: &'a Path,
        version: &'a str,
    ) -> BoxFuture<'a, BoosterResult<()>> {
        Box::pin(async move {
            self.mvn(
                repo,
                "versions:set",
                [
                    "versions:set".to_string(),
                    format!("-DnewVersion={version}"),
                    "-DgenerateBackupPoms=false".to_string(),
                ],
            )
            .await?;
            Ok(())
        })
    }

    fn set_property<'a>(
        &'a self,
        repo: &'a Path,
        name: &'a str,
        value: &'a str,
    ) -> BoxFuture<'a, BoosterResult<()>> {
        Box::pin(async move {
            self.mvn(
                repo,
                "versions:set-property",
                [
                    "versions:set-property".to_string(),
                    format!("-Dproperty={name}"),
                    format!("-DnewVersion={value}"),
                    "-DgenerateBackupPoms=false".to_string(),
                ],
            )
            .await?;
            Ok(())
        })
    }

    fn verify_dependencies<'a>(&'a self, repo: &'a Path) -> BoxFuture<'a, BoosterResult<()>> {
        Box::pin(async move {
            self.mvn(repo, "dependency:tree", ["dependency:tree"])
                .await
                .map_err(|e| BuildError::DependencyProblems {
                    message: e.to_string(),
                })?;
            Ok(())
        })
    }

    fn build<'a>(&'a self, repo: &'a Path, skip_tests: bool) -> BoxFuture<'a, BoosterResult<()>> {
        Box::pin(async move {
            let mut args = vec!["clean", "install"];
            if skip_tests {
                args.push("-DskipTests");
            }
            self.mvn(repo, "clean install", args).await?;
            Ok(())
        })
    }

    fn run_goals<'a>(
        &'a self,
        repo: &'a Path,
        goals: &'a [String],
    ) -> BoxFuture<'a, BoosterResult<()>> {
        Box::pin(async move {
            self.mvn(repo, &goals.join(" "), goals).await?;
            Ok(())
        })
    }
}
