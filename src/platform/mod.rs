// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Container platform access for integration tests.
//!
//! ```text
//! PlatformClient (trait)            OcClient ("oc ...")
//!   new_project(p)                    new-project p
//!   delete_project(p)                 delete project p
//!   apply_template(repo, file, p)     process -f file | apply
//!   start_build(repo, name, p)        start-build name --from-dir=. --follow
//!   ready_pods(p, selector)           get pods -l selector -o jsonpath=ready
//!
//! wait_for_ready(): poll ready_pods every interval until > 0 or timeout
//! ```

use crate::core::process::builder::ProcessBuilder;
use crate::error::{BoosterResult, ProcessError, bail_out};
use futures_util::future::BoxFuture;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub trait PlatformClient: Send + Sync {
    fn new_project<'a>(&'a self, project: &'a str) -> BoxFuture<'a, BoosterResult<()>>;

    fn delete_project<'a>(&'a self, project: &'a str) -> BoxFuture<'a, BoosterResult<()>>;

    /// Process the template `file` and apply the result in `project`.
    fn apply_template<'a>(
        &'a self,
        repo: &'a Path,
        file: &'a Path,
        project: &'a str,
    ) -> BoxFuture<'a, BoosterResult<()>>;

    /// Start a binary build of `name` from the working copy and follow it.
    fn start_build<'a>(
        &'a self,
        repo: &'a Path,
        name: &'a str,
        project: &'a str,
    ) -> BoxFuture<'a, BoosterResult<()>>;

    /// Number of ready pods matching `selector`.
    fn ready_pods<'a>(
        &'a self,
        project: &'a str,
        selector: &'a str,
    ) -> BoxFuture<'a, BoosterResult<usize>>;
}

/// `oc` driven through the process runner.
#[derive(Debug, Clone)]
pub struct OcClient {
    program: PathBuf,
    cancel: CancellationToken,
}

impl OcClient {
    pub fn new(program: impl Into<PathBuf>, cancel: CancellationToken) -> Self {
        Self {
            program: program.into(),
            cancel,
        }
    }

    fn oc(&self) -> ProcessBuilder {
        ProcessBuilder::new(&self.program).label("oc").capture()
    }

    async fn run(&self, builder: ProcessBuilder) -> BoosterResult<String> {
        let output = builder
            .run(&self.cancel)
            .await
            .map_err(|e| bail_out(format!("{e:#}")))?;
        if output.is_interrupted() {
            return Err(bail_out("oc interrupted"));
        }
        Ok(output.stdout().to_string())
    }
}

/// Count `true` entries in the jsonpath output of container readiness.
pub(crate) fn count_ready(jsonpath: &str) -> usize {
    jsonpath
        .split_whitespace()
        .filter(|status| *status == "true")
        .count()
}

impl PlatformClient for OcClient {
    fn new_project<'a>(&'a self, project: &'a str) -> BoxFuture<'a, BoosterResult<()>> {
        Box::pin(async move {
            self.run(self.oc().args(["new-project", project])).await?;
            Ok(())
        })
    }

    fn delete_project<'a>(&'a self, project: &'a str) -> BoxFuture<'a, BoosterResult<()>> {
        Box::pin(async move {
            self.run(self.oc().args(["delete", "project", project, "--wait=false"]))
                .await?;
            Ok(())
        })
    }

    fn apply_template<'a>(
        &'a self,
        repo: &'a Path,
        file: &'a Path,
        project: &'a str,
    ) -> BoxFuture<'a, BoosterResult<()>> {
        Box::pin(async move {
            let processed = self
                .run(
                    self.oc()
                        .args(["process", "-n", project, "-f"])
                        .arg(file)
                        .cwd(repo),
                )
                .await?;
            self.run(
                self.oc()
                    .args(["apply", "-n", project, "-f", "-"])
                    .stdin(processed)
                    .cwd(repo),
            )
            .await?;
            Ok(())
        })
    }

    fn start_build<'a>(
        &'a self,
        repo: &'a Path,
        name: &'a str,
        project: &'a str,
    ) -> BoxFuture<'a, BoosterResult<()>> {
        Box::pin(async move {
            self.run(
                self.oc()
                    .args(["start-build", name, "-n", project, "--from-dir=.", "--follow"])
                    .cwd(repo),
            )
            .await?;
            Ok(())
        })
    }

    fn ready_pods<'a>(
        &'a self,
        project: &'a str,
        selector: &'a str,
    ) -> BoxFuture<'a, BoosterResult<usize>> {
        Box::pin(async move {
            let out = self
                .run(self.oc().args([
                    "get",
                    "pods",
                    "-n",
                    project,
                    "-l",
                    selector,
                    "-o",
                    "jsonpath={.items[*].status.containerStatuses[*].ready}",
                ]))
                .await?;
            Ok(count_ready(&out))
        })
    }
}

/// Poll until at least one pod matching `selector` is ready.
///
/// # Errors
///
/// Returns `ProcessError::Timeout` when nothing becomes ready within
/// `timeout`, or the first error from the platform.
pub async fn wait_for_ready(
    platform: &dyn PlatformClient,
    project: &str,
    selector: &str,
    interval: Duration,
    timeout: Duration,
) -> BoosterResult<()> {
    let deadline = Instant::now() + timeout;
    loop {
        let ready = platform.ready_pods(project, selector).await?;
        debug!(project, selector, ready, "polled readiness");
        if ready > 0 {
            info!(project, "deployment ready");
            return Ok(());
        }
        if Instant::now() + interval > deadline {
            return Err(ProcessError::Timeout {
                command: format!("wait for {selector} in {project}"),
                timeout_secs: timeout.as_secs(),
            }
            .into());
        }
        tokio::time::sleep(interval).await;
    }
}
