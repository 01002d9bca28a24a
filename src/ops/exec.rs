// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::OperationStatus;
use crate::context::{RepoContext, Services};
use crate::core::process::builder::ProcessBuilder;
use crate::error::{Result, bail_out};
use std::path::Path;

async fn run(builder: ProcessBuilder, services: &Services<'_>) -> Result<OperationStatus> {
    let output = builder.run(services.cancel).await?;
    if output.is_interrupted() {
        return Err(bail_out("interrupted").into());
    }
    Ok(OperationStatus::Done(None))
}

pub(super) async fn command(
    ctx: &RepoContext<'_>,
    services: &Services<'_>,
    command: &str,
) -> Result<OperationStatus> {
    let builder = ProcessBuilder::shell(command).label("cmd").cwd(ctx.path());
    run(builder, services).await
}

/// Run `path` in the working copy with the pair exported as
/// `BOOSTER_NAME`, `BOOSTER_BRANCH` and `BOOSTER_REPO_DIR`.
pub(super) async fn script(
    ctx: &RepoContext<'_>,
    services: &Services<'_>,
    path: &Path,
) -> Result<OperationStatus> {
    let script = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let builder = ProcessBuilder::new(&script)
        .cwd(ctx.path())
        .env("BOOSTER_NAME", ctx.repository.name.as_str())
        .env("BOOSTER_BRANCH", ctx.branch)
        .env("BOOSTER_REPO_DIR", ctx.path().display().to_string());
    run(builder, services).await
}
