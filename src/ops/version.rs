// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{OperationStatus, push_if_changed};
use crate::context::{RepoContext, Services};
use crate::error::Result;
use crate::version::Version;
use tracing::info;

pub(super) async fn change_version(
    ctx: &RepoContext<'_>,
    services: &Services<'_>,
    explicit: Option<&str>,
) -> Result<OperationStatus> {
    let repo = ctx.path();
    let current = services.build.project_version(repo).await?;
    let target = match explicit {
        Some(raw) => Version::parse(raw)?,
        None => Version::parse(&current)?.next_revision()?,
    }
    .to_string();

    if target == current {
        return Ok(OperationStatus::Skipped(format!("already at {target}")));
    }

    services.build.set_version(repo, &target).await?;
    let mut publisher = ctx.publisher(services.git);
    publisher.commit(&format!("Update version to {target}"))?;
    push_if_changed(ctx, &publisher)?;

    info!(repo = %ctx.repository.short_name, branch = %ctx.branch, "{current} -> {target}");
    Ok(OperationStatus::Done(Some(format!("{current} -> {target}"))))
}

pub(super) async fn set_maven_property(
    ctx: &RepoContext<'_>,
    services: &Services<'_>,
    name: &str,
    value: &str,
) -> Result<OperationStatus> {
    let repo = ctx.path();
    let current = services.build.evaluate(repo, name).await.ok();
    if current.as_deref() == Some(value) {
        return Ok(OperationStatus::Skipped(format!("{name} already {value}")));
    }

    services.build.set_property(repo, name, value).await?;
    let mut publisher = ctx.publisher(services.git);
    publisher.commit(&format!("Set {name} to {value}"))?;
    push_if_changed(ctx, &publisher)?;
    Ok(OperationStatus::Done(Some(format!("{name} = {value}"))))
}
