// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::OperationStatus;
use crate::confirm::Decision;
use crate::context::{RepoContext, Services};
use crate::error::Result;
use tracing::info;

pub(super) fn create_branch(
    ctx: &RepoContext<'_>,
    services: &Services<'_>,
    name: &str,
) -> Result<OperationStatus> {
    let repo = ctx.path();
    let git = services.git;
    if git.local_branch_exists(repo, name)? || git.remote_tracking_exists(repo, ctx.remote(), name)? {
        return Ok(OperationStatus::Skipped(format!("branch {name} already exists")));
    }

    if ctx.dry_run() {
        info!("[DRY-RUN] would create {name} from {} and push it", ctx.branch);
        return Ok(OperationStatus::Done(None));
    }

    git.create_branch(repo, name, ctx.branch)?;
    git.push(repo, ctx.remote(), &[name.to_string()], true)?;
    info!(repo = %ctx.repository.short_name, "created {name} from {}", ctx.branch);
    Ok(OperationStatus::Done(Some(format!("created {name}"))))
}

pub(super) fn delete_branch(
    ctx: &RepoContext<'_>,
    services: &Services<'_>,
    name: &str,
) -> Result<OperationStatus> {
    let repo = ctx.path();
    let git = services.git;
    let local = git.local_branch_exists(repo, name)?;
    let remote = git.remote_tracking_exists(repo, ctx.remote(), name)?;
    if !local && !remote {
        return Ok(OperationStatus::Skipped(format!("branch {name} does not exist")));
    }
    if name == ctx.branch {
        return Ok(OperationStatus::Skipped(format!("{name} is the branch being processed")));
    }

    let action = format!(
        "delete branch {name} of {} locally and on {}",
        ctx.repository.name,
        ctx.remote()
    );
    if services.confirm.confirm(&action)? == Decision::No {
        return Ok(OperationStatus::Aborted);
    }

    if ctx.dry_run() {
        info!("[DRY-RUN] would {action}");
        return Ok(OperationStatus::Done(None));
    }
    if local {
        git.delete_branch(repo, name)?;
    }
    if remote {
        git.push_delete(repo, ctx.remote(), name)?;
    }
    Ok(OperationStatus::Done(Some(format!("deleted {name}"))))
}

pub(super) fn delete_tag(
    ctx: &RepoContext<'_>,
    services: &Services<'_>,
    tag: &str,
) -> Result<OperationStatus> {
    let repo = ctx.path();
    let git = services.git;
    let refname = format!("refs/tags/{tag}");
    let local = git.tag_exists(repo, tag)?;
    let remote = git.remote_has_ref(repo, ctx.remote(), &refname)?;
    if !local && !remote {
        return Ok(OperationStatus::Skipped(format!("tag {tag} does not exist")));
    }

    let action = format!(
        "delete tag {tag} of {} locally and on {}",
        ctx.repository.name,
        ctx.remote()
    );
    if services.confirm.confirm(&action)? == Decision::No {
        return Ok(OperationStatus::Aborted);
    }

    if ctx.dry_run() {
        info!("[DRY-RUN] would {action}");
        return Ok(OperationStatus::Done(None));
    }
    if local {
        git.delete_tag(repo, tag)?;
    }
    if remote {
        git.push_delete(repo, ctx.remote(), &refname)?;
    }
    Ok(OperationStatus::Done(Some(format!("deleted tag {tag}"))))
}

/// Hard reset to the remote branch and remove untracked files. Runs in dry
/// runs too: it is how a dry run's file edits are undone.
pub(super) fn revert(ctx: &RepoContext<'_>, services: &Services<'_>) -> Result<OperationStatus> {
    let upstream = ctx.upstream();
    let action = format!(
        "reset {} ({}) to {upstream} and remove untracked files",
        ctx.repository.name, ctx.branch
    );
    if services.confirm.confirm(&action)? == Decision::No {
        return Ok(OperationStatus::Aborted);
    }

    services.git.reset_hard(ctx.path(), &upstream)?;
    services.git.clean(ctx.path())?;
    Ok(OperationStatus::Done(None))
}
