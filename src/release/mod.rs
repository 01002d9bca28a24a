// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Release workflow.
//!
//! ```text
//! Verifying        mvn dependency:tree
//!     |
//! VersionGate      X-n[-q]-SNAPSHOT, q allowed, newer than latest tag, tag free
//!     |
//! TemplateGate     @token@ -> X-n in templates, commit   (skipped without templates)
//!     |
//! Tagging          set X-n, commit, tag X-n
//!     |
//! TemplateRestore  templates back to @token@, commit
//!     |
//! NextVersionBump  set X-(n+1)[-q]-SNAPSHOT, commit
//!     |
//! ProdTagging      prod_tag::create(base)   (see prod_tag.rs)
//!     |
//! Done             push branch + every tag in one batch
//! ```
//!
//! There is no rollback: a failure leaves the local commits and tags made so
//! far in place, unpushed, and `revert` restores the branch.

pub mod prod_tag;
pub mod templates;

use crate::context::{RepoContext, Services};
use crate::error::{ReleaseError, Result};
use crate::git::Publisher;
use crate::version::{Version, latest_upstream};
use anyhow::Context;
use std::fmt;
use templates::TemplateSet;
use tracing::info;

/// Steps of the release, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseStage {
    Verifying,
    VersionGate,
    TemplateGate,
    Tagging,
    TemplateRestore,
    NextVersionBump,
    ProdTagging,
    Done,
}

impl fmt::Display for ReleaseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Verifying => "verifying",
            Self::VersionGate => "version gate",
            Self::TemplateGate => "template gate",
            Self::Tagging => "tagging",
            Self::TemplateRestore => "template restore",
            Self::NextVersionBump => "next version bump",
            Self::ProdTagging => "prod tagging",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

fn failed_at(stage: ReleaseStage) -> impl FnOnce() -> String {
    move || format!("release failed at {stage}")
}

/// Check the declared version can be released and return it.
async fn version_gate(ctx: &RepoContext<'_>, services: &Services<'_>) -> Result<Version> {
    let repo = ctx.path();
    let raw = services.build.project_version(repo).await?;
    if !raw.ends_with("-SNAPSHOT") {
        return Err(ReleaseError::NotSnapshot { version: raw }.into());
    }
    let current = Version::parse(&raw)?;

    let allowed = &ctx.config.release.allowed_qualifiers;
    if let Some(qualifier) = current.qualifier()
        && !allowed.iter().any(|a| a == qualifier)
    {
        return Err(ReleaseError::QualifierNotAllowed {
            qualifier: qualifier.to_string(),
            allowed: allowed.join(", "),
        }
        .into());
    }

    let release = current.release_version();
    let tags = services.git.list_tags(repo, "*")?;
    if let Some(latest) = latest_upstream(tags.iter().map(String::as_str))
        && !release.is_newer_than(&latest)
    {
        return Err(ReleaseError::Regression {
            release: release.to_string(),
            latest: latest.to_string(),
        }
        .into());
    }

    let tag = release.to_string();
    if services.git.tag_exists(repo, &tag)? {
        return Err(ReleaseError::TagExists { tag }.into());
    }
    Ok(current)
}

/// Run the full release on the checked-out branch. Returns the released version.
///
/// # Errors
///
/// Returns the first failing stage's error, wrapped with the stage name.
pub async fn release(ctx: &RepoContext<'_>, services: &Services<'_>) -> Result<Version> {
    let repo = ctx.path();
    let config = &ctx.config.release;
    let mut publisher: Publisher<'_> = ctx.publisher(services.git);

    services
        .build
        .verify_dependencies(repo)
        .await
        .with_context(failed_at(ReleaseStage::Verifying))?;

    let current = version_gate(ctx, services)
        .await
        .with_context(failed_at(ReleaseStage::VersionGate))?;
    let release = current.release_version();
    let release_str = release.to_string();
    info!(repo = %ctx.repository.short_name, version = %release_str, "releasing");

    let substitution = (|| -> Result<_> {
        let templates = TemplateSet::discover(repo, config)?;
        if templates.is_empty() {
            return Ok(None);
        }
        let substitution = templates.substitute(&config.template_token, &release_str)?;
        publisher.commit(&format!("Update templates to {release_str}"))?;
        Ok(Some(substitution))
    })()
    .with_context(failed_at(ReleaseStage::TemplateGate))?;

    async {
        services.build.set_version(repo, &release_str).await?;
        publisher.commit(&format!("Release {release_str}"))?;
        publisher.tag(&release_str, &format!("Release {release_str}"))?;
        Ok::<_, anyhow::Error>(())
    }
    .await
    .with_context(failed_at(ReleaseStage::Tagging))?;

    if let Some(substitution) = substitution {
        (|| -> Result<()> {
            substitution.restore()?;
            publisher.commit("Restore template placeholders")?;
            Ok(())
        })()
        .with_context(failed_at(ReleaseStage::TemplateRestore))?;
    }

    let next = current.next_snapshot_version()?.to_string();
    async {
        services.build.set_version(repo, &next).await?;
        publisher.commit(&format!("Prepare for next development iteration {next}"))?;
        Ok::<_, anyhow::Error>(())
    }
    .await
    .with_context(failed_at(ReleaseStage::NextVersionBump))?;

    prod_tag::create(ctx, services, &mut publisher, release.base())
        .await
        .with_context(failed_at(ReleaseStage::ProdTagging))?;

    publisher
        .push_branch(ctx.remote(), ctx.branch)
        .with_context(failed_at(ReleaseStage::Done))?;

    info!(repo = %ctx.repository.short_name, version = %release_str, next = %next, "released");
    Ok(release)
}
