// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Production tags.
//!
//! ```text
//! primary branch HEAD
//!     |
//!     +--> prod-tag-<base>-<n>-<marker>   (throwaway)
//!             templates -> <base>-<n>-<marker>, commit
//!             set version,                  commit
//!             bom property     (catalog),   commit if changed
//!             platform property,            commit if changed
//!             tag <base>-<n>-<marker>
//!     |
//!     <-- checkout primary, delete throwaway; only the tag remains
//! ```

use super::templates::TemplateSet;
use crate::context::{RepoContext, Services};
use crate::error::{ReleaseError, Result};
use crate::git::Publisher;
use crate::version::{Version, next_production_number};
use anyhow::Context;
use tracing::{info, warn};

/// Set a build property and commit, unless it already has `value`.
async fn set_property_if_changed(
    services: &Services<'_>,
    ctx: &RepoContext<'_>,
    publisher: &mut Publisher<'_>,
    name: &str,
    value: &str,
) -> Result<()> {
    let repo = ctx.path();
    let current = services.build.evaluate(repo, name).await.ok();
    if current.as_deref() == Some(value) {
        return Ok(());
    }
    services.build.set_property(repo, name, value).await?;
    publisher.commit(&format!("Set {name} to {value}"))?;
    Ok(())
}

/// Commits and tag made on the throwaway branch.
async fn tag_on_throwaway(
    ctx: &RepoContext<'_>,
    services: &Services<'_>,
    publisher: &mut Publisher<'_>,
    base: &str,
    tag: &str,
) -> Result<()> {
    let repo = ctx.path();
    let config = &ctx.config.release;

    let templates = TemplateSet::discover(repo, config)?;
    if !templates.is_empty() {
        // Left substituted: the throwaway branch is discarded afterwards.
        let _substitution = templates.substitute(&config.template_token, tag)?;
        publisher.commit(&format!("Update templates to {tag}"))?;
    }

    services.build.set_version(repo, tag).await?;
    publisher.commit(&format!("Production version {tag}"))?;

    let bom = services
        .catalog
        .bom_version(base, &config.build_qualifier)
        .await
        .with_context(|| format!("no BOM version for {base}.{}", config.build_qualifier))?;
    set_property_if_changed(services, ctx, publisher, &config.bom_property, &bom).await?;

    let platform = format!("{base}{}", config.platform_suffix);
    set_property_if_changed(services, ctx, publisher, &config.platform_property, &platform)
        .await?;

    publisher.tag(tag, &format!("Production release {tag}"))?;
    Ok(())
}

/// Create the next production tag for `base` from the checked-out primary branch.
/// Returns the tag name. Nothing is pushed.
///
/// # Errors
///
/// Fails when not on the primary branch, when the catalog lookup fails, or
/// when any build or git step fails. The primary branch is checked out again
/// in every case.
pub async fn create(
    ctx: &RepoContext<'_>,
    services: &Services<'_>,
    publisher: &mut Publisher<'_>,
    base: &str,
) -> Result<String> {
    let repo = ctx.path();
    let git = services.git;
    let primary = &ctx.config.fleet.primary_branch;
    let marker = &ctx.config.release.prod_marker;

    let current = git.current_branch(repo)?.unwrap_or_else(|| "HEAD".to_string());
    if &current != primary {
        return Err(ReleaseError::NotOnPrimaryBranch {
            primary: primary.clone(),
            current,
        }
        .into());
    }

    let existing = git.list_tags(repo, &format!("{base}-*-{marker}"))?;
    let n = next_production_number(existing.iter().map(String::as_str), base, marker);
    let tag = Version::new(base, n).with_qualifier(marker.as_str()).to_string();

    if publisher.is_dry_run() {
        let bom = services
            .catalog
            .bom_version(base, &ctx.config.release.build_qualifier)
            .await?;
        info!("[DRY-RUN] would create production tag {tag} (bom {bom}) on prod-tag-{tag}");
        return Ok(tag);
    }

    let throwaway = format!("prod-tag-{tag}");
    git.create_branch(repo, &throwaway, "HEAD")?;
    git.checkout(repo, &throwaway)?;

    let result = tag_on_throwaway(ctx, services, publisher, base, &tag).await;

    if result.is_err()
        && let Err(e) = git.reset_hard(repo, "HEAD")
    {
        warn!(repo = %repo.display(), "could not reset {throwaway}: {e}");
    }
    let cleanup = git
        .checkout(repo, primary)
        .and_then(|()| git.delete_branch(repo, &throwaway));

    match (result, cleanup) {
        (Err(e), Err(cleanup)) => {
            warn!(repo = %repo.display(), "could not remove {throwaway}: {cleanup}");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), Err(cleanup)) => Err(cleanup).context(format!("could not remove {throwaway}")),
        (Ok(()), Ok(())) => {
            info!(repo = %repo.display(), "production tag {tag} created");
            Ok(tag)
        }
    }
}

/// `fn prod_tag`: tag the current version's base and push only the tag.
///
/// # Errors
///
/// See [`create`].
pub async fn run(ctx: &RepoContext<'_>, services: &Services<'_>) -> Result<String> {
    let raw = services.build.project_version(ctx.path()).await?;
    let version = Version::parse(&raw)?;
    let mut publisher = ctx.publisher(services.git);
    let tag = create(ctx, services, &mut publisher, version.base()).await?;
    publisher.push_tags(ctx.remote())?;
    Ok(tag)
}
