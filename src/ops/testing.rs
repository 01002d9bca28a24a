// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::OperationStatus;
use crate::cli::DeploymentKind;
use crate::context::{RepoContext, Services};
use crate::error::Result;
use crate::platform::wait_for_ready;
use crate::release::templates::TemplateSet;
use tracing::{info, warn};

pub(super) async fn smoke_tests(
    ctx: &RepoContext<'_>,
    services: &Services<'_>,
) -> Result<OperationStatus> {
    let skip_tests = ctx.config.global.skip_tests;
    services.build.build(ctx.path(), skip_tests).await?;
    Ok(OperationStatus::Done(skip_tests.then(|| "tests skipped".to_string())))
}

/// Platform project names: lowercase alphanumerics and dashes.
pub(super) fn project_name(prefix: &str, short_name: &str, branch: &str) -> String {
    format!("{prefix}-{short_name}-{branch}")
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

/// Apply the templates, with the placeholder filled in, and start the build.
async fn deploy_templates(
    ctx: &RepoContext<'_>,
    services: &Services<'_>,
    templates: &TemplateSet,
    project: &str,
) -> Result<()> {
    let repo = ctx.path();
    for file in templates.files() {
        services.platform.apply_template(repo, file, project).await?;
    }
    services
        .platform
        .start_build(repo, &ctx.repository.short_name, project)
        .await?;
    Ok(())
}

async fn deploy_and_verify(
    ctx: &RepoContext<'_>,
    services: &Services<'_>,
    deployment: DeploymentKind,
    project: &str,
) -> Result<()> {
    let repo = ctx.path();
    let platform = &ctx.config.platform;

    match deployment {
        DeploymentKind::Fmp => {
            let goals = [
                "clean".to_string(),
                "fabric8:deploy".to_string(),
                "-Popenshift".to_string(),
                format!("-Dfabric8.namespace={project}"),
            ];
            services.build.run_goals(repo, &goals).await?;
        }
        DeploymentKind::S2i => {
            let release = &ctx.config.release;
            let version = services.build.project_version(repo).await?;
            let templates = TemplateSet::discover(repo, release)?;
            let filled = templates.fill(&release.template_token, &version)?;
            let deployed = deploy_templates(ctx, services, &templates, project).await;
            filled.restore()?;
            deployed?;
        }
    }

    wait_for_ready(
        services.platform,
        project,
        &platform.selector,
        platform.poll_interval(),
        platform.wait_timeout(),
    )
    .await?;

    let goals = [
        "verify".to_string(),
        "-Popenshift-it".to_string(),
        format!("-Dkubernetes.namespace={project}"),
    ];
    services.build.run_goals(repo, &goals).await?;
    Ok(())
}

/// Deploy into a throwaway project, wait for it, run the tests, delete the project.
pub(super) async fn integration_tests(
    ctx: &RepoContext<'_>,
    services: &Services<'_>,
    deployment: DeploymentKind,
) -> Result<OperationStatus> {
    let project = project_name(
        &ctx.config.platform.project_prefix,
        &ctx.repository.short_name,
        ctx.branch,
    );
    services.platform.new_project(&project).await?;
    info!(project = %project, "project created");

    let result = deploy_and_verify(ctx, services, deployment, &project).await;

    if let Err(e) = services.platform.delete_project(&project).await {
        warn!(project = %project, "could not delete project: {e}");
    }
    result?;
    Ok(OperationStatus::Done(None))
}
