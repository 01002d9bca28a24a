// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Fleet command: discover, select, and run one operation on every pair.

use crate::build::MavenClient;
use crate::cli::Command;
use crate::config::Config;
use crate::confirm::ConfirmationGate;
use crate::context::Services;
use crate::core::process::builder::ProcessBuilder;
use crate::error::{ConfigError, ProcessError, Result, bail_out};
use crate::fleet::{Fleet, RunReport, Workspace};
use crate::forge::{ForgeSearch, RepositoryDiscovery};
use crate::git::ShellGit;
use crate::net::CatalogClient;
use crate::ops::Operation;
use crate::platform::OcClient;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// The per-pair operation a command stands for; `None` for commands that
/// do not touch the fleet.
///
/// # Errors
///
/// Returns `ConfigError::UnknownFunction` for an unregistered `fn` name.
pub fn operation_for(command: &Command) -> std::result::Result<Option<Operation>, ConfigError> {
    let operation = match command {
        Command::Version | Command::Options | Command::Catalog { .. } => return Ok(None),
        Command::Release => Operation::Release,
        Command::ChangeVersion { version } => Operation::ChangeVersion {
            version: version.clone(),
        },
        Command::RunIntegrationTests { deployment } => Operation::RunIntegrationTests {
            deployment: *deployment,
        },
        Command::RunSmokeTests => Operation::RunSmokeTests,
        Command::CreateBranch { name } => Operation::CreateBranch { name: name.clone() },
        Command::DeleteBranch { name } => Operation::DeleteBranch { name: name.clone() },
        Command::DeleteTag { tag } => Operation::DeleteTag { tag: tag.clone() },
        Command::Cmd { command } => Operation::Command {
            command: command.join(" "),
        },
        Command::Fn { name } => Operation::from_name(name)?,
        Command::Revert => Operation::Revert,
        Command::SetMavenProperty { name, value } => Operation::SetMavenProperty {
            name: name.clone(),
            value: value.clone(),
        },
        Command::Script { path } => Operation::Script { path: path.clone() },
    };
    Ok(Some(operation))
}

fn require_tool(program: &Path) -> std::result::Result<(), ProcessError> {
    let name = program.to_string_lossy();
    if ProcessBuilder::exists(&name) {
        Ok(())
    } else {
        Err(ProcessError::ExecutableNotFound {
            name: name.into_owned(),
        })
    }
}

/// Fail before touching any repository when a needed tool is missing.
fn preflight(operation: &Operation, config: &Config) -> std::result::Result<(), ProcessError> {
    require_tool(&config.tools.git)?;
    if operation.needs_maven() {
        require_tool(&config.tools.mvn)?;
    }
    if operation.needs_platform() {
        require_tool(&config.tools.oc)?;
    }
    Ok(())
}

/// Main handler for every per-pair command.
///
/// # Errors
///
/// Returns an error if a tool is missing, discovery fails or finds nothing,
/// the workspace cannot be prepared, or the run was interrupted. Failed
/// pairs only show up in the printed report.
pub async fn run_fleet_command(
    operation: &Operation,
    config: &Config,
    show_progress: bool,
) -> Result<()> {
    preflight(operation, config)?;

    let token = (!config.forge.token.is_empty()).then(|| config.forge.token.clone());
    let forge = ForgeSearch::new(config.forge.api_url.clone(), token);
    let query = config.forge.search_query();
    info!("discovering repositories: {query}");
    let discovered = forge.discover(&query).await?;

    let workspace = Workspace::prepare(&config.fleet)?;
    if workspace.is_scratch() {
        info!("scratch workspace: {}", workspace.root().display());
    }

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, stopping after the current step...");
            interrupt.cancel();
        }
    });

    let git = ShellGit::new(config.tools.git.clone());
    let build = MavenClient::new(config.tools.mvn.clone(), cancel.clone());
    let catalog = CatalogClient::new(
        config.release.catalog_url.clone(),
        config.release.bom_artifact.clone(),
    );
    let platform = OcClient::new(config.tools.oc.clone(), cancel.clone());
    let confirm = ConfirmationGate::stdio(!config.global.skip_confirmation);
    let services = Services {
        git: &git,
        build: &build,
        catalog: &catalog,
        platform: &platform,
        confirm: &confirm,
        cancel: &cancel,
    };

    let fleet = Fleet::new(config, services).with_progress(show_progress);
    let repositories = fleet.select(&discovered, &workspace)?;
    info!(
        "{} of {} repositories selected, running {}",
        repositories.len(),
        discovered.len(),
        operation.name()
    );

    let report = fleet.run(&repositories, operation).await;
    print!("{report}");
    finish(&report)
}

/// Per-pair failures are reported, not turned into an error; only an
/// interrupted run fails the command.
pub(super) fn finish(report: &RunReport) -> Result<()> {
    if report.was_cancelled() {
        return Err(bail_out("interrupted").into());
    }
    if report.has_failures() {
        warn!("{} pair(s) failed, see the summary above", report.failed_outcomes().len());
    }
    Ok(())
}
