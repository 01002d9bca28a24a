// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for booster-rs using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! booster [global options] <command>
//! release | change-version | set-maven-property
//! create-branch | delete-branch | delete-tag | revert
//! run-smoke-tests | run-integration-tests {fmp|s2i}
//! cmd | script | fn
//! catalog | options | version
//! ```

pub mod global;


use std::path::PathBuf;

use crate::cli::global::GlobalOptions;
use clap::{Parser, Subcommand, ValueEnum};

/// Booster Fleet Release Tool
///
/// Applies one release or branch-management operation across every
/// booster repository found by a forge search.
#[derive(Debug, Parser)]
#[command(
    name = "booster",
    author,
    version,
    about = "Booster Fleet Release Tool",
    long_about = "booster-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Discovers booster repositories through a forge search and runs\n\
                  one operation on every repository/branch pair. Failures are\n\
                  recorded per pair and summarised at the end.",
    after_help = "CONFIGURATION:\n\n\
                  booster.toml in the current directory is loaded when present,\n\
                  followed by every --config file, then BOOSTER_<SECTION>__<KEY>\n\
                  environment variables, then command-line flags."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// How a booster is deployed for integration tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeploymentKind {
    /// Deploy with the Maven fabric8 plugin.
    Fmp,
    /// Apply the templates and start a source-to-image build.
    S2i,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Lists all options and their effective values.
    Options,

    /// Releases every selected branch and cuts its production tag.
    Release,

    /// Sets the project version, or bumps the revision when none is given.
    #[command(visible_alias = "change_version")]
    ChangeVersion {
        /// New version, e.g. 1.5.13-3-SNAPSHOT
        version: Option<String>,
    },

    /// Deploys to a throwaway platform project and runs the integration tests.
    #[command(visible_alias = "run_integration_tests")]
    RunIntegrationTests {
        #[arg(value_enum)]
        deployment: DeploymentKind,
    },

    /// Runs a full build including tests.
    #[command(visible_alias = "run_smoke_tests")]
    RunSmokeTests,

    /// Creates a branch from each processed branch and pushes it.
    #[command(visible_alias = "create_branch")]
    CreateBranch { name: String },

    /// Deletes a branch locally and on the remote.
    #[command(visible_alias = "delete_branch")]
    DeleteBranch { name: String },

    /// Deletes a tag locally and on the remote.
    #[command(visible_alias = "delete_tag")]
    DeleteTag { tag: String },

    /// Runs a shell command in every working copy.
    Cmd {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Runs a registered operation by name.
    Fn {
        /// release, prod_tag, change_version, revert or run_smoke_tests
        name: String,
    },

    /// Discards local changes: hard reset to the remote branch and clean.
    Revert,

    /// Sets a Maven property and commits when it changed.
    #[command(visible_alias = "set_maven_property")]
    SetMavenProperty { name: String, value: String },

    /// Prints the BOM version the catalog lists for a base version.
    Catalog {
        /// Base version, e.g. 1.5.13
        base: String,
        /// Build qualifier, defaults to release.build_qualifier
        #[arg(long)]
        qualifier: Option<String>,
    },

    /// Runs a script in every working copy.
    Script { path: PathBuf },
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Tries to parse command-line arguments from an iterator.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse_from<I, T>(iter: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(iter)
}
