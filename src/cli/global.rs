// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE        ← Additional config files (can repeat)
//! --dry                ← Log commits/tags/pushes instead of doing them
//! --log-level N        ← Console verbosity (0-6)
//! --file-log-level N   ← File verbosity (overrides --log-level)
//! -b/-i/-e/-r/-d/-q    ← fleet and forge overrides
//!
//! Precedence: CLI flags > BOOSTER_* env > --config > booster.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::config::Config;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Additional TOML configuration file(s), loaded after `booster.toml`.
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true, action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Log commits, tags and pushes instead of performing them.
    /// File edits still happen; use `revert` to undo them.
    #[arg(long, global = true)]
    pub dry: bool,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", global = true, value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(long = "file-log-level", value_name = "LEVEL", global = true, value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Branches to process in every repository (comma-separated).
    #[arg(short = 'b', long, value_name = "BRANCH", value_delimiter = ',', global = true)]
    pub branches: Vec<String>,

    /// Only process these repositories (short names, comma-separated).
    #[arg(short = 'i', long, value_name = "NAME", value_delimiter = ',', global = true, conflicts_with = "exclude")]
    pub include: Vec<String>,

    /// Skip these repositories (short names, comma-separated).
    #[arg(short = 'e', long, value_name = "NAME", value_delimiter = ',', global = true)]
    pub exclude: Vec<String>,

    /// Process branches even with uncommitted changes.
    #[arg(long, global = true)]
    pub ignore_local_changes: bool,

    /// Skip tests in Maven builds.
    #[arg(long, global = true)]
    pub skip_tests: bool,

    /// Answer yes to every confirmation prompt.
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Remote to fetch from and push to.
    #[arg(short = 'r', long, value_name = "REMOTE", global = true)]
    pub remote: Option<String>,

    /// Directory holding the working copies.
    #[arg(short = 'd', long = "dir", value_name = "DIR", global = true)]
    pub workspace: Option<PathBuf>,

    /// Clone into a temporary directory that is removed at exit.
    #[arg(long, global = true, conflicts_with = "workspace")]
    pub scratch: bool,

    /// Forge search query used to discover repositories.
    #[arg(short = 'q', long, value_name = "QUERY", global = true)]
    pub query: Option<String>,

    /// Token for the forge search API.
    #[arg(long, env = "BOOSTER_FORGE_TOKEN", hide_env_values = true, global = true)]
    pub forge_token: Option<String>,
}

impl GlobalOptions {
    /// Applies the flags that were given on top of the loaded configuration.
    pub fn apply_to(&self, config: &mut Config) {
        config.global.dry |= self.dry;
        config.global.ignore_local_changes |= self.ignore_local_changes;
        config.global.skip_tests |= self.skip_tests;
        config.global.skip_confirmation |= self.yes;

        if !self.branches.is_empty() {
            config.fleet.branches.clone_from(&self.branches);
        }
        // Either list on the command line replaces both configured lists.
        if !self.include.is_empty() || !self.exclude.is_empty() {
            config.fleet.include.clone_from(&self.include);
            config.fleet.exclude.clone_from(&self.exclude);
        }
        if let Some(remote) = &self.remote {
            config.fleet.remote.clone_from(remote);
        }
        if let Some(workspace) = &self.workspace {
            config.fleet.workspace.clone_from(workspace);
        }
        config.fleet.scratch |= self.scratch;

        if let Some(query) = &self.query {
            config.forge.query.clone_from(query);
        }
        if let Some(token) = &self.forge_token {
            config.forge.token.clone_from(token);
        }
    }
}
