// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for booster-rs.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. booster.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. BOOSTER_* env vars
//! 5. CLI flags
//! ```
//!
//! # Environment Variable Mapping
//!
//! Sections and keys are separated by a double underscore because keys
//! themselves contain single underscores.
//!
//! ```text
//! BOOSTER_GLOBAL__DRY=true             → global.dry = true
//! BOOSTER_FLEET__PRIMARY_BRANCH=main   → fleet.primary_branch = "main"
//! BOOSTER_RELEASE__BUILD_QUALIFIER=CR2 → release.build_qualifier = "CR2"
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{
    FleetConfig, ForgeConfig, GlobalConfig, PlatformConfig, ReleaseConfig, ToolsConfig,
};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub global: GlobalConfig,
    pub forge: ForgeConfig,
    pub fleet: FleetConfig,
    pub release: ReleaseConfig,
    pub platform: PlatformConfig,
    pub tools: ToolsConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use booster_rs::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("booster.toml")
    ///     .with_env_prefix("BOOSTER")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when include and exclude lists are
    /// both set, when no branch is configured, or when the platform poll
    /// interval is zero.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let invalid = |section: &str, key: &str, message: &str| ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            message: message.to_string(),
        };

        if !self.fleet.include.is_empty() && !self.fleet.exclude.is_empty() {
            return Err(invalid(
                "fleet",
                "include",
                "include and exclude lists are mutually exclusive",
            ));
        }
        if self.fleet.branches.is_empty() {
            return Err(invalid("fleet", "branches", "at least one branch is required"));
        }
        if self.platform.poll_interval_secs == 0 {
            return Err(invalid(
                "platform",
                "poll_interval_secs",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Secrets are shown as `[hidden]`. Output is sorted by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_forge_options(&mut options);
        self.format_fleet_options(&mut options);
        self.format_release_options(&mut options);
        self.format_platform_options(&mut options);
        self.format_tools_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("global.dry".into(), self.global.dry.to_string());
        options.insert(
            "global.ignore_local_changes".into(),
            self.global.ignore_local_changes.to_string(),
        );
        options.insert("global.skip_tests".into(), self.global.skip_tests.to_string());
        options.insert(
            "global.skip_confirmation".into(),
            self.global.skip_confirmation.to_string(),
        );
    }

    fn format_forge_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("forge.api_url".into(), self.forge.api_url.clone());
        options.insert("forge.org".into(), self.forge.org.clone());
        options.insert("forge.topic".into(), self.forge.topic.clone());
        options.insert("forge.query".into(), self.forge.search_query());
        if !self.forge.token.is_empty() {
            options.insert("forge.token".into(), "[hidden]".into());
        }
    }

    fn format_fleet_options(&self, options: &mut BTreeMap<String, String>) {
        let fleet = &self.fleet;
        options.insert("fleet.branches".into(), fleet.branches.join(","));
        options.insert("fleet.primary_branch".into(), fleet.primary_branch.clone());
        options.insert("fleet.remote".into(), fleet.remote.clone());
        options.insert(
            "fleet.workspace".into(),
            fleet.workspace.display().to_string(),
        );
        options.insert("fleet.scratch".into(), fleet.scratch.to_string());
        options.insert("fleet.clone_missing".into(), fleet.clone_missing.to_string());
        options.insert("fleet.name_prefix".into(), fleet.name_prefix.clone());
        options.insert("fleet.name_suffix".into(), fleet.name_suffix.clone());
        if !fleet.include.is_empty() {
            options.insert("fleet.include".into(), fleet.include.join(","));
        }
        if !fleet.exclude.is_empty() {
            options.insert("fleet.exclude".into(), fleet.exclude.join(","));
        }
    }

    fn format_release_options(&self, options: &mut BTreeMap<String, String>) {
        let release = &self.release;
        options.insert(
            "release.allowed_qualifiers".into(),
            release.allowed_qualifiers.join(","),
        );
        options.insert(
            "release.template_dir".into(),
            release.template_dir.display().to_string(),
        );
        options.insert("release.template_glob".into(), release.template_glob.clone());
        options.insert(
            "release.template_token".into(),
            release.template_token.clone(),
        );
        options.insert("release.prod_marker".into(), release.prod_marker.clone());
        options.insert(
            "release.build_qualifier".into(),
            release.build_qualifier.clone(),
        );
        options.insert("release.catalog_url".into(), release.catalog_url.clone());
        options.insert("release.bom_artifact".into(), release.bom_artifact.clone());
        options.insert("release.bom_property".into(), release.bom_property.clone());
        options.insert(
            "release.platform_property".into(),
            release.platform_property.clone(),
        );
        options.insert(
            "release.platform_suffix".into(),
            release.platform_suffix.clone(),
        );
    }

    fn format_platform_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "platform.poll_interval_secs".into(),
            self.platform.poll_interval_secs.to_string(),
        );
        options.insert(
            "platform.wait_timeout_secs".into(),
            self.platform.wait_timeout_secs.to_string(),
        );
        options.insert(
            "platform.project_prefix".into(),
            self.platform.project_prefix.clone(),
        );
        options.insert("platform.selector".into(), self.platform.selector.clone());
    }

    fn format_tools_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("tools.git".into(), self.tools.git.display().to_string());
        options.insert("tools.mvn".into(), self.tools.mvn.display().to_string());
        options.insert("tools.oc".into(), self.tools.oc.display().to_string());
    }
}
