// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for booster-rs.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, ForgeConfig, FleetConfig,
//!         ReleaseConfig, PlatformConfig, ToolsConfig
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Run-wide switches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log commits, tags and pushes instead of performing them.
    pub dry: bool,
    /// Process branches even when the working tree has uncommitted changes.
    pub ignore_local_changes: bool,
    /// Pass `-DskipTests` to Maven builds.
    pub skip_tests: bool,
    /// Answer every confirmation prompt with yes.
    pub skip_confirmation: bool,
}

/// Forge search used to discover the fleet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForgeConfig {
    /// REST API root, e.g. `https://api.github.com`.
    pub api_url: String,
    pub org: String,
    pub topic: String,
    /// Full search query; when empty, `org:<org>+topic:<topic>` is used.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub query: String,
    /// Bearer token for the search API.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub token: String,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            org: "snowdrop".to_string(),
            topic: "booster".to_string(),
            query: String::new(),
            token: String::new(),
        }
    }
}

impl ForgeConfig {
    /// The effective search query.
    #[must_use]
    pub fn search_query(&self) -> String {
        if self.query.is_empty() {
            format!("org:{}+topic:{}", self.org, self.topic)
        } else {
            self.query.clone()
        }
    }
}

/// Which repositories and branches the loop visits, and where working copies live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FleetConfig {
    pub branches: Vec<String>,
    /// Protected branch production tags are anchored on.
    pub primary_branch: String,
    pub remote: String,
    /// Directory holding one working copy per repository.
    pub workspace: PathBuf,
    /// Clone into a temporary directory removed at exit.
    pub scratch: bool,
    /// Clone repositories that have no working copy yet.
    pub clone_missing: bool,
    /// Stripped from repository names to form short names.
    pub name_prefix: String,
    pub name_suffix: String,
    /// Short names to process; exclusive with `exclude`.
    pub include: Vec<String>,
    /// Short names to skip; exclusive with `include`.
    pub exclude: Vec<String>,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            branches: vec!["master".to_string()],
            primary_branch: "master".to_string(),
            remote: "origin".to_string(),
            workspace: PathBuf::from("boosters"),
            scratch: false,
            clone_missing: true,
            name_prefix: "spring-boot-".to_string(),
            name_suffix: "-booster".to_string(),
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

/// Release workflow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseConfig {
    pub allowed_qualifiers: Vec<String>,
    /// Directory (relative to the working copy) holding deployment templates.
    pub template_dir: PathBuf,
    /// Glob matched against paths relative to `template_dir`.
    pub template_glob: String,
    /// Placeholder replaced by the release version.
    pub template_token: String,
    /// Qualifier of production tags.
    pub prod_marker: String,
    /// Build qualifier the catalog is keyed by.
    pub build_qualifier: String,
    /// Artifact list URL; `{base}` and `{qualifier}` are substituted.
    pub catalog_url: String,
    /// `group:artifact` whose version is looked up in the catalog.
    pub bom_artifact: String,
    pub bom_property: String,
    pub platform_property: String,
    /// Appended to the base version to form the platform version.
    pub platform_suffix: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            allowed_qualifiers: vec!["redhat".to_string(), "rhoar".to_string()],
            template_dir: PathBuf::from(".openshiftio"),
            template_glob: "**/*.{yaml,yml}".to_string(),
            template_token: "@booster.version@".to_string(),
            prod_marker: "redhat".to_string(),
            build_qualifier: "CR1".to_string(),
            catalog_url: "http://download.eng.bos.redhat.com/rcm-guest/staging/rhoar/spring-boot-{base}.{qualifier}/extras/repository-artifact-list.txt".to_string(),
            bom_artifact: "me.snowdrop:spring-boot-bom".to_string(),
            bom_property: "spring-boot-bom.version".to_string(),
            platform_property: "spring-boot.version".to_string(),
            platform_suffix: ".RELEASE".to_string(),
        }
    }
}

/// Container platform settings for integration tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlatformConfig {
    pub poll_interval_secs: u64,
    pub wait_timeout_secs: u64,
    /// Prefix of the throwaway projects created per test run.
    pub project_prefix: String,
    /// Label selector of the pods that must become ready.
    pub selector: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 10,
            wait_timeout_secs: 600,
            project_prefix: "booster-it".to_string(),
            selector: "provider=fabric8".to_string(),
        }
    }
}

impl PlatformConfig {
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    #[must_use]
    pub const fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

/// External tool paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    pub git: PathBuf,
    pub mvn: PathBuf,
    pub oc: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            git: PathBuf::from("git"),
            mvn: PathBuf::from("mvn"),
            oc: PathBuf::from("oc"),
        }
    }
}
