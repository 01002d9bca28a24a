// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::forge::RepositoryDescriptor;
use std::path::{Path, PathBuf};

/// A fleet member and where its working copy lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Canonical name on the forge.
    pub name: String,
    /// Name with the fleet prefix and suffix stripped; used for selection.
    pub short_name: String,
    pub clone_url: String,
    pub path: PathBuf,
}

impl Repository {
    #[must_use]
    pub fn from_descriptor(
        descriptor: &RepositoryDescriptor,
        workspace: &Path,
        prefix: &str,
        suffix: &str,
    ) -> Self {
        Self {
            name: descriptor.name.clone(),
            short_name: short_name(&descriptor.name, prefix, suffix).to_string(),
            clone_url: descriptor.clone_url.clone(),
            path: workspace.join(&descriptor.name),
        }
    }
}

/// Strip `prefix` and `suffix` from `name`, keeping the name when nothing is left.
#[must_use]
pub fn short_name<'a>(name: &'a str, prefix: &str, suffix: &str) -> &'a str {
    let stripped = name.strip_prefix(prefix).unwrap_or(name);
    let stripped = stripped.strip_suffix(suffix).unwrap_or(stripped);
    if stripped.is_empty() { name } else { stripped }
}
