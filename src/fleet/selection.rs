// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::config::types::FleetConfig;
use crate::error::ConfigError;
use std::collections::BTreeSet;

/// Which short names the loop visits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Include(BTreeSet<String>),
    Exclude(BTreeSet<String>),
}

impl Selection {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when both lists are set.
    pub fn from_config(fleet: &FleetConfig) -> Result<Self, ConfigError> {
        match (fleet.include.is_empty(), fleet.exclude.is_empty()) {
            (true, true) => Ok(Self::All),
            (false, true) => Ok(Self::Include(fleet.include.iter().cloned().collect())),
            (true, false) => Ok(Self::Exclude(fleet.exclude.iter().cloned().collect())),
            (false, false) => Err(ConfigError::InvalidValue {
                section: "fleet".to_string(),
                key: "include".to_string(),
                message: "include and exclude are mutually exclusive".to_string(),
            }),
        }
    }

    #[must_use]
    pub fn allows(&self, short_name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Include(names) => names.contains(short_name),
            Self::Exclude(names) => !names.contains(short_name),
        }
    }
}
