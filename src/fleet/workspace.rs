// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::config::types::FleetConfig;
use crate::error::FsError;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Directory holding the working copies.
///
/// In scratch mode the directory is temporary and removed on drop, on every
/// exit path.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    scratch: Option<TempDir>,
}

impl Workspace {
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn prepare(fleet: &FleetConfig) -> Result<Self> {
        if fleet.scratch {
            let dir = tempfile::Builder::new()
                .prefix("booster-")
                .tempdir()
                .map_err(|source| FsError::IoError {
                    path: std::env::temp_dir().display().to_string(),
                    source,
                })?;
            return Ok(Self {
                root: dir.path().to_path_buf(),
                scratch: Some(dir),
            });
        }

        std::fs::create_dir_all(&fleet.workspace).map_err(|source| FsError::IoError {
            path: fleet.workspace.display().to_string(),
            source,
        })?;
        Ok(Self {
            root: fleet.workspace.clone(),
            scratch: None,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn is_scratch(&self) -> bool {
        self.scratch.is_some()
    }
}
