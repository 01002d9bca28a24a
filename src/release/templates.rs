// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Version placeholders in deployment templates.

use crate::config::types::ReleaseConfig;
use crate::error::{FsError, ReleaseError, Result};
use crate::utility::fs::walk::find_files;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Deployment templates found in a working copy.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    dir: PathBuf,
    files: Vec<PathBuf>,
}

/// Original contents of the templates a substitution touched.
#[derive(Debug)]
#[must_use = "templates stay substituted until restore() is called"]
pub struct Substitution {
    originals: Vec<(PathBuf, String)>,
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| {
        FsError::IoError {
            path: path.display().to_string(),
            source,
        }
        .into()
    })
}

fn write(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|source| {
        FsError::IoError {
            path: path.display().to_string(),
            source,
        }
        .into()
    })
}

impl TemplateSet {
    /// Templates under `config.template_dir` matching `config.template_glob`.
    /// A missing directory yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns an error if the glob is invalid or the directory cannot be walked.
    pub fn discover(repo: &Path, config: &ReleaseConfig) -> Result<Self> {
        let dir = repo.join(&config.template_dir);
        if !dir.is_dir() {
            return Ok(Self {
                dir,
                files: Vec::new(),
            });
        }
        let files = find_files(&dir, &config.template_glob)?;
        debug!(dir = %dir.display(), count = files.len(), "templates found");
        Ok(Self { dir, files })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Replace `token` by `value` in every template containing it.
    ///
    /// # Errors
    ///
    /// Returns `ReleaseError::TemplateTokenMissing` when templates exist but
    /// none contains `token`; nothing is written in that case.
    pub fn substitute(&self, token: &str, value: &str) -> Result<Substitution> {
        let pending = self.containing(token)?;
        if pending.is_empty() && !self.files.is_empty() {
            return Err(ReleaseError::TemplateTokenMissing {
                dir: self.dir.display().to_string(),
                token: token.to_string(),
            }
            .into());
        }
        Self::rewrite(pending, token, value)
    }

    /// Like [`substitute`](Self::substitute), but templates without `token`
    /// are simply left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if a template cannot be read or written.
    pub fn fill(&self, token: &str, value: &str) -> Result<Substitution> {
        let pending = self.containing(token)?;
        Self::rewrite(pending, token, value)
    }

    fn containing(&self, token: &str) -> Result<Vec<(PathBuf, String)>> {
        let mut pending = Vec::new();
        for file in &self.files {
            let content = read(file)?;
            if content.contains(token) {
                pending.push((file.clone(), content));
            }
        }
        Ok(pending)
    }

    fn rewrite(pending: Vec<(PathBuf, String)>, token: &str, value: &str) -> Result<Substitution> {
        for (file, content) in &pending {
            write(file, &content.replace(token, value))?;
        }
        Ok(Substitution { originals: pending })
    }
}

impl Substitution {
    /// Files that were rewritten.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.originals.iter().map(|(path, _)| path.as_path())
    }

    /// Write the original contents back.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be written.
    pub fn restore(self) -> Result<()> {
        for (file, content) in &self.originals {
            write(file, content)?;
        }
        Ok(())
    }
}
