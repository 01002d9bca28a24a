// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{FsError, Result};
use ignore::{WalkBuilder, WalkState};
use std::path::{Path, PathBuf};
use wax::{Glob, Program};

/// Files below `root` whose path relative to `root` matches the `wax` glob
/// `pattern` (e.g. `**/*.{yaml,yml}`), sorted.
///
/// Every file counts, hidden or git-ignored alike; only `.git` itself is
/// never entered.
///
/// # Errors
///
/// Returns an error if `root` is not a directory or the pattern is not a
/// valid glob.
pub fn find_files(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(FsError::NotFound(root.display().to_string()).into());
    }
    let glob =
        Glob::new(pattern).map_err(|e| anyhow::anyhow!("invalid glob pattern '{pattern}': {e}"))?;

    let (tx, rx) = flume::unbounded::<PathBuf>();
    WalkBuilder::new(root)
        .standard_filters(false)
        .filter_entry(|entry| entry.file_name() != ".git")
        .build_parallel()
        .run(|| {
            let tx = tx.clone();
            let glob = &glob;
            Box::new(move |entry| {
                if let Ok(entry) = entry
                    && entry.file_type().is_some_and(|kind| kind.is_file())
                    && entry
                        .path()
                        .strip_prefix(root)
                        .is_ok_and(|relative| glob.is_match(relative))
                {
                    let _ = tx.send(entry.into_path());
                }
                WalkState::Continue
            })
        });
    drop(tx);

    let mut files: Vec<PathBuf> = rx.into_iter().collect();
    files.sort();
    Ok(files)
}
