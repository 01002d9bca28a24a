// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Catalog lookup command.

use crate::config::Config;
use crate::error::Result;
use crate::net::{CatalogClient, CatalogSource};
use anyhow::Context;

/// Print the BOM version the catalog lists for `base`.
///
/// # Errors
///
/// Returns an error if the listing cannot be fetched or does not mention the
/// BOM artifact.
pub async fn run_catalog_command(
    config: &Config,
    base: &str,
    qualifier: Option<&str>,
) -> Result<()> {
    let release = &config.release;
    let qualifier = qualifier.unwrap_or(&release.build_qualifier);
    let catalog = CatalogClient::new(release.catalog_url.clone(), release.bom_artifact.clone());

    let version = catalog
        .bom_version(base, qualifier)
        .await
        .with_context(|| format!("catalog lookup for {base}.{qualifier} failed"))?;
    println!("{version}");
    Ok(())
}
