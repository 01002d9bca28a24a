// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Artifact catalog lookups over HTTP.
//!
//! ```text
//! CatalogClient::new(url_template, artifact)
//!        |
//!   bom_version(base, qualifier)
//!        |  memo hit? ---> cached version
//!        v
//!   GET url_template{base,qualifier}
//!        |
//!        v
//!   group:artifact:...:version   (one artifact per line)
//!        |
//!        v
//!   version of `artifact`, memoized
//! ```
//!
//! Global client: `OnceLock`, connection pool, keep-alive.

use crate::error::{BoosterResult, NetworkError};
use futures_util::future::BoxFuture;
use reqwest::Client;
use std::collections::BTreeMap;
use std::sync::{Mutex, OnceLock};
use tracing::debug;

/// Global HTTP client, shared with forge discovery.
/// Falls back to a basic client if custom configuration fails.
pub(crate) fn global_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent(format!("booster-rs/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Source of the BOM version published for a platform build.
pub trait CatalogSource: Send + Sync {
    /// Version of the configured BOM artifact for `base` built as `qualifier`.
    fn bom_version<'a>(
        &'a self,
        base: &'a str,
        qualifier: &'a str,
    ) -> BoxFuture<'a, BoosterResult<String>>;
}

/// Reads the staging artifact list.
pub struct CatalogClient {
    client: Client,
    url_template: String,
    artifact: String,
    cache: Mutex<BTreeMap<(String, String), String>>,
}

impl CatalogClient {
    /// `url_template` may contain `{base}` and `{qualifier}`; `artifact` is
    /// `group:artifact`.
    pub fn new(url_template: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            client: global_client().clone(),
            url_template: url_template.into(),
            artifact: artifact.into(),
            cache: Mutex::new(BTreeMap::new()),
        }
    }

    #[must_use]
    pub fn url_for(&self, base: &str, qualifier: &str) -> String {
        self.url_template
            .replace("{base}", base)
            .replace("{qualifier}", qualifier)
    }

    fn cached(&self, key: &(String, String)) -> Option<String> {
        self.cache.lock().ok()?.get(key).cloned()
    }

    fn remember(&self, key: (String, String), version: String) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, version);
        }
    }

    async fn fetch(&self, url: &str) -> BoosterResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(NetworkError::Reqwest)?;

        if !response.status().is_success() {
            return Err(NetworkError::HttpError {
                status: response.status().as_u16(),
                url: url.to_string(),
            }
            .into());
        }

        Ok(response.text().await.map_err(NetworkError::Reqwest)?)
    }
}

/// Find the version of `artifact` (`group:artifact`) in an artifact list.
///
/// Lines look like `group:artifact:version` or
/// `group:artifact:packaging:version`; the last segment is the version.
#[must_use]
pub fn find_artifact_version(listing: &str, artifact: &str) -> Option<String> {
    let prefix = format!("{artifact}:");
    listing
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(&prefix))
        .find_map(|line| line.rsplit(':').next())
        .filter(|version| !version.is_empty())
        .map(String::from)
}

impl CatalogSource for CatalogClient {
    fn bom_version<'a>(
        &'a self,
        base: &'a str,
        qualifier: &'a str,
    ) -> BoxFuture<'a, BoosterResult<String>> {
        Box::pin(async move {
            let key = (base.to_string(), qualifier.to_string());
            if let Some(version) = self.cached(&key) {
                return Ok(version);
            }

            let url = self.url_for(base, qualifier);
            debug!(url = %url, "fetching artifact list");
            let listing = self.fetch(&url).await?;

            let version = find_artifact_version(&listing, &self.artifact).ok_or_else(|| {
                NetworkError::ArtifactNotFound {
                    artifact: self.artifact.clone(),
                    url: url.clone(),
                }
            })?;

            self.remember(key, version.clone());
            Ok(version)
        })
    }
}
