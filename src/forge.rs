// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository discovery through the forge search API.
//!
//! ```text
//! ForgeSearch::discover("org:snowdrop+topic:booster")
//!   GET {api}/search/repositories?q=...&per_page=100&page=1..
//!        |   Authorization: Bearer <token>  (optional)
//!        v
//!   { total_count, items: [{ name, clone_url }] }
//!        |
//!        v
//!   Vec<RepositoryDescriptor>, sorted by name, never empty
//! ```

use crate::error::{BoosterResult, ConfigError, NetworkError};
use crate::net::global_client;
use futures_util::future::BoxFuture;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const PAGE_SIZE: usize = 100;

/// A discovered repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryDescriptor {
    pub name: String,
    pub clone_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    total_count: usize,
    items: Vec<RepositoryDescriptor>,
}

/// Finds the repositories making up the fleet.
pub trait RepositoryDiscovery: Send + Sync {
    /// # Errors
    ///
    /// Fails on network errors and when nothing matches `query`.
    fn discover<'a>(&'a self, query: &'a str)
    -> BoxFuture<'a, BoosterResult<Vec<RepositoryDescriptor>>>;
}

/// GitHub-compatible repository search.
pub struct ForgeSearch {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl ForgeSearch {
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: global_client().clone(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    async fn page(&self, query: &str, page: usize) -> BoosterResult<SearchPage> {
        let url = format!(
            "{}/search/repositories?q={query}&per_page={PAGE_SIZE}&page={page}",
            self.api_url
        );
        debug!(url = %url, "searching repositories");

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(NetworkError::Reqwest)?;
        if !response.status().is_success() {
            return Err(NetworkError::HttpError {
                status: response.status().as_u16(),
                url,
            }
            .into());
        }

        let body = response.text().await.map_err(NetworkError::Reqwest)?;
        serde_json::from_str(&body).map_err(|e| {
            NetworkError::InvalidResponse {
                url,
                message: e.to_string(),
            }
            .into()
        })
    }
}

impl RepositoryDiscovery for ForgeSearch {
    fn discover<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, BoosterResult<Vec<RepositoryDescriptor>>> {
        Box::pin(async move {
            let mut repositories = Vec::new();
            let mut page = 1;
            loop {
                let result = self.page(query, page).await?;
                let received = result.items.len();
                repositories.extend(result.items);
                if received < PAGE_SIZE || repositories.len() >= result.total_count {
                    break;
                }
                page += 1;
            }

            if repositories.is_empty() {
                return Err(ConfigError::NoRepositories {
                    query: query.to_string(),
                }
                .into());
            }

            repositories.sort_by(|a, b| a.name.cmp(&b.name));
            repositories.dedup_by(|a, b| a.name == b.name);
            debug!(count = repositories.len(), "repositories discovered");
            Ok(repositories)
        })
    }
}
