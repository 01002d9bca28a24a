// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the catalog client and forge discovery using wiremock.
//!
//! Covers:
//! - Artifact list parsing and per-(base, qualifier) memoization
//! - HTTP errors and missing artifacts
//! - Search pagination, bearer authentication, empty results

use booster_rs::error::{BoosterError, ConfigError, NetworkError};
use booster_rs::forge::{ForgeSearch, RepositoryDiscovery};
use booster_rs::net::{CatalogClient, CatalogSource, find_artifact_version};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOM: &str = "me.snowdrop:spring-boot-bom";

const LISTING: &str = "\
io.fabric8:kubernetes-client:jar:3.1.12.fuse-000001-redhat-1
me.snowdrop:spring-boot-bom:pom:1.5.13.Final-redhat-00003
me.snowdrop:spring-boot-bom-parent:pom:1.5.13.Final-redhat-00003
";

fn catalog_for(server: &MockServer) -> CatalogClient {
    CatalogClient::new(
        format!("{}/spring-boot-{{base}}.{{qualifier}}/artifact-list.txt", server.uri()),
        BOM,
    )
}

fn page_of(names: &[String], total: usize) -> serde_json::Value {
    let items: Vec<_> = names
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "full_name": format!("snowdrop/{name}"),
                "clone_url": format!("https://github.com/snowdrop/{name}.git"),
            })
        })
        .collect();
    json!({ "total_count": total, "incomplete_results": false, "items": items })
}

// =============================================================================
// catalog
// =============================================================================

#[test]
fn test_find_artifact_version() {
    assert_eq!(
        find_artifact_version(LISTING, BOM).as_deref(),
        Some("1.5.13.Final-redhat-00003")
    );
    assert_eq!(
        find_artifact_version("me.snowdrop:spring-boot-bom:2.0.3.RELEASE\n", BOM).as_deref(),
        Some("2.0.3.RELEASE")
    );
    assert_eq!(find_artifact_version(LISTING, "me.snowdrop:missing"), None);
}

#[test]
fn test_url_template() {
    let catalog = CatalogClient::new("http://host/sb-{base}.{qualifier}/list.txt", BOM);
    assert_eq!(catalog.url_for("1.5.13", "CR1"), "http://host/sb-1.5.13.CR1/list.txt");
}

#[tokio::test]
async fn test_bom_version_is_fetched_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spring-boot-1.5.13.CR1/artifact-list.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = catalog_for(&server);
    for _ in 0..3 {
        let version = catalog.bom_version("1.5.13", "CR1").await.unwrap();
        assert_eq!(version, "1.5.13.Final-redhat-00003");
    }
}

#[tokio::test]
async fn test_bom_version_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = catalog_for(&server)
        .bom_version("9.9.9", "CR1")
        .await
        .unwrap_err();
    match err {
        BoosterError::Network(inner) => match *inner {
            NetworkError::HttpError { status, ref url } => {
                assert_eq!(status, 404);
                assert!(url.ends_with("/spring-boot-9.9.9.CR1/artifact-list.txt"));
            }
            other => panic!("expected HttpError, got {other:?}"),
        },
        other => panic!("expected network error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_bom_version_missing_artifact() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("io.fabric8:other:1.0\n"))
        .mount(&server)
        .await;

    let err = catalog_for(&server)
        .bom_version("1.5.13", "CR1")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BoosterError::Network(ref inner) if matches!(**inner, NetworkError::ArtifactNotFound { .. })
    ));
    assert!(err.to_string().contains("'me.snowdrop:spring-boot-bom' not listed"));
}

// =============================================================================
// forge discovery
// =============================================================================

#[tokio::test]
async fn test_discover_follows_pages() {
    let server = MockServer::start().await;
    let first: Vec<String> = (0..100).map(|i| format!("booster-{i:03}")).collect();

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("per_page", "100"))
        .and(query_param("page", "1"))
        .and(header("Accept", "application/vnd.github+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_of(&first, 101)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_of(&["aaa-booster".to_string()], 101)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let found = ForgeSearch::new(format!("{}/", server.uri()), None)
        .discover("org:snowdrop+topic:booster")
        .await
        .unwrap();

    assert_eq!(found.len(), 101);
    assert_eq!(found[0].name, "aaa-booster");
    assert_eq!(found[0].clone_url, "https://github.com/snowdrop/aaa-booster.git");
    assert_eq!(found[100].name, "booster-099");
}

#[tokio::test]
async fn test_discover_sends_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(header("Authorization", "Bearer s3cret"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_of(&["spring-boot-crud-booster".to_string()], 1)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let found = ForgeSearch::new(server.uri(), Some("s3cret".to_string()))
        .discover("org:snowdrop+topic:booster")
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn test_discover_nothing_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_of(&[], 0)))
        .mount(&server)
        .await;

    let err = ForgeSearch::new(server.uri(), None)
        .discover("org:nobody")
        .await
        .unwrap_err();
    match err {
        BoosterError::Config(inner) => {
            assert!(matches!(*inner, ConfigError::NoRepositories { ref query } if query == "org:nobody"));
        }
        other => panic!("expected config error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_discover_invalid_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&server)
        .await;

    let err = ForgeSearch::new(server.uri(), None)
        .discover("org:snowdrop")
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("network error: unexpected response from"));
}
