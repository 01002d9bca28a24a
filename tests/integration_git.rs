// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the fleet loop against real git repositories.
//!
//! Each test seeds a bare "origin" in a temp directory and lets the fleet
//! clone it into a fresh workspace, so clone, fetch, tracking branches,
//! rebase, push and tag deletion all run through the git CLI.

use std::io::{Empty, Sink};
use std::path::{Path, PathBuf};
use std::process::Command;

use booster_rs::build::MavenClient;
use booster_rs::cmd::fleet::run_fleet_command;
use booster_rs::config::Config;
use booster_rs::confirm::ConfirmationGate;
use booster_rs::context::Services;
use booster_rs::fleet::{Fleet, RunReport, Workspace};
use booster_rs::forge::RepositoryDescriptor;
use booster_rs::git::ShellGit;
use booster_rs::net::CatalogClient;
use booster_rs::ops::Operation;
use booster_rs::platform::OcClient;
use serde_json::json;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NAME: &str = "spring-boot-crud-booster";

fn run_git(args: &[&str], cwd: &Path) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("git should run");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// A bare origin with `master`, `sb-1.5.x` and the tag `1.5.13-1`.
fn seed_origin(temp: &TempDir) -> PathBuf {
    let origin = temp.path().join(format!("{NAME}.git"));
    let seed = temp.path().join("seed");
    std::fs::create_dir(&origin).unwrap();
    std::fs::create_dir(&seed).unwrap();

    run_git(&["init", "--quiet", "--bare", "-b", "master"], &origin);
    run_git(&["init", "--quiet", "-b", "master"], &seed);
    run_git(&["config", "user.email", "test@example.com"], &seed);
    run_git(&["config", "user.name", "Test"], &seed);
    std::fs::write(seed.join("pom.xml"), "<project/>\n").unwrap();
    run_git(&["add", "-A"], &seed);
    run_git(&["commit", "-q", "-m", "Initial commit"], &seed);
    run_git(&["tag", "-a", "1.5.13-1", "-m", "Release 1.5.13-1"], &seed);
    run_git(&["branch", "sb-1.5.x"], &seed);
    run_git(&["remote", "add", "origin", origin.to_str().unwrap()], &seed);
    run_git(
        &["push", "-q", "origin", "master", "sb-1.5.x", "refs/tags/1.5.13-1"],
        &seed,
    );
    origin
}

fn remote_refs(origin: &Path) -> String {
    run_git(&["for-each-ref", "--format=%(refname)"], origin)
}

fn config_for(temp: &TempDir, branches: &[&str]) -> Config {
    let mut config = Config::default();
    config.fleet.workspace = temp.path().join("workspace");
    config.fleet.branches = branches.iter().map(ToString::to_string).collect();
    config
}

async fn run_fleet(config: &Config, origin: &Path, operation: &Operation) -> RunReport {
    let cancel = CancellationToken::new();
    let git = ShellGit::default();
    let build = MavenClient::new("mvn", cancel.clone());
    let catalog = CatalogClient::new(
        config.release.catalog_url.clone(),
        config.release.bom_artifact.clone(),
    );
    let platform = OcClient::new("oc", cancel.clone());
    let confirm: ConfirmationGate<Empty, Sink> =
        ConfirmationGate::new(false, std::io::empty(), std::io::sink());
    let services = Services {
        git: &git,
        build: &build,
        catalog: &catalog,
        platform: &platform,
        confirm: &confirm,
        cancel: &cancel,
    };

    let workspace = Workspace::prepare(&config.fleet).unwrap();
    let descriptor = RepositoryDescriptor {
        name: NAME.to_string(),
        clone_url: origin.display().to_string(),
    };
    let fleet = Fleet::new(config, services);
    let repositories = fleet.select(&[descriptor], &workspace).unwrap();
    fleet.run(&repositories, operation).await
}

#[tokio::test]
async fn fleet_clones_and_creates_branch() {
    let temp = tempfile::tempdir().unwrap();
    let origin = seed_origin(&temp);
    let config = config_for(&temp, &["master", "sb-1.5.x", "sb-2.0.x"]);

    let operation = Operation::CreateBranch {
        name: "sb-1.5.x-candidate".to_string(),
    };
    let report = run_fleet(&config, &origin, &operation).await;

    insta::assert_snapshot!(report.to_string().trim_end(), @r"
    Processed (1):
      - master / spring-boot-crud-booster: created sb-1.5.x-candidate
    Failed (0):
    Ignored (2):
      - sb-1.5.x / spring-boot-crud-booster: branch sb-1.5.x-candidate already exists
      - sb-2.0.x / spring-boot-crud-booster: branch sb-2.0.x does not exist
    ");
    assert!(remote_refs(&origin).contains("refs/heads/sb-1.5.x-candidate"));

    let clone = temp.path().join("workspace").join(NAME);
    let upstream = run_git(&["rev-parse", "--abbrev-ref", "sb-1.5.x-candidate@{upstream}"], &clone);
    assert_eq!(upstream.trim(), "origin/sb-1.5.x-candidate");
    let current = run_git(&["rev-parse", "--abbrev-ref", "HEAD"], &clone);
    assert_eq!(current.trim(), "sb-1.5.x", "last processed branch stays checked out");
}

#[tokio::test]
async fn fleet_deletes_tag_locally_and_remotely() {
    let temp = tempfile::tempdir().unwrap();
    let origin = seed_origin(&temp);
    let config = config_for(&temp, &["master", "sb-1.5.x"]);

    let operation = Operation::DeleteTag {
        tag: "1.5.13-1".to_string(),
    };
    let report = run_fleet(&config, &origin, &operation).await;

    insta::assert_snapshot!(report.to_string().trim_end(), @r"
    Processed (1):
      - master / spring-boot-crud-booster: deleted tag 1.5.13-1
    Failed (0):
    Ignored (1):
      - sb-1.5.x / spring-boot-crud-booster: tag 1.5.13-1 does not exist
    ");
    assert!(!remote_refs(&origin).contains("refs/tags/1.5.13-1"));
    let clone = temp.path().join("workspace").join(NAME);
    assert!(run_git(&["tag", "--list"], &clone).trim().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn fleet_skips_branches_left_dirty_by_a_command() {
    let temp = tempfile::tempdir().unwrap();
    let origin = seed_origin(&temp);
    let config = config_for(&temp, &["master", "sb-1.5.x"]);

    let operation = Operation::Command {
        command: "touch marker".to_string(),
    };
    let report = run_fleet(&config, &origin, &operation).await;

    insta::assert_snapshot!(report.to_string().trim_end(), @r"
    Processed (1):
      - master / spring-boot-crud-booster
    Failed (0):
    Ignored (1):
      - sb-1.5.x / spring-boot-crud-booster: uncommitted changes
    ");
    assert!(temp.path().join("workspace").join(NAME).join("marker").exists());
}

#[cfg(unix)]
#[tokio::test]
async fn fleet_ignore_local_changes_processes_dirty_copies() {
    let temp = tempfile::tempdir().unwrap();
    let origin = seed_origin(&temp);
    let mut config = config_for(&temp, &["master", "sb-1.5.x"]);
    config.global.ignore_local_changes = true;

    let operation = Operation::Command {
        command: "echo run >> marker".to_string(),
    };
    let report = run_fleet(&config, &origin, &operation).await;

    assert_eq!(report.processed_outcomes().len(), 2);
    assert!(!report.has_failures());
    let marker = temp.path().join("workspace").join(NAME).join("marker");
    assert_eq!(std::fs::read_to_string(marker).unwrap(), "run\nrun\n");
}

#[tokio::test]
async fn fleet_revert_discards_local_work() {
    let temp = tempfile::tempdir().unwrap();
    let origin = seed_origin(&temp);
    let mut config = config_for(&temp, &["master"]);

    // First pass clones; then dirty the working copy by hand.
    run_fleet(&config, &origin, &Operation::Revert).await;
    let clone = temp.path().join("workspace").join(NAME);
    std::fs::write(clone.join("pom.xml"), "<project>edited</project>\n").unwrap();
    std::fs::write(clone.join("stray.txt"), "stray\n").unwrap();

    config.global.ignore_local_changes = true;
    let report = run_fleet(&config, &origin, &Operation::Revert).await;

    assert_eq!(report.processed_outcomes().len(), 1);
    assert_eq!(std::fs::read_to_string(clone.join("pom.xml")).unwrap(), "<project/>\n");
    assert!(!clone.join("stray.txt").exists());
}

#[tokio::test]
async fn fleet_command_reports_failed_pairs_without_failing() {
    let temp = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 1,
            "incomplete_results": false,
            "items": [{
                "name": NAME,
                "clone_url": format!("https://github.com/snowdrop/{NAME}.git"),
            }],
        })))
        .mount(&server)
        .await;

    // A working copy without an `origin` remote: every fetch fails.
    let orphan = temp.path().join("workspace").join(NAME);
    std::fs::create_dir_all(&orphan).unwrap();
    run_git(&["init", "--quiet", "-b", "master"], &orphan);

    let mut config = config_for(&temp, &["master"]);
    config.forge.api_url = server.uri();
    let operation = Operation::Command {
        command: "true".to_string(),
    };

    let result = run_fleet_command(&operation, &config, false).await;
    assert!(result.is_ok(), "failed pairs must not fail the run: {result:?}");
}
