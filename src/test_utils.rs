// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared test utilities.
//!
//! In-memory stand-ins for git, Maven, the catalog and the platform, plus
//! log capture for dry-run output.

use crate::build::{BuildClient, PROJECT_VERSION};
use crate::config::Config;
use crate::confirm::{Confirm, Decision};
use crate::context::{RepoContext, Services};
use crate::error::{BoosterResult, BuildError, GitError, NetworkError};
use crate::fleet::Repository;
use crate::git::{RepositoryClient, WorkingTreeStatus};
use crate::net::CatalogSource;
use crate::platform::PlatformClient;
use anyhow::Result;
use futures_util::future::BoxFuture;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;
use wax::{Glob, Program};

/// One fake working copy and its remote.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeRepo {
    pub version: String,
    pub properties: BTreeMap<String, String>,
    pub branches: BTreeSet<String>,
    pub remote_branches: BTreeSet<String>,
    pub current: Option<String>,
    pub tags: BTreeSet<String>,
    pub remote_tags: BTreeSet<String>,
    /// Changes made outside the tool.
    pub dirty: bool,
    /// Changes made through the build client, not yet committed.
    pub pending: bool,
    pub commits: Vec<String>,
    /// Every git/build call that changes something, in order.
    pub log: Vec<String>,
    /// Version and properties of branches that are not checked out.
    parked: BTreeMap<String, (String, BTreeMap<String, String>)>,
}

impl FakeRepo {
    /// On `master`, tracking `origin/master`.
    pub(crate) fn at_version(version: &str) -> Self {
        Self {
            version: version.to_string(),
            branches: BTreeSet::from(["master".to_string()]),
            remote_branches: BTreeSet::from(["master".to_string()]),
            current: Some("master".to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn with_remote_branch(mut self, branch: &str) -> Self {
        self.remote_branches.insert(branch.to_string());
        self
    }

    pub(crate) fn with_tags(mut self, tags: &[&str]) -> Self {
        for tag in tags {
            self.tags.insert((*tag).to_string());
            self.remote_tags.insert((*tag).to_string());
        }
        self
    }

    pub(crate) fn with_property(mut self, name: &str, value: &str) -> Self {
        self.properties.insert(name.to_string(), value.to_string());
        self
    }

    /// Checked out on `branch` instead of `master`.
    pub(crate) fn on_branch(mut self, branch: &str) -> Self {
        self.branches.insert(branch.to_string());
        self.remote_branches.insert(branch.to_string());
        self.current = Some(branch.to_string());
        self
    }

    fn snapshot(&self) -> (String, BTreeMap<String, String>) {
        (self.version.clone(), self.properties.clone())
    }
}

#[derive(Debug, Default)]
struct FleetState {
    repos: BTreeMap<PathBuf, FakeRepo>,
    boms: BTreeMap<(String, String), String>,
    catalog_calls: usize,
    /// `op` fails everywhere, `op:<dir name>` in one repository.
    failing: BTreeSet<String>,
}

/// Fake git + Maven + catalog over shared state.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeFleet {
    state: Arc<Mutex<FleetState>>,
}

fn git_failure(op: &str) -> GitError {
    GitError::CommandFailed {
        command: format!("git {op}"),
        message: "injected failure".to_string(),
    }
}

impl FakeFleet {
    fn lock(&self) -> MutexGuard<'_, FleetState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub(crate) fn add_repo(&self, path: &Path, repo: FakeRepo) {
        self.lock().repos.insert(path.to_path_buf(), repo);
    }

    pub(crate) fn repo(&self, path: &Path) -> FakeRepo {
        self.lock().repos.get(path).cloned().unwrap_or_default()
    }

    pub(crate) fn update(&self, path: &Path, f: impl FnOnce(&mut FakeRepo)) {
        if let Some(repo) = self.lock().repos.get_mut(path) {
            f(repo);
        }
    }

    pub(crate) fn set_bom(&self, base: &str, qualifier: &str, version: &str) {
        self.lock()
            .boms
            .insert((base.to_string(), qualifier.to_string()), version.to_string());
    }

    pub(crate) fn catalog_calls(&self) -> usize {
        self.lock().catalog_calls
    }

    pub(crate) fn fail(&self, key: &str) {
        self.lock().failing.insert(key.to_string());
    }

    fn should_fail(state: &FleetState, op: &str, repo: &Path) -> bool {
        let name = repo.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        state.failing.contains(op) || state.failing.contains(&format!("{op}:{name}"))
    }

    /// Run `f` on the repository at `repo`, failing when `op` is injected.
    fn with<T>(
        &self,
        op: &str,
        repo: &Path,
        f: impl FnOnce(&mut FakeRepo) -> Result<T, GitError>,
    ) -> BoosterResult<T> {
        let mut state = self.lock();
        if Self::should_fail(&state, op, repo) {
            return Err(git_failure(op).into());
        }
        let fake = state.repos.get_mut(repo).ok_or_else(|| GitError::RepoNotFound {
            path: repo.display().to_string(),
        })?;
        Ok(f(fake)?)
    }
}

impl RepositoryClient for FakeFleet {
    fn is_repository(&self, path: &Path) -> bool {
        self.lock().repos.contains_key(path)
    }

    fn clone_repo(&self, url: &str, dest: &Path) -> BoosterResult<()> {
        let mut state = self.lock();
        if Self::should_fail(&state, "clone", dest) {
            return Err(GitError::CloneFailed {
                url: url.to_string(),
                message: "injected failure".to_string(),
            }
            .into());
        }
        std::fs::create_dir_all(dest)?;
        let mut repo = FakeRepo::at_version("1.0.0-1-SNAPSHOT");
        repo.log.push(format!("clone {url}"));
        state.repos.insert(dest.to_path_buf(), repo);
        Ok(())
    }

    fn current_branch(&self, repo: &Path) -> BoosterResult<Option<String>> {
        self.with("current_branch", repo, |r| Ok(r.current.clone()))
    }

    fn status(&self, repo: &Path) -> BoosterResult<WorkingTreeStatus> {
        self.with("status", repo, |r| {
            let changed = if r.dirty || r.pending {
                vec!["pom.xml".to_string()]
            } else {
                Vec::new()
            };
            Ok(WorkingTreeStatus::new(changed))
        })
    }

    fn fetch(&self, repo: &Path, remote: &str) -> BoosterResult<()> {
        self.with("fetch", repo, |r| {
            r.log.push(format!("fetch {remote}"));
            Ok(())
        })
    }

    fn local_branch_exists(&self, repo: &Path, branch: &str) -> BoosterResult<bool> {
        self.with("show-ref", repo, |r| Ok(r.branches.contains(branch)))
    }

    fn remote_tracking_exists(
        &self,
        repo: &Path,
        _remote: &str,
        branch: &str,
    ) -> BoosterResult<bool> {
        self.with("show-ref", repo, |r| Ok(r.remote_branches.contains(branch)))
    }

    fn remote_has_ref(&self, repo: &Path, _remote: &str, refname: &str) -> BoosterResult<bool> {
        self.with("ls-remote", repo, |r| {
            Ok(match refname.strip_prefix("refs/tags/") {
                Some(tag) => r.remote_tags.contains(tag),
                None => r
                    .remote_branches
                    .contains(refname.strip_prefix("refs/heads/").unwrap_or(refname)),
            })
        })
    }

    fn create_branch(&self, repo: &Path, name: &str, start_point: &str) -> BoosterResult<()> {
        self.with("branch", repo, |r| {
            if !r.branches.insert(name.to_string()) {
                return Err(git_failure("branch"));
            }
            let state = match r.parked.get(start_point) {
                Some(parked) if r.current.as_deref() != Some(start_point) => parked.clone(),
                _ => r.snapshot(),
            };
            r.parked.insert(name.to_string(), state);
            r.log.push(format!("branch {name} {start_point}"));
            Ok(())
        })
    }

    fn create_tracking_branch(
        &self,
        repo: &Path,
        branch: &str,
        remote: &str,
    ) -> BoosterResult<()> {
        self.with("branch", repo, |r| {
            r.branches.insert(branch.to_string());
            r.log.push(format!("track {remote}/{branch}"));
            Ok(())
        })
    }

    fn checkout(&self, repo: &Path, what: &str) -> BoosterResult<()> {
        self.with("checkout", repo, |r| {
            if !r.branches.contains(what) {
                return Err(git_failure("checkout"));
            }
            if let Some(current) = r.current.clone() {
                let state = r.snapshot();
                r.parked.insert(current, state);
            }
            if let Some((version, properties)) = r.parked.get(what).cloned() {
                r.version = version;
                r.properties = properties;
            }
            r.current = Some(what.to_string());
            r.log.push(format!("checkout {what}"));
            Ok(())
        })
    }

    fn delete_branch(&self, repo: &Path, name: &str) -> BoosterResult<()> {
        self.with("delete_branch", repo, |r| {
            if !r.branches.remove(name) {
                return Err(git_failure("delete_branch"));
            }
            r.parked.remove(name);
            r.log.push(format!("delete branch {name}"));
            Ok(())
        })
    }

    fn rebase(&self, repo: &Path, onto: &str) -> BoosterResult<()> {
        self.with("rebase", repo, |r| {
            r.log.push(format!("rebase {onto}"));
            Ok(())
        })
    }

    fn reset_hard(&self, repo: &Path, target: &str) -> BoosterResult<()> {
        self.with("reset", repo, |r| {
            r.dirty = false;
            r.pending = false;
            r.log.push(format!("reset --hard {target}"));
            Ok(())
        })
    }

    fn clean(&self, repo: &Path) -> BoosterResult<()> {
        self.with("clean", repo, |r| {
            r.log.push("clean".to_string());
            Ok(())
        })
    }

    fn commit_all(&self, repo: &Path, message: &str) -> BoosterResult<bool> {
        self.with("commit", repo, |r| {
            if !(r.dirty || r.pending) {
                return Ok(false);
            }
            r.dirty = false;
            r.pending = false;
            r.commits.push(message.to_string());
            r.log.push(format!("commit {message}"));
            Ok(true)
        })
    }

    fn tag_exists(&self, repo: &Path, tag: &str) -> BoosterResult<bool> {
        self.with("show-ref", repo, |r| Ok(r.tags.contains(tag)))
    }

    fn create_tag(&self, repo: &Path, tag: &str, _message: &str) -> BoosterResult<()> {
        self.with("tag", repo, |r| {
            r.tags.insert(tag.to_string());
            r.log.push(format!("tag {tag}"));
            Ok(())
        })
    }

    fn delete_tag(&self, repo: &Path, tag: &str) -> BoosterResult<()> {
        self.with("delete_tag", repo, |r| {
            r.tags.remove(tag);
            r.log.push(format!("delete tag {tag}"));
            Ok(())
        })
    }

    fn list_tags(&self, repo: &Path, pattern: &str) -> BoosterResult<Vec<String>> {
        self.with("tag", repo, |r| {
            let glob = Glob::new(pattern).map_err(|_| git_failure("tag --list"))?;
            Ok(r.tags.iter().filter(|t| glob.is_match(t.as_str())).cloned().collect())
        })
    }

    fn push(
        &self,
        repo: &Path,
        remote: &str,
        refspecs: &[String],
        _set_upstream: bool,
    ) -> BoosterResult<()> {
        self.with("push", repo, |r| {
            for spec in refspecs {
                match spec.strip_prefix("refs/tags/") {
                    Some(tag) => r.remote_tags.insert(tag.to_string()),
                    None => r.remote_branches.insert(spec.clone()),
                };
            }
            r.log.push(format!("push {remote} {}", refspecs.join(" ")));
            Ok(())
        })
    }

    fn push_delete(&self, repo: &Path, remote: &str, refname: &str) -> BoosterResult<()> {
        self.with("push", repo, |r| {
            match refname.strip_prefix("refs/tags/") {
                Some(tag) => r.remote_tags.remove(tag),
                None => r.remote_branches.remove(refname),
            };
            r.log.push(format!("push --delete {remote} {refname}"));
            Ok(())
        })
    }
}

impl FakeFleet {
    fn build_step<T>(
        &self,
        op: &str,
        repo: &Path,
        f: impl FnOnce(&mut FakeRepo) -> BoosterResult<T>,
    ) -> BoosterResult<T> {
        let mut state = self.lock();
        if Self::should_fail(&state, op, repo) {
            return Err(BuildError::CommandFailed {
                goal: op.to_string(),
                message: "injected failure".to_string(),
            }
            .into());
        }
        let fake = state.repos.get_mut(repo).ok_or_else(|| GitError::RepoNotFound {
            path: repo.display().to_string(),
        })?;
        f(fake)
    }
}

impl BuildClient for FakeFleet {
    fn evaluate<'a>(
        &'a self,
        repo: &'a Path,
        expression: &'a str,
    ) -> BoxFuture<'a, BoosterResult<String>> {
        Box::pin(async move {
            self.build_step("evaluate", repo, |r| {
                if expression == PROJECT_VERSION {
                    return Ok(r.version.clone());
                }
                r.properties.get(expression).cloned().ok_or_else(|| {
                    BuildError::PropertyNotFound {
                        expression: expression.to_string(),
                    }
                    .into()
                })
            })
        })
    }

    fn set_version<'a>(
        &'a self,
        repo: &'a Path,
        version: &'a str,
    ) -> BoxFuture<'a, BoosterResult<()>> {
        Box::pin(async move {
            self.build_step("set_version", repo, |r| {
                if r.version != version {
                    r.version = version.to_string();
                    r.pending = true;
                }
                r.log.push(format!("set version {version}"));
                Ok(())
            })
        })
    }

    fn set_property<'a>(
        &'a self,
        repo: &'a Path,
        name: &'a str,
        value: &'a str,
    ) -> BoxFuture<'a, BoosterResult<()>> {
        Box::pin(async move {
            self.build_step("set_property", repo, |r| {
                r.properties.insert(name.to_string(), value.to_string());
                r.pending = true;
                r.log.push(format!("set {name}={value}"));
                Ok(())
            })
        })
    }

    fn verify_dependencies<'a>(&'a self, repo: &'a Path) -> BoxFuture<'a, BoosterResult<()>> {
        Box::pin(async move {
            self.build_step("verify", repo, |r| {
                r.log.push("verify".to_string());
                Ok(())
            })
        })
    }

    fn build<'a>(&'a self, repo: &'a Path, skip_tests: bool) -> BoxFuture<'a, BoosterResult<()>> {
        Box::pin(async move {
            self.build_step("build", repo, |r| {
                r.log.push(format!("build skip_tests={skip_tests}"));
                Ok(())
            })
        })
    }

    fn run_goals<'a>(
        &'a self,
        repo: &'a Path,
        goals: &'a [String],
    ) -> BoxFuture<'a, BoosterResult<()>> {
        Box::pin(async move {
            self.build_step("goals", repo, |r| {
                r.log.push(format!("mvn {}", goals.join(" ")));
                Ok(())
            })
        })
    }
}

impl CatalogSource for FakeFleet {
    fn bom_version<'a>(
        &'a self,
        base: &'a str,
        qualifier: &'a str,
    ) -> BoxFuture<'a, BoosterResult<String>> {
        Box::pin(async move {
            let mut state = self.lock();
            state.catalog_calls += 1;
            state
                .boms
                .get(&(base.to_string(), qualifier.to_string()))
                .cloned()
                .ok_or_else(|| {
                    NetworkError::ArtifactNotFound {
                        artifact: "me.snowdrop:spring-boot-bom".to_string(),
                        url: format!("fake://{base}.{qualifier}"),
                    }
                    .into()
                })
        })
    }
}

/// Records platform calls; pods become ready after `ready_after` polls.
#[derive(Debug, Default)]
pub(crate) struct FakePlatform {
    pub calls: Mutex<Vec<String>>,
    /// Template contents as they were when applied.
    pub applied: Mutex<Vec<String>>,
    pub ready_after: usize,
    pub fail_deploy: bool,
}

impl FakePlatform {
    fn record(&self, call: String) -> usize {
        let mut calls = self.calls.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        calls.push(call);
        calls.iter().filter(|c| c.starts_with("ready_pods")).count()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn applied(&self) -> Vec<String> {
        self.applied
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl PlatformClient for FakePlatform {
    fn new_project<'a>(&'a self, project: &'a str) -> BoxFuture<'a, BoosterResult<()>> {
        Box::pin(async move {
            self.record(format!("new_project {project}"));
            Ok(())
        })
    }

    fn delete_project<'a>(&'a self, project: &'a str) -> BoxFuture<'a, BoosterResult<()>> {
        Box::pin(async move {
            self.record(format!("delete_project {project}"));
            Ok(())
        })
    }

    fn apply_template<'a>(
        &'a self,
        _repo: &'a Path,
        file: &'a Path,
        project: &'a str,
    ) -> BoxFuture<'a, BoosterResult<()>> {
        Box::pin(async move {
            let name = file.file_name().map(|n| n.to_string_lossy().into_owned());
            self.record(format!("apply {} {project}", name.unwrap_or_default()));
            if let Ok(content) = std::fs::read_to_string(file) {
                self.applied
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .push(content);
            }
            if self.fail_deploy {
                return Err(crate::error::bail_out("apply failed"));
            }
            Ok(())
        })
    }

    fn start_build<'a>(
        &'a self,
        _repo: &'a Path,
        name: &'a str,
        project: &'a str,
    ) -> BoxFuture<'a, BoosterResult<()>> {
        Box::pin(async move {
            self.record(format!("start_build {name} {project}"));
            Ok(())
        })
    }

    fn ready_pods<'a>(
        &'a self,
        project: &'a str,
        _selector: &'a str,
    ) -> BoxFuture<'a, BoosterResult<usize>> {
        Box::pin(async move {
            let polls = self.record(format!("ready_pods {project}"));
            Ok(usize::from(polls > self.ready_after))
        })
    }
}

/// Fixed answer; remembers what was asked.
#[derive(Debug)]
pub(crate) struct ScriptedConfirm {
    answer: Decision,
    pub asked: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub(crate) const fn new(answer: Decision) -> Self {
        Self {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, action: &str) -> Result<Decision> {
        self.asked
            .lock()
            .map_err(|_| anyhow::anyhow!("poisoned"))?
            .push(action.to_string());
        Ok(self.answer)
    }
}

/// A temporary workspace wired to the fakes.
pub(crate) struct Harness {
    pub temp: TempDir,
    pub config: Config,
    pub fleet: FakeFleet,
    pub platform: FakePlatform,
    pub confirm: ScriptedConfirm,
    pub cancel: CancellationToken,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let temp = tempfile::tempdir().expect("failed to create temp dir");
        let mut config = Config::default();
        config.fleet.workspace = temp.path().to_path_buf();
        config.platform.poll_interval_secs = 1;
        config.platform.wait_timeout_secs = 5;
        Self {
            temp,
            config,
            fleet: FakeFleet::default(),
            platform: FakePlatform::default(),
            confirm: ScriptedConfirm::new(Decision::Yes),
            cancel: CancellationToken::new(),
        }
    }

    pub(crate) fn services(&self) -> Services<'_> {
        Services {
            git: &self.fleet,
            build: &self.fleet,
            catalog: &self.fleet,
            platform: &self.platform,
            confirm: &self.confirm,
            cancel: &self.cancel,
        }
    }

    /// A repository whose working copy directory exists and is known to the fake.
    pub(crate) fn repository(&self, name: &str, fake: FakeRepo) -> Repository {
        let path = self.temp.path().join(name);
        std::fs::create_dir_all(&path).expect("failed to create working copy");
        self.fleet.add_repo(&path, fake);
        Repository {
            name: name.to_string(),
            short_name: crate::fleet::repository::short_name(
                name,
                &self.config.fleet.name_prefix,
                &self.config.fleet.name_suffix,
            )
            .to_string(),
            clone_url: format!("https://example.com/{name}.git"),
            path,
        }
    }

    pub(crate) fn ctx<'a>(&'a self, repository: &'a Repository, branch: &'a str) -> RepoContext<'a> {
        RepoContext::new(repository, branch, &self.config)
    }
}

#[derive(Clone)]
struct BufferWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| std::io::Error::other("buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
struct BufferMakeWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl<'a> MakeWriter<'a> for BufferMakeWriter {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter {
            buffer: self.buffer.clone(),
        }
    }
}

/// Runs an async closure while capturing tracing output.
///
/// Returns the captured log output as a string.
pub(crate) async fn run_with_logs<F, Fut>(f: F) -> Result<String>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<()>>,
{
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(BufferMakeWriter {
            buffer: buffer.clone(),
        })
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .with_target(false)
        .with_level(false)
        .finish();

    let _guard = tracing::subscriber::set_default(subscriber);
    f().await?;

    let guard = buffer
        .lock()
        .map_err(|_| anyhow::anyhow!("log buffer poisoned"))?;
    Ok(String::from_utf8_lossy(&guard).to_string())
}
