// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!              BoosterError (~24 bytes)
//!                     |
//!   +-----+-----+-----+-----+-----+-----+-----+-----+
//!   |     |     |     |     |     |     |     |     |
//!   v     v     v     v     v     v     v     v     v
//! Bail   Git  Build  Net   Cfg  Proc  Ver   Rel  Fs/Io
//! Box<str> Box  Box   Box   Box   Box   Box   Box  Box
//!
//! Sub-errors (unboxed internally):
//!   Git      Gix, CommandFailed, CloneFailed
//!   Build    CommandFailed, PropertyNotFound
//!   Network  Reqwest, HttpError, ArtifactNotFound
//!   Config   ParseError, InvalidValue, NoRepositories, UnknownFunction
//!   Process  SpawnFailed, NonZeroExit, Timeout
//!   Version  Invalid, RevisionOverflow
//!   Release  NotSnapshot, Regression, TagExists, ...
//!   Fs       NotFound, IoError
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`BoosterError`].
pub type BoosterResult<T> = std::result::Result<T, BoosterError>;

/// Top-level library error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum BoosterError {
    /// Fatal error that should terminate the run.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Maven invocation failed.
    #[error("build error: {0}")]
    Build(#[from] Box<BuildError>),

    /// Network operation failed.
    #[error("network error: {0}")]
    Network(#[from] Box<NetworkError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Version string could not be understood.
    #[error("version error: {0}")]
    Version(#[from] Box<VersionError>),

    /// A release precondition was violated.
    #[error("release error: {0}")]
    Release(#[from] Box<ReleaseError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

/// Create a fatal [`BoosterError::Bailed`] that terminates the run.
pub fn bail_out(message: impl Into<String>) -> BoosterError {
    BoosterError::Bailed(message.into().into_boxed_str())
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for BoosterError {
                fn from(err: $error) -> Self {
                    BoosterError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    GitError => Git,
    BuildError => Build,
    NetworkError => Network,
    ConfigError => Config,
    ProcessError => Process,
    VersionError => Version,
    ReleaseError => Release,
    FsError => Fs,
    std::io::Error => Io,
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to open repository.
    #[error("failed to open repository: {0}")]
    Open(#[from] Box<gix::open::Error>),

    /// Failed to get HEAD reference.
    #[error("failed to get head reference: {0}")]
    Head(#[from] gix::reference::find::existing::Error),
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Path is not a git working copy.
    #[error("repository not found: {path}")]
    RepoNotFound { path: String },

    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),

    /// Clone operation failed.
    #[error("failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },
}

// --- Build Errors ---

/// Maven invocation errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A Maven goal failed.
    #[error("mvn {goal} failed: {message}")]
    CommandFailed { goal: String, message: String },

    /// An expression evaluated to nothing.
    #[error("expression '{expression}' has no value")]
    PropertyNotFound { expression: String },

    /// The dependency tree reported problems.
    #[error("dependency verification failed: {message}")]
    DependencyProblems { message: String },
}

// --- Network Errors ---

/// Network operation errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP error response.
    #[error("http error {status}: {url}")]
    HttpError { status: u16, url: String },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Artifact listing does not mention the requested artifact.
    #[error("artifact '{artifact}' not listed at {url}")]
    ArtifactNotFound { artifact: String, url: String },

    /// Response body could not be decoded.
    #[error("unexpected response from {url}: {message}")]
    InvalidResponse { url: String, message: String },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// Repository discovery returned nothing.
    #[error("no repositories found for query '{query}'")]
    NoRepositories { query: String },

    /// Unknown operation name passed to `fn`.
    #[error("unknown function '{name}' (known: {known})")]
    UnknownFunction { name: String, known: String },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },

    /// Process or wait timed out.
    #[error("'{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },
}

// --- Version Errors ---

/// Version parsing errors.
#[derive(Debug, Error)]
pub enum VersionError {
    /// Input does not follow `<base>-<n>[-<qualifier>][-SNAPSHOT]`.
    #[error("invalid version '{raw}'")]
    Invalid { raw: String },

    /// Revision cannot be incremented any further.
    #[error("revision of '{raw}' cannot be incremented")]
    RevisionOverflow { raw: String },
}

// --- Release Errors ---

/// Release precondition violations.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// Project version is already a release.
    #[error("cannot release a non-snapshot version {version}")]
    NotSnapshot { version: String },

    /// Qualifier is not in the allow-list.
    #[error("qualifier '{qualifier}' is not allowed (allowed: {allowed})")]
    QualifierNotAllowed { qualifier: String, allowed: String },

    /// Release would not be newer than the latest tag.
    #[error("version regression: {release} is not newer than latest tag {latest}")]
    Regression { release: String, latest: String },

    /// Tag is already present.
    #[error("tag {tag} already exists")]
    TagExists { tag: String },

    /// Templates exist but none contains the placeholder.
    #[error("no template under {dir} contains the placeholder '{token}'")]
    TemplateTokenMissing { dir: String, token: String },

    /// Production tags are only cut from the primary branch.
    #[error("production tags must be created on {primary}, current branch is {current}")]
    NotOnPrimaryBranch { primary: String, current: String },
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path not found.
    #[error("path not found: {0}")]
    NotFound(String),

    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
