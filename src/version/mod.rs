// booster-rs: Booster Fleet Release Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Booster version scheme.
//!
//! ```text
//!   1.5.13 - 2 - redhat - SNAPSHOT
//!   ^^^^^^   ^   ^^^^^^   ^^^^^^^^
//!   base     |   qualifier (optional)
//!            revision     snapshot flag (optional)
//! ```
//!
//! Ordering looks at the numeric base segments (missing segments count as
//! zero) and then the revision. Qualifier and snapshot flag never take part
//! in ordering, so `1.5.13-2-redhat` and `1.5.13-2` compare equal even though
//! they are different versions.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::VersionError;

const VERSION_PATTERN: &str =
    r"^([0-9]+(?:\.[0-9]+){0,2})-([0-9]+)(?:-([A-Za-z0-9]+))?(?:-(SNAPSHOT))?$";

const SNAPSHOT: &str = "SNAPSHOT";

fn version_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(VERSION_PATTERN).ok()).as_ref()
}

/// A parsed booster version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    base: String,
    revision: u64,
    qualifier: Option<String>,
    snapshot: bool,
}

impl Version {
    /// Creates a release version without qualifier.
    pub fn new(base: impl Into<String>, revision: u64) -> Self {
        Self {
            base: base.into(),
            revision,
            qualifier: None,
            snapshot: false,
        }
    }

    #[must_use]
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    #[must_use]
    pub const fn with_snapshot(mut self, snapshot: bool) -> Self {
        self.snapshot = snapshot;
        self
    }

    /// Parses `<base>-<n>[-<qualifier>][-SNAPSHOT]`.
    ///
    /// A lone trailing `SNAPSHOT` is the snapshot marker, not a qualifier.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::Invalid`] carrying the raw input when it does
    /// not match the scheme.
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let invalid = || VersionError::Invalid {
            raw: raw.to_string(),
        };

        let captures = version_regex()
            .and_then(|re| re.captures(raw))
            .ok_or_else(invalid)?;

        let base = captures.get(1).ok_or_else(invalid)?.as_str().to_string();
        let revision = captures
            .get(2)
            .ok_or_else(invalid)?
            .as_str()
            .parse::<u64>()
            .map_err(|_| invalid())?;

        let mut qualifier = captures.get(3).map(|m| m.as_str().to_string());
        let mut snapshot = captures.get(4).is_some();
        if !snapshot && qualifier.as_deref() == Some(SNAPSHOT) {
            qualifier = None;
            snapshot = true;
        }

        Ok(Self {
            base,
            revision,
            qualifier,
            snapshot,
        })
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    #[must_use]
    pub const fn is_snapshot(&self) -> bool {
        self.snapshot
    }

    fn base_segments(&self) -> [u64; 3] {
        let mut segments = [0; 3];
        for (slot, part) in segments.iter_mut().zip(self.base.split('.')) {
            *slot = part.parse().unwrap_or(0);
        }
        segments
    }

    /// Orders by base segments, then revision.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.base_segments()
            .cmp(&other.base_segments())
            .then(self.revision.cmp(&other.revision))
    }

    #[must_use]
    pub fn is_newer_than(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Greater
    }

    /// Same base, revision + 1; qualifier and snapshot flag are kept.
    ///
    /// # Errors
    ///
    /// [`VersionError::RevisionOverflow`] when the revision is already `u64::MAX`.
    pub fn next_revision(&self) -> Result<Self, VersionError> {
        Ok(Self {
            revision: self.bumped_revision()?,
            ..self.clone()
        })
    }

    /// This version with the snapshot flag cleared.
    #[must_use]
    pub fn release_version(&self) -> Self {
        Self {
            snapshot: false,
            ..self.clone()
        }
    }

    /// `base-(revision+1)[-qualifier]-SNAPSHOT`.
    ///
    /// # Errors
    ///
    /// Same as [`Version::next_revision`].
    pub fn next_snapshot_version(&self) -> Result<Self, VersionError> {
        Ok(Self {
            revision: self.bumped_revision()?,
            snapshot: true,
            ..self.clone()
        })
    }

    fn bumped_revision(&self) -> Result<u64, VersionError> {
        self.revision
            .checked_add(1)
            .ok_or_else(|| VersionError::RevisionOverflow { raw: self.to_string() })
    }

    /// `base-n-marker`, the downstream production tag for this base.
    #[must_use]
    pub fn production_tag(&self, n: u64, marker: &str) -> Self {
        Self::new(self.base.clone(), n).with_qualifier(marker)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.base, self.revision)?;
        if let Some(qualifier) = &self.qualifier {
            write!(f, "-{qualifier}")?;
        }
        if self.snapshot {
            write!(f, "-{SNAPSHOT}")?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Highest release among `tags` that parse as versions without qualifier.
pub fn latest_upstream<'a, I>(tags: I) -> Option<Version>
where
    I: IntoIterator<Item = &'a str>,
{
    tags.into_iter()
        .filter_map(|tag| Version::parse(tag).ok())
        .filter(|v| v.qualifier().is_none() && !v.is_snapshot())
        .max_by(Version::compare)
}

/// Next production number for `base`: highest `n` among `base-n-marker` tags, plus one.
pub fn next_production_number<'a, I>(tags: I, base: &str, marker: &str) -> u64
where
    I: IntoIterator<Item = &'a str>,
{
    tags.into_iter()
        .filter_map(|tag| Version::parse(tag).ok())
        .filter(|v| v.base() == base && v.qualifier() == Some(marker) && !v.is_snapshot())
        .map(|v| v.revision())
        .max()
        .map_or(1, |n| n.saturating_add(1))
}
