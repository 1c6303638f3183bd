use crate::error::{Result, VersionSyncError};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
///
/// Wraps [`semver::Version`] for parsing and canonical formatting, but compares
/// by precedence only: build metadata never takes part in equality or ordering.
#[derive(Debug, Clone)]
pub struct Version {
    inner: semver::Version,
}

impl Version {
    /// Create a release version without pre-release or build identifiers
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            inner: semver::Version::new(major, minor, patch),
        }
    }

    /// Parse `MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]`
    ///
    /// Leading zeros in numeric identifiers, missing components, prefixes like
    /// `v` and surrounding whitespace are all rejected. Two-part versions such
    /// as `2.4` are refused rather than padded to `2.4.0`.
    pub fn parse(text: &str) -> Result<Self> {
        semver::Version::parse(text)
            .map(|inner| Version { inner })
            .map_err(|_| VersionSyncError::invalid_version(text))
    }

    pub fn major(&self) -> u64 {
        self.inner.major
    }

    pub fn minor(&self) -> u64 {
        self.inner.minor
    }

    pub fn patch(&self) -> u64 {
        self.inner.patch
    }

    /// Dot-separated pre-release identifiers, empty for a release
    pub fn pre_release(&self) -> Vec<&str> {
        split_identifiers(self.inner.pre.as_str())
    }

    /// Dot-separated build metadata identifiers, empty when absent
    pub fn build_metadata(&self) -> Vec<&str> {
        split_identifiers(self.inner.build.as_str())
    }

    pub fn is_pre_release(&self) -> bool {
        !self.inner.pre.is_empty()
    }

    pub fn increment_major(&self) -> Self {
        Version::new(self.major() + 1, 0, 0)
    }

    pub fn increment_minor(&self) -> Self {
        Version::new(self.major(), self.minor() + 1, 0)
    }

    pub fn increment_patch(&self) -> Self {
        Version::new(self.major(), self.minor(), self.patch() + 1)
    }

    /// Bump version according to bump type
    pub fn bump(&self, bump_type: VersionBump) -> Self {
        match bump_type {
            VersionBump::Major => self.increment_major(),
            VersionBump::Minor => self.increment_minor(),
            VersionBump::Patch => self.increment_patch(),
        }
    }
}

fn split_identifiers(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split('.').collect()
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        // semver::Prerelease already orders an empty pre-release above any other
        (
            self.inner.major,
            self.inner.minor,
            self.inner.patch,
            &self.inner.pre,
        )
            .cmp(&(
                other.inner.major,
                other.inner.minor,
                other.inner.patch,
                &other.inner.pre,
            ))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl FromStr for Version {
    type Err = VersionSyncError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionBump::Major => "major",
            VersionBump::Minor => "minor",
            VersionBump::Patch => "patch",
        };
        f.write_str(name)
    }
}
