use crate::domain::Version;
use crate::error::{Result, VersionSyncError};
use std::fmt;

/// Default tag naming pattern, producing `Version_1.2.3`
pub const DEFAULT_TAG_PATTERN: &str = "Version_{version}";

const PLACEHOLDER: &str = "{version}";

/// Name of a version tag in the repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagName(String);

impl TagName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tag naming pattern (e.g., "Version_{version}", "release-{version}")
#[derive(Debug, Clone)]
pub struct TagPattern {
    pattern: String,
}

impl TagPattern {
    /// Create a tag pattern, rejecting patterns without the `{version}` placeholder
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if !pattern.contains(PLACEHOLDER) {
            return Err(VersionSyncError::config(format!(
                "Tag pattern '{}' must contain {} placeholder",
                pattern, PLACEHOLDER
            )));
        }
        Ok(TagPattern { pattern })
    }

    /// Format a version according to pattern
    /// Example: pattern="Version_{version}", version=1.2.3 -> "Version_1.2.3"
    pub fn format(&self, version: &Version) -> TagName {
        TagName(self.pattern.replace(PLACEHOLDER, &version.to_string()))
    }
}

impl Default for TagPattern {
    fn default() -> Self {
        TagPattern {
            pattern: DEFAULT_TAG_PATTERN.to_string(),
        }
    }
}
