//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the few version-control
//! operations the tagging workflow needs, allowing for multiple implementations
//! including real Git repositories and mock implementations for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [VersionControl] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing
//!
//! # Usage
//!
//! ```rust
//! # use version_sync::git::VersionControl;
//! # fn example<R: VersionControl>(repo: &R) -> version_sync::Result<()> {
//! let status = repo.status()?;
//! if !status.has_uncommitted_changes() && !repo.list_tags()?.contains("Version_1.0.0") {
//!     repo.create_tag("Version_1.0.0")?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Working tree state relative to HEAD
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingTreeStatus {
    /// Modified, staged, deleted or untracked paths, relative to the repository root
    pub changed_paths: BTreeSet<PathBuf>,
}

impl WorkingTreeStatus {
    pub fn has_uncommitted_changes(&self) -> bool {
        !self.changed_paths.is_empty()
    }
}

/// Version-control operations consumed by the tagging workflow
///
/// Calls are sequential and blocking; failures are never retried.
pub trait VersionControl {
    /// Working directory root of the repository
    fn root(&self) -> &Path;

    /// Current working tree status, ignored files excluded
    fn status(&self) -> Result<WorkingTreeStatus>;

    /// Names of all tags in the repository
    fn list_tags(&self) -> Result<BTreeSet<String>>;

    /// Stage a path given relative to the repository root
    fn add_to_index(&self, relative_path: &Path) -> Result<()>;

    /// Commit the index on top of HEAD
    fn commit(&self, message: &str) -> Result<()>;

    /// Create a lightweight tag pointing at HEAD
    fn create_tag(&self, name: &str) -> Result<()>;
}
