use crate::error::{Result, VersionSyncError};
use crate::git::{VersionControl, WorkingTreeStatus};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Mock repository for testing without actual git operations
///
/// Staging a path removes it from the changed set once committed, so the
/// workflow sees the same before/after state a real repository would give.
pub struct MockRepository {
    root: PathBuf,
    changed: RefCell<BTreeSet<PathBuf>>,
    staged: RefCell<BTreeSet<PathBuf>>,
    tags: RefCell<BTreeSet<String>>,
    commits: RefCell<Vec<String>>,
}

impl MockRepository {
    /// Create a new clean mock repository rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        MockRepository {
            root: root.into(),
            changed: RefCell::new(BTreeSet::new()),
            staged: RefCell::new(BTreeSet::new()),
            tags: RefCell::new(BTreeSet::new()),
            commits: RefCell::new(Vec::new()),
        }
    }

    /// Mark a path (relative to the root) as modified
    pub fn add_change(&mut self, path: impl Into<PathBuf>) {
        self.changed.get_mut().insert(path.into());
    }

    /// Add an existing tag
    pub fn add_tag(&mut self, name: impl Into<String>) {
        self.tags.get_mut().insert(name.into());
    }

    /// Messages of the commits made so far
    pub fn commits(&self) -> Vec<String> {
        self.commits.borrow().clone()
    }

    /// Tags currently present
    pub fn tags(&self) -> BTreeSet<String> {
        self.tags.borrow().clone()
    }
}

impl VersionControl for MockRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn status(&self) -> Result<WorkingTreeStatus> {
        Ok(WorkingTreeStatus {
            changed_paths: self.changed.borrow().clone(),
        })
    }

    fn list_tags(&self) -> Result<BTreeSet<String>> {
        Ok(self.tags.borrow().clone())
    }

    fn add_to_index(&self, relative_path: &Path) -> Result<()> {
        self.staged.borrow_mut().insert(relative_path.to_path_buf());
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        let staged = std::mem::take(&mut *self.staged.borrow_mut());
        let mut changed = self.changed.borrow_mut();
        for path in &staged {
            changed.remove(path);
        }
        self.commits.borrow_mut().push(message.to_string());
        Ok(())
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        if !self.tags.borrow_mut().insert(name.to_string()) {
            return Err(VersionSyncError::TagAlreadyExists(name.to_string()));
        }
        Ok(())
    }
}
