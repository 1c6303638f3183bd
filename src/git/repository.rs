use crate::error::{Result, VersionSyncError};
use crate::git::{VersionControl, WorkingTreeStatus};
use git2::{Commit, ErrorCode, Repository as Git2Repo, Status, StatusOptions};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    root: PathBuf,
}

impl Git2Repository {
    /// Discover the repository containing `path`, walking up to the file system root
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::discover(path).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                VersionSyncError::RepositoryNotFound(path.to_path_buf())
            } else {
                VersionSyncError::Git(e)
            }
        })?;
        Self::from_git2(repo)
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Result<Self> {
        let root = repo
            .workdir()
            .ok_or_else(|| VersionSyncError::config("Bare repositories have no working tree"))?
            .to_path_buf();
        Ok(Git2Repository { repo, root })
    }

    fn head_commit(&self) -> Result<Option<Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl VersionControl for Git2Repository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn status(&self) -> Result<WorkingTreeStatus> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;
        let changed_paths = statuses
            .iter()
            .filter(|entry| entry.status() != Status::CURRENT)
            .filter(|entry| !entry.status().contains(Status::IGNORED))
            .filter_map(|entry| entry.path().map(PathBuf::from))
            .collect();

        Ok(WorkingTreeStatus { changed_paths })
    }

    fn list_tags(&self) -> Result<BTreeSet<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn add_to_index(&self, relative_path: &Path) -> Result<()> {
        let mut index = self.repo.index()?;
        index.add_path(relative_path)?;
        index.write()?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = self.repo.signature()?;

        let parent = self.head_commit()?;
        let parents: Vec<&Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        info!("Committed {} ({})", message, oid);
        Ok(())
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        let head = self.head_commit()?.ok_or_else(|| {
            VersionSyncError::Git(git2::Error::from_str("HEAD does not point at a commit"))
        })?;

        self.repo.tag_lightweight(name, head.as_object(), false)?;
        info!("Created tag {}", name);
        Ok(())
    }
}
