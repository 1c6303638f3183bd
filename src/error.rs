use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for version-sync operations
#[derive(Error, Debug)]
pub enum VersionSyncError {
    #[error("Invalid version format: '{0}' - expected MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]")]
    InvalidVersionFormat(String),

    #[error("Project version is not set")]
    VersionUnset,

    #[error(
        "Version mismatch in {}:{line}: expected '{expected}', found '{found}'",
        file.display()
    )]
    VersionMismatch {
        file: PathBuf,
        line: usize,
        expected: String,
        found: String,
    },

    #[error(
        "Failed to replace {} ({reason}); already rewritten: [{}]; not rewritten: [{}]",
        file.display(),
        join_paths(rewritten),
        join_paths(pending)
    )]
    RewriteFailure {
        file: PathBuf,
        reason: String,
        rewritten: Vec<PathBuf>,
        pending: Vec<PathBuf>,
    },

    #[error("Version update incomplete, no new version found in: [{}]", join_paths(files))]
    IncompleteUpdate { files: Vec<PathBuf> },

    #[error("Tag '{0}' already exists")]
    TagAlreadyExists(String),

    #[error("Uncommitted changes outside version files: [{}]", join_paths(files))]
    UncommittedChanges { files: Vec<PathBuf> },

    #[error("No git repository found at or above {}", .0.display())]
    RepositoryNotFound(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in version-sync
pub type Result<T> = std::result::Result<T, VersionSyncError>;

impl VersionSyncError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        VersionSyncError::Config(msg.into())
    }

    /// Create a format error for the offending text
    pub fn invalid_version(text: impl Into<String>) -> Self {
        VersionSyncError::InvalidVersionFormat(text.into())
    }

    /// Create a mismatch error for one located line
    pub fn mismatch(
        file: impl Into<PathBuf>,
        line: usize,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        VersionSyncError::VersionMismatch {
            file: file.into(),
            line,
            expected: expected.into(),
            found: found.into(),
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VersionSyncError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: VersionSyncError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_mismatch_names_file_line_and_versions() {
        let err = VersionSyncError::mismatch("build.gradle.kts", 3, "2.4.0", "2.5.0");
        let msg = err.to_string();
        assert!(msg.contains("build.gradle.kts:3"));
        assert!(msg.contains("expected '2.4.0'"));
        assert!(msg.contains("found '2.5.0'"));
    }

    #[test]
    fn test_rewrite_failure_enumerates_files() {
        let err = VersionSyncError::RewriteFailure {
            file: PathBuf::from("b.kt"),
            reason: "permission denied".to_string(),
            rewritten: vec![PathBuf::from("a.java")],
            pending: vec![PathBuf::from("c.kt"), PathBuf::from("README.md")],
        };
        let msg = err.to_string();
        assert!(msg.contains("b.kt"));
        assert!(msg.contains("already rewritten: [a.java]"));
        assert!(msg.contains("not rewritten: [c.kt, README.md]"));
    }

    #[test]
    fn test_list_variants_render_empty_lists() {
        let err = VersionSyncError::IncompleteUpdate { files: vec![] };
        assert!(err.to_string().ends_with("[]"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (VersionSyncError::config("x"), "Configuration error"),
            (VersionSyncError::invalid_version("x"), "Invalid version format"),
            (VersionSyncError::TagAlreadyExists("x".into()), "Tag 'x'"),
            (VersionSyncError::VersionUnset, "Project version"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
