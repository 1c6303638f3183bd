// tests/tag_test.rs
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use git2::Repository;
use tempfile::TempDir;
use version_sync::config::Config;
use version_sync::git::{Git2Repository, MockRepository, VersionControl};
use version_sync::{bump, tag, Project, TagOptions, VersionBump, VersionSyncError};

const KOTLIN_INFO: &str = "object Info {\n    fun getVersion(): String {\n        return \"1.2.0\"\n    }\n}\n";
const BUILD: &str = "group = \"com.example\"\nversion = \"1.2.0\"\n";

fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn commit_all(repo: &Repository, message: &str) {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = repo.signature().unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap();
}

// Helper function to setup a temporary project under git with one commit
fn setup_test_repo() -> (TempDir, Repository) {
    let temp_dir = TempDir::new().expect("Could not create temp dir");
    let repo = Repository::init(temp_dir.path()).expect("Could not init git repo");
    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
    }

    write(temp_dir.path(), "src/main/kotlin/Info.kt", KOTLIN_INFO);
    write(temp_dir.path(), "build.gradle.kts", BUILD);
    write(temp_dir.path(), "NOTES.txt", "notes\n");
    commit_all(&repo, "Initial commit");

    (temp_dir, repo)
}

fn project(dir: &TempDir) -> Project {
    Project::new(dir.path(), Config::default())
}

#[test]
fn test_tag_clean_tree() {
    let (dir, repo) = setup_test_repo();
    let vcs = Git2Repository::open(dir.path()).unwrap();

    let name = tag(&project(&dir), &vcs, &TagOptions::default()).unwrap();

    assert_eq!(name.as_str(), "Version_1.2.0");
    assert!(repo.find_reference("refs/tags/Version_1.2.0").is_ok());
}

#[test]
fn test_scenario_d_unrelated_change_blocks_tag() {
    let (dir, repo) = setup_test_repo();
    write(dir.path(), "NOTES.txt", "edited\n");
    let vcs = Git2Repository::open(dir.path()).unwrap();

    let err = tag(&project(&dir), &vcs, &TagOptions::default()).unwrap_err();

    match err {
        VersionSyncError::UncommittedChanges { files } => {
            assert_eq!(files, vec![PathBuf::from("NOTES.txt")]);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(repo.tag_names(None).unwrap().is_empty());
}

#[test]
fn test_scenario_d_version_files_are_committed_then_tagged() {
    let (dir, repo) = setup_test_repo();
    let project = project(&dir);
    bump(&project, VersionBump::Patch).unwrap();

    let vcs = Git2Repository::open(dir.path()).unwrap();
    assert_eq!(
        vcs.status().unwrap().changed_paths,
        BTreeSet::from([
            PathBuf::from("build.gradle.kts"),
            PathBuf::from("src/main/kotlin/Info.kt"),
        ])
    );

    let name = tag(&project, &vcs, &TagOptions::default()).unwrap();

    assert_eq!(name.as_str(), "Version_1.2.1");
    assert!(!vcs.status().unwrap().has_uncommitted_changes());
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.message(), Some("Version 1.2.1"));
    let tagged = repo
        .find_reference("refs/tags/Version_1.2.1")
        .unwrap()
        .peel_to_commit()
        .unwrap();
    assert_eq!(tagged.id(), head.id());
}

#[test]
fn test_existing_tag_is_rejected() {
    let (dir, _repo) = setup_test_repo();
    let vcs = Git2Repository::open(dir.path()).unwrap();
    vcs.create_tag("Version_1.2.0").unwrap();

    let err = tag(&project(&dir), &vcs, &TagOptions::default()).unwrap_err();
    assert!(matches!(err, VersionSyncError::TagAlreadyExists(ref t) if t == "Version_1.2.0"));
}

#[test]
fn test_repository_not_found() {
    let dir = TempDir::new().unwrap();
    match Git2Repository::open(dir.path()) {
        Err(VersionSyncError::RepositoryNotFound(path)) => assert_eq!(path, dir.path()),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("temporary directory should not be inside a repository"),
    }
}

#[test]
fn test_tag_with_mock_repository() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "build.gradle.kts", BUILD);
    let mut vcs = MockRepository::new(dir.path());
    vcs.add_change("build.gradle.kts");

    let options = TagOptions {
        pattern: version_sync::domain::TagPattern::new("v{version}").unwrap(),
        commit_message: "release {version}".to_string(),
    };
    let name = tag(&project(&dir), &vcs, &options).unwrap();

    assert_eq!(name.as_str(), "v1.2.0");
    assert_eq!(vcs.commits(), vec!["release 1.2.0".to_string()]);
    assert!(vcs.tags().contains("v1.2.0"));
}

#[test]
fn test_mock_unrelated_change_blocks_before_tag_lookup() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "build.gradle.kts", BUILD);
    let mut vcs = MockRepository::new(dir.path());
    vcs.add_change("scratch.txt");
    vcs.add_tag("Version_1.2.0");

    let err = tag(&project(&dir), &vcs, &TagOptions::default()).unwrap_err();
    assert!(matches!(err, VersionSyncError::UncommittedChanges { .. }));
    assert!(vcs.commits().is_empty());
}
