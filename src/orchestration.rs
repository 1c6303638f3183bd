//! The operations exposed to callers, composed from scanning, verification and
//! rewriting. None of them keeps state between calls: every call re-reads the
//! candidate files from disk.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::domain::{TagName, TagPattern, Version, VersionBump, VersionOccurrence};
use crate::error::{Result, VersionSyncError};
use crate::git::VersionControl;
use crate::project::{candidate_files, ProjectMetadata, UNSPECIFIED_VERSION};
use crate::rewrite;
use crate::scanner::{scan, CandidateFiles};

/// Read the version the project declares.
///
/// # Returns
/// * `Ok(Version)` - The parsed declared version
/// * `Err(VersionUnset)` - If nothing, a blank value or the placeholder is declared
/// * `Err(InvalidVersionFormat)` - If the declared text is not a semantic version
pub fn current_version<P: ProjectMetadata + ?Sized>(project: &P) -> Result<Version> {
    let declared = project.declared_version()?.unwrap_or_default();
    let declared = declared.trim();
    if declared.is_empty() || declared == UNSPECIFIED_VERSION {
        return Err(VersionSyncError::VersionUnset);
    }
    Version::parse(declared)
}

/// Find every declaration of `version` across the candidate files.
///
/// Any declaration of a different version is a hard [`VersionSyncError::VersionMismatch`].
pub fn verify<P: ProjectMetadata + ?Sized>(
    project: &P,
    version: &Version,
) -> Result<Vec<VersionOccurrence>> {
    let files = candidate_files(project)?;
    verify_files(&files, version)
}

fn verify_files(files: &CandidateFiles, version: &Version) -> Result<Vec<VersionOccurrence>> {
    scan(files, version, version).into_consistent()
}

/// Stages of one bump invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpPhase {
    Idle,
    Scanning(Version),
    Verified,
    Rewriting,
    Reverified,
    Done,
    Failed(String),
}

impl fmt::Display for BumpPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpPhase::Idle => f.write_str("idle"),
            BumpPhase::Scanning(v) => write!(f, "scanning({})", v),
            BumpPhase::Verified => f.write_str("verified"),
            BumpPhase::Rewriting => f.write_str("rewriting"),
            BumpPhase::Reverified => f.write_str("reverified"),
            BumpPhase::Done => f.write_str("done"),
            BumpPhase::Failed(reason) => write!(f, "failed({})", reason),
        }
    }
}

struct PhaseTracker {
    phase: BumpPhase,
}

impl PhaseTracker {
    fn new() -> Self {
        PhaseTracker {
            phase: BumpPhase::Idle,
        }
    }

    fn enter(&mut self, next: BumpPhase) {
        debug!("bump: {} -> {}", self.phase, next);
        self.phase = next;
    }
}

/// The read-only half of a bump: what would change, and to what
#[derive(Debug, Clone)]
pub struct BumpPlan {
    pub current: Version,
    pub next: Version,
    pub occurrences: Vec<VersionOccurrence>,
    files: CandidateFiles,
}

/// Compute the next version and collect every line that must change.
pub fn plan_bump<P: ProjectMetadata + ?Sized>(project: &P, bump: VersionBump) -> Result<BumpPlan> {
    let mut tracker = PhaseTracker::new();
    plan_with(project, bump, &mut tracker).inspect_err(|e| {
        tracker.enter(BumpPhase::Failed(e.to_string()));
    })
}

fn plan_with<P: ProjectMetadata + ?Sized>(
    project: &P,
    bump: VersionBump,
    tracker: &mut PhaseTracker,
) -> Result<BumpPlan> {
    let current = current_version(project)?;
    let next = current.bump(bump);
    tracker.enter(BumpPhase::Scanning(current.clone()));

    let files = candidate_files(project)?;
    let occurrences = scan(&files, &current, &next).into_consistent()?;
    tracker.enter(BumpPhase::Verified);

    if occurrences.is_empty() {
        warn!("No file declares version {}", current);
    }

    Ok(BumpPlan {
        current,
        next,
        occurrences,
        files,
    })
}

/// Bump the project version and rewrite every declaration of it.
///
/// Returns the new version. Version control is not touched.
pub fn bump<P: ProjectMetadata + ?Sized>(project: &P, bump: VersionBump) -> Result<Version> {
    let mut tracker = PhaseTracker::new();
    let result = plan_with(project, bump, &mut tracker)
        .and_then(|plan| execute_with(plan, &mut tracker));

    match &result {
        Ok(_) => tracker.enter(BumpPhase::Done),
        Err(e) => tracker.enter(BumpPhase::Failed(e.to_string())),
    }
    result
}

/// Carry out a plan produced by [`plan_bump`] and return the new version.
///
/// Fails with [`VersionSyncError::IncompleteUpdate`] when a rewritten file does
/// not declare the new version afterwards.
pub fn apply_plan(plan: BumpPlan) -> Result<Version> {
    let mut tracker = PhaseTracker::new();
    tracker.enter(BumpPhase::Verified);
    let result = execute_with(plan, &mut tracker);

    match &result {
        Ok(_) => tracker.enter(BumpPhase::Done),
        Err(e) => tracker.enter(BumpPhase::Failed(e.to_string())),
    }
    result
}

fn execute_with(plan: BumpPlan, tracker: &mut PhaseTracker) -> Result<Version> {
    tracker.enter(BumpPhase::Rewriting);
    rewrite::apply(&plan.occurrences)?;

    // Re-read the same candidates from disk; every file changed before must
    // now declare the new version. Anything else found there counts as missing.
    let after = scan(&plan.files, &plan.next, &plan.next).occurrences;
    let missing = missing_files(&plan.occurrences, &after);
    if !missing.is_empty() {
        error!(
            "{} file(s) do not declare {} after rewriting",
            missing.len(),
            plan.next
        );
        return Err(VersionSyncError::IncompleteUpdate { files: missing });
    }
    tracker.enter(BumpPhase::Reverified);

    info!(
        "Bumped version {} -> {} in {} file(s)",
        plan.current,
        plan.next,
        distinct_files(&plan.occurrences).len()
    );
    Ok(plan.next)
}

/// Files present in `before` but absent from `after`
fn missing_files(before: &[VersionOccurrence], after: &[VersionOccurrence]) -> Vec<PathBuf> {
    let after = distinct_files(after);
    distinct_files(before)
        .into_iter()
        .filter(|file| !after.contains(file))
        .collect()
}

fn distinct_files(occurrences: &[VersionOccurrence]) -> BTreeSet<PathBuf> {
    occurrences.iter().map(|o| o.file.clone()).collect()
}

/// Options of the tagging workflow
#[derive(Debug, Clone)]
pub struct TagOptions {
    pub pattern: TagPattern,
    /// Commit message template; `{version}` is replaced
    pub commit_message: String,
}

impl Default for TagOptions {
    fn default() -> Self {
        TagOptions {
            pattern: TagPattern::default(),
            commit_message: "Version {version}".to_string(),
        }
    }
}

/// Tag the current state with the project's version.
///
/// Uncommitted changes are only tolerated in the files that declare the
/// version; those are committed first, then the tag is created at HEAD.
pub fn tag<P, R>(project: &P, vcs: &R, options: &TagOptions) -> Result<TagName>
where
    P: ProjectMetadata + ?Sized,
    R: VersionControl + ?Sized,
{
    let version = current_version(project)?;
    let occurrences = verify(project, &version)?;

    let root = canonical(vcs.root());
    let version_files: BTreeSet<PathBuf> = distinct_files(&occurrences)
        .iter()
        .filter_map(|file| canonical(file).strip_prefix(&root).ok().map(Path::to_path_buf))
        .collect();

    let status = vcs.status()?;
    let unrelated: Vec<PathBuf> = status
        .changed_paths
        .iter()
        .filter(|path| !version_files.contains(*path))
        .cloned()
        .collect();
    if !unrelated.is_empty() {
        return Err(VersionSyncError::UncommittedChanges { files: unrelated });
    }

    let tag_name = options.pattern.format(&version);
    if vcs.list_tags()?.contains(tag_name.as_str()) {
        return Err(VersionSyncError::TagAlreadyExists(tag_name.to_string()));
    }

    if status.has_uncommitted_changes() {
        for path in &status.changed_paths {
            vcs.add_to_index(path)?;
        }
        let message = options
            .commit_message
            .replace("{version}", &version.to_string());
        vcs.commit(&message)?;
    }

    vcs.create_tag(tag_name.as_str())?;
    info!("Tagged version {} as {}", version, tag_name);
    Ok(tag_name)
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
