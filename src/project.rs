//! Project metadata: the declared version and the files that may repeat it.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Result;
use crate::lines::split_lines;
use crate::patterns::{self, Dialect};
use crate::scanner::{CandidateFiles, FileKind};

/// Placeholder the build tool reports when no version was declared
pub const UNSPECIFIED_VERSION: &str = "unspecified";

/// Name of the documentation file, compared case-insensitively
pub const README_FILE_NAME: &str = "readme.md";

/// What the engine needs to know about the project being versioned
pub trait ProjectMetadata {
    /// Root directory of the project
    fn project_dir(&self) -> &Path;

    /// Version string as declared by the project, if any
    fn declared_version(&self) -> Result<Option<String>>;

    /// Directories holding sources, with the dialect of their files
    fn source_roots(&self) -> Vec<(Dialect, PathBuf)>;

    /// Primary build descriptor
    fn build_file(&self) -> PathBuf;

    /// Whether the README next to the build descriptor takes part
    fn scan_documentation(&self) -> bool {
        true
    }
}

/// A project on disk described by a [`Config`]
#[derive(Debug, Clone)]
pub struct Project {
    dir: PathBuf,
    config: Config,
}

impl Project {
    pub fn new(dir: impl Into<PathBuf>, config: Config) -> Self {
        Project {
            dir: dir.into(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl ProjectMetadata for Project {
    fn project_dir(&self) -> &Path {
        &self.dir
    }

    /// Reads the first version assignment of the build descriptor, the same
    /// line the build tool itself takes the project version from.
    fn declared_version(&self) -> Result<Option<String>> {
        let path = self.build_file();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Build file {} does not exist", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let declared = split_lines(&text)
            .lines
            .into_iter()
            .filter(|line| !patterns::is_comment(line))
            .find_map(patterns::match_build_descriptor)
            .map(|capture| capture.text.to_string());
        Ok(declared)
    }

    fn source_roots(&self) -> Vec<(Dialect, PathBuf)> {
        let java = self.config.sources.java.iter().map(|p| (Dialect::Java, p));
        let kotlin = self.config.sources.kotlin.iter().map(|p| (Dialect::Kotlin, p));
        java.chain(kotlin)
            .map(|(dialect, root)| (dialect, self.dir.join(root)))
            .collect()
    }

    fn build_file(&self) -> PathBuf {
        self.dir.join(&self.config.build_file)
    }

    fn scan_documentation(&self) -> bool {
        self.config.scan_readme
    }
}

/// Collect the candidate file set for one scan.
///
/// Sources are every file with the dialect's extension below its roots; the
/// build descriptor is always included; README.md is added when it sits next
/// to the build descriptor. Nothing is cached between calls.
pub fn candidate_files<P: ProjectMetadata + ?Sized>(project: &P) -> Result<CandidateFiles> {
    let mut files = CandidateFiles::new();

    for (dialect, root) in project.source_roots() {
        if !root.is_dir() {
            debug!("Source root {} does not exist, skipping", root.display());
            continue;
        }
        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                std::io::Error::new(ErrorKind::Other, format!("Cannot walk {}: {}", root.display(), e))
            })?;
            let path = entry.path();
            if entry.file_type().is_file() && Dialect::from_path(path) == Some(dialect) {
                files.insert(path, FileKind::Source(dialect));
            }
        }
    }

    let build_file = project.build_file();
    if project.scan_documentation() {
        if let Some(readme) = find_readme(&build_file)? {
            files.insert(readme, FileKind::Documentation);
        }
    }
    files.insert(build_file, FileKind::BuildDescriptor);

    debug!("{} candidate file(s)", files.len());
    Ok(files)
}

fn find_readme(build_file: &Path) -> Result<Option<PathBuf>> {
    let dir = match build_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.is_dir() {
        return Ok(None);
    }

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let is_readme = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.eq_ignore_ascii_case(README_FILE_NAME));
        if is_readme && entry.file_type()?.is_file() {
            return Ok(Some(entry.path()));
        }
    }
    Ok(None)
}
