//! Atomic rewriter: replaces located lines file by file.
//!
//! Each file is re-read from disk, written in full to a temporary file in the
//! same directory with the replaced lines, and then renamed over the original.
//! The discovered line terminator is used for every line written back.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{error, info};

use crate::domain::VersionOccurrence;
use crate::error::{Result, VersionSyncError};
use crate::lines::{split_lines, LineEnding};

/// Apply every occurrence, one file at a time.
///
/// There is no rollback: if a file fails, the files already swapped keep their
/// new content and the error names both the rewritten and the untouched files.
pub fn apply(occurrences: &[VersionOccurrence]) -> Result<Vec<PathBuf>> {
    let mut by_file: BTreeMap<&Path, Vec<&VersionOccurrence>> = BTreeMap::new();
    for occ in occurrences {
        by_file.entry(occ.file.as_path()).or_default().push(occ);
    }

    let files: Vec<&Path> = by_file.keys().copied().collect();
    let mut rewritten = Vec::with_capacity(files.len());

    for (idx, (path, occs)) in by_file.iter().enumerate() {
        if let Err(reason) = rewrite_file(path, occs) {
            let pending: Vec<PathBuf> = files[idx + 1..].iter().map(|p| p.to_path_buf()).collect();
            error!(
                "Rewrite of {} failed after {} file(s) were already updated",
                path.display(),
                rewritten.len()
            );
            return Err(VersionSyncError::RewriteFailure {
                file: path.to_path_buf(),
                reason,
                rewritten,
                pending,
            });
        }
        info!("Updated {}", path.display());
        rewritten.push(path.to_path_buf());
    }

    Ok(rewritten)
}

fn rewrite_file(path: &Path, occs: &[&VersionOccurrence]) -> std::result::Result<(), String> {
    let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let content = replace_lines(&text, occs)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path).map_err(|e| e.to_string())?.permissions();

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| e.to_string())?;
    temp.write_all(content.as_bytes())
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| e.to_string())?;
    fs::set_permissions(temp.path(), permissions).map_err(|e| e.to_string())?;

    temp.persist(path).map_err(|e| e.error.to_string())?;
    Ok(())
}

/// Rebuild `text` with the occurrences' lines replaced
///
/// Fails when a target line no longer holds the version that was scanned,
/// which means the file changed since the scan.
fn replace_lines(text: &str, occs: &[&VersionOccurrence]) -> std::result::Result<String, String> {
    let ending = LineEnding::detect(text).unwrap_or(LineEnding::Lf);
    let split = split_lines(text);
    let mut lines: Vec<&str> = split.lines.clone();

    for occ in occs {
        let slot = occ
            .line
            .checked_sub(1)
            .and_then(|i| lines.get_mut(i))
            .ok_or_else(|| format!("line {} no longer exists", occ.line))?;
        if !slot.contains(occ.found.as_str()) {
            return Err(format!(
                "line {} no longer contains '{}'",
                occ.line, occ.found
            ));
        }
        *slot = occ.replacement.as_str();
    }

    let mut content = lines.join(ending.as_str());
    if split.trailing_terminator {
        content.push_str(ending.as_str());
    }
    Ok(content)
}
