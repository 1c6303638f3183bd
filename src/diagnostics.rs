use std::fmt;
use std::path::PathBuf;

use crate::error::VersionSyncError;
use crate::patterns::DocSection;

/// Non-fatal findings produced while scanning candidate files.
/// A scan keeps going after each of these; callers decide what is fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanDiagnostic {
    /// A version declaration was found but carries a different version
    VersionMismatch {
        file: PathBuf,
        line: usize,
        expected: String,
        found: String,
    },
    /// The file could not be read as UTF-8 text
    UnreadableFile { file: PathBuf, reason: String },
    /// A documentation section opened a code block that never closed
    UnterminatedBlock { file: PathBuf, section: DocSection },
}

impl ScanDiagnostic {
    /// Escalate a mismatch into the hard error raised by verification
    pub fn to_mismatch_error(&self) -> Option<VersionSyncError> {
        match self {
            ScanDiagnostic::VersionMismatch {
                file,
                line,
                expected,
                found,
            } => Some(VersionSyncError::mismatch(
                file.clone(),
                *line,
                expected.clone(),
                found.clone(),
            )),
            _ => None,
        }
    }
}

impl fmt::Display for ScanDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanDiagnostic::VersionMismatch {
                file,
                line,
                expected,
                found,
            } => write!(
                f,
                "{}:{} declares version '{}', expected '{}'",
                file.display(),
                line,
                found,
                expected
            ),
            ScanDiagnostic::UnreadableFile { file, reason } => {
                write!(f, "Cannot read {}: {}", file.display(), reason)
            }
            ScanDiagnostic::UnterminatedBlock { file, section } => write!(
                f,
                "Code block under '{}' in {} is never closed",
                section,
                file.display()
            ),
        }
    }
}
