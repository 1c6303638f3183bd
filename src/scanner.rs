//! File scanner: applies the pattern catalog line by line to every candidate
//! file and reports where the expected version is declared.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::diagnostics::ScanDiagnostic;
use crate::domain::{Version, VersionOccurrence};
use crate::error::Result;
use crate::lines::split_lines;
use crate::patterns::{self, Capture, Dialect, DocSection, HeaderMatch};

/// How a candidate file is searched for its version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Source(Dialect),
    BuildDescriptor,
    Documentation,
}

/// Deduplicated, sorted set of files to scan in one invocation
#[derive(Debug, Clone, Default)]
pub struct CandidateFiles {
    files: BTreeMap<PathBuf, FileKind>,
}

impl CandidateFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file; a path that is already present keeps its first kind
    pub fn insert(&mut self, path: impl Into<PathBuf>, kind: FileKind) {
        self.files.entry(path.into()).or_insert(kind);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, FileKind)> {
        self.files.iter().map(|(p, k)| (p.as_path(), *k))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }
}

/// Everything a scan found: matching occurrences plus non-fatal diagnostics
#[derive(Debug, Default)]
pub struct ScanReport {
    pub occurrences: Vec<VersionOccurrence>,
    pub diagnostics: Vec<ScanDiagnostic>,
}

impl ScanReport {
    /// Fail on the first version mismatch, otherwise hand back the occurrences
    pub fn into_consistent(self) -> Result<Vec<VersionOccurrence>> {
        if let Some(err) = self
            .diagnostics
            .iter()
            .find_map(ScanDiagnostic::to_mismatch_error)
        {
            return Err(err);
        }
        Ok(self.occurrences)
    }
}

/// A value match inside one line, before it is judged against the expected version
struct LineMatch<'a> {
    line_no: usize,
    line: &'a str,
    capture: Capture<'a>,
}

/// Scan every candidate for declarations of `expected`.
///
/// Each occurrence's replacement line swaps the captured `expected` text for
/// `target`. A declaration of any other version becomes a mismatch diagnostic
/// and the file contributes nothing.
pub fn scan(files: &CandidateFiles, expected: &Version, target: &Version) -> ScanReport {
    let expected = expected.to_string();
    let target = target.to_string();
    let mut report = ScanReport::default();

    for (path, kind) in files.iter() {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                report.diagnostics.push(ScanDiagnostic::UnreadableFile {
                    file: path.to_path_buf(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        scan_text(path, kind, &text, &expected, &target, &mut report);
    }

    report
}

/// Scan text already read from `path`
pub fn scan_text(
    path: &Path,
    kind: FileKind,
    text: &str,
    expected: &str,
    target: &str,
    report: &mut ScanReport,
) {
    let split = split_lines(text);
    let lines = &split.lines;

    let matches: Vec<LineMatch<'_>> = match kind {
        FileKind::Source(dialect) => find_source_value(dialect, lines).into_iter().collect(),
        FileKind::BuildDescriptor => find_build_value(lines).into_iter().collect(),
        FileKind::Documentation => find_doc_values(path, lines, report),
    };

    for m in matches {
        if m.capture.text == expected {
            report.occurrences.push(VersionOccurrence::new(
                path,
                m.line_no,
                m.line,
                m.capture.start,
                m.capture.text,
                target,
            ));
        } else {
            warn!(
                "{}:{} declares version '{}', expected '{}'",
                path.display(),
                m.line_no,
                m.capture.text,
                expected
            );
            report.diagnostics.push(ScanDiagnostic::VersionMismatch {
                file: path.to_path_buf(),
                line: m.line_no,
                expected: expected.to_string(),
                found: m.capture.text.to_string(),
            });
        }
    }
}

/// Where the source scan stands relative to a `getVersion()` body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyState {
    Outside,
    /// Header seen, its opening brace expected on the next non-blank line
    AwaitingBrace,
    Inside,
}

fn find_source_value<'a>(dialect: Dialect, lines: &[&'a str]) -> Option<LineMatch<'a>> {
    let mut state = BodyState::Outside;

    for (idx, &line) in lines.iter().enumerate() {
        if patterns::is_comment(line) {
            continue;
        }
        let line_no = idx + 1;

        match state {
            BodyState::Inside => {
                if let Some(capture) = dialect.match_value(line) {
                    return Some(LineMatch {
                        line_no,
                        line,
                        capture,
                    });
                }
                if line.trim_start().starts_with('}') {
                    state = BodyState::Outside;
                    continue;
                }
                if !dialect.starts_declaration(line) {
                    continue;
                }
                // Another declaration began; the body never returned a literal
                state = BodyState::Outside;
            }
            BodyState::AwaitingBrace => {
                let trimmed = line.trim_start();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed.starts_with('{') {
                    let rest = line.len() - trimmed.len() + 1;
                    if let Some(m) = value_after(dialect, line, line_no, rest) {
                        return Some(m);
                    }
                    state = BodyState::Inside;
                    continue;
                }
                // A declaration without a body, e.g. in an interface
                state = BodyState::Outside;
            }
            BodyState::Outside => {}
        }

        match dialect.match_header(line) {
            Some(HeaderMatch::Inline(capture)) => {
                return Some(LineMatch {
                    line_no,
                    line,
                    capture,
                })
            }
            Some(HeaderMatch::Opened { rest, braced }) => {
                if !braced {
                    state = BodyState::AwaitingBrace;
                    continue;
                }
                // One-line bodies: `String getVersion() { return "1.0.0"; }`
                if let Some(m) = value_after(dialect, line, line_no, rest) {
                    return Some(m);
                }
                state = BodyState::Inside;
            }
            None => {}
        }
    }

    None
}

/// Value match in the part of `line` starting at byte `rest`
fn value_after<'a>(
    dialect: Dialect,
    line: &'a str,
    line_no: usize,
    rest: usize,
) -> Option<LineMatch<'a>> {
    let c = dialect.match_value(&line[rest..])?;
    Some(LineMatch {
        line_no,
        line,
        capture: Capture {
            text: c.text,
            start: rest + c.start,
        },
    })
}

fn find_build_value<'a>(lines: &[&'a str]) -> Option<LineMatch<'a>> {
    lines.iter().enumerate().find_map(|(idx, &line)| {
        if patterns::is_comment(line) {
            return None;
        }
        patterns::match_build_descriptor(line).map(|capture| LineMatch {
            line_no: idx + 1,
            line,
            capture,
        })
    })
}

fn find_doc_values<'a>(
    path: &Path,
    lines: &[&'a str],
    report: &mut ScanReport,
) -> Vec<LineMatch<'a>> {
    // (section, inside its fenced block)
    let mut current: Option<(DocSection, bool)> = None;
    let mut settled = [false; 2];
    let mut found = Vec::new();

    for (idx, &line) in lines.iter().enumerate() {
        if settled.iter().all(|&s| s) {
            break;
        }

        match current {
            None => {
                current = DocSection::ALL
                    .into_iter()
                    .find(|s| !settled[s.index()] && s.is_heading(line))
                    .map(|s| (s, false));
            }
            Some((section, false)) => {
                if patterns::is_fence(line) {
                    current = Some((section, true));
                } else if let Some(next) = DocSection::ALL
                    .into_iter()
                    .find(|s| !settled[s.index()] && s.is_heading(line))
                {
                    debug!(
                        "No block under '{}' heading of {}",
                        section,
                        path.display()
                    );
                    current = Some((next, false));
                }
            }
            Some((section, true)) => {
                if patterns::is_fence(line) {
                    debug!(
                        "No version inside '{}' block of {}",
                        section,
                        path.display()
                    );
                    current = None;
                } else if patterns::is_comment(line) {
                    continue;
                } else if let Some(capture) = section.match_value(line) {
                    found.push(LineMatch {
                        line_no: idx + 1,
                        line,
                        capture,
                    });
                    settled[section.index()] = true;
                    current = None;
                }
            }
        }
    }

    if let Some((section, true)) = current {
        report.diagnostics.push(ScanDiagnostic::UnterminatedBlock {
            file: path.to_path_buf(),
            section,
        });
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_str(kind: FileKind, text: &str, expected: &str, target: &str) -> ScanReport {
        let mut report = ScanReport::default();
        scan_text(Path::new("f"), kind, text, expected, target, &mut report);
        report
    }

    #[test]
    fn test_java_method_body() {
        let text = "class A {\n    public static String getVersion() {\n        return \"2.4.0\";\n    }\n}\n";
        let report = scan_str(FileKind::Source(Dialect::Java), text, "2.4.0", "2.4.1");
        assert_eq!(report.occurrences.len(), 1);
        let occ = &report.occurrences[0];
        assert_eq!(occ.line, 3);
        assert_eq!(occ.replacement, "        return \"2.4.1\";");
    }

    #[test]
    fn test_java_one_line_body() {
        let text = "String getVersion() { return \"2.4.0\"; }";
        let report = scan_str(FileKind::Source(Dialect::Java), text, "2.4.0", "3.0.0");
        assert_eq!(report.occurrences[0].replacement, "String getVersion() { return \"3.0.0\"; }");
    }

    #[test]
    fn test_body_without_literal_stops_waiting() {
        let text = "String getVersion() {\n    return VERSION;\n}\nString name() {\n    return \"2.4.0\";\n}\n";
        let report = scan_str(FileKind::Source(Dialect::Java), text, "2.4.0", "2.4.1");
        assert!(report.occurrences.is_empty());
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_interface_declaration_does_not_open_a_body() {
        let text = "interface Versioned {\n    fun getVersion(): String\n    fun describe(): String {\n        return \"hello\"\n    }\n}\n";
        let report = scan_str(FileKind::Source(Dialect::Kotlin), text, "2.4.0", "2.4.1");
        assert!(report.occurrences.is_empty());
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_brace_on_next_line() {
        let text = "class A\n{\n    public String getVersion()\n    {\n        return \"2.4.0\";\n    }\n}\n";
        let report = scan_str(FileKind::Source(Dialect::Java), text, "2.4.0", "2.4.1");
        assert_eq!(report.occurrences.len(), 1);
        assert_eq!(report.occurrences[0].line, 5);
    }

    #[test]
    fn test_body_ends_at_next_declaration() {
        let text = "object Info {\n    fun getVersion(): String {\n        val v = compute()\n        return v\n    fun other(): String {\n        return \"hello\"\n    }\n}\n";
        let report = scan_str(FileKind::Source(Dialect::Kotlin), text, "2.4.0", "2.4.1");
        assert!(report.occurrences.is_empty());
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_kotlin_constant() {
        let text = "object Info {\n    const val VERSION = \"2.4.0\"\n}\n";
        let report = scan_str(FileKind::Source(Dialect::Kotlin), text, "2.4.0", "2.5.0");
        assert_eq!(report.occurrences[0].line, 2);
        assert_eq!(report.occurrences[0].replacement, "    const val VERSION = \"2.5.0\"");
    }

    #[test]
    fn test_commented_value_is_ignored() {
        let text = "fun getVersion(): String {\n    // return \"2.4.0\"\n    return \"2.4.0\"\n}\n";
        let report = scan_str(FileKind::Source(Dialect::Kotlin), text, "2.4.0", "2.4.1");
        assert_eq!(report.occurrences.len(), 1);
        assert_eq!(report.occurrences[0].line, 3);
    }

    #[test]
    fn test_commented_header_is_ignored() {
        let text = "// String VERSION = \"2.4.0\";\n";
        let report = scan_str(FileKind::Source(Dialect::Java), text, "2.4.0", "2.4.1");
        assert!(report.occurrences.is_empty());
    }

    #[test]
    fn test_mismatch_is_a_diagnostic() {
        let text = "version = \"2.5.0\"\n";
        let report = scan_str(FileKind::BuildDescriptor, text, "2.4.0", "2.4.1");
        assert!(report.occurrences.is_empty());
        assert_eq!(
            report.diagnostics,
            vec![ScanDiagnostic::VersionMismatch {
                file: PathBuf::from("f"),
                line: 1,
                expected: "2.4.0".to_string(),
                found: "2.5.0".to_string(),
            }]
        );
        assert!(report.into_consistent().is_err());
    }

    #[test]
    fn test_only_first_match_per_file() {
        let text = "version = \"2.4.0\"\nproject.version = \"9.9.9\"\n";
        let report = scan_str(FileKind::BuildDescriptor, text, "2.4.0", "2.4.1");
        assert_eq!(report.occurrences.len(), 1);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_build_descriptor_skips_plugin_coordinates() {
        let text = "plugins {\n    id(\"org.example\") version \"1.0.0\"\n}\nversion = \"2.4.0\"\n";
        let report = scan_str(FileKind::BuildDescriptor, text, "2.4.0", "2.4.1");
        assert_eq!(report.occurrences[0].line, 4);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_doc_sections() {
        let text = "\
# Lib

## Maven Info
```xml
<dependency>
  <version>2.4.0</version>
</dependency>
```

## Gradle Info
```groovy
implementation 'com.example:artifact:2.4.0'
implementation 'org.other:thing:2.4.0'
```
";
        let report = scan_str(FileKind::Documentation, text, "2.4.0", "2.5.0");
        let lines: Vec<usize> = report.occurrences.iter().map(|o| o.line).collect();
        assert_eq!(lines, vec![6, 12]);
        assert_eq!(report.occurrences[0].replacement, "  <version>2.5.0</version>");
        assert_eq!(
            report.occurrences[1].replacement,
            "implementation 'com.example:artifact:2.5.0'"
        );
    }

    #[test]
    fn test_doc_block_without_match_yields_nothing() {
        let text = "## Maven Info\n```\nno coordinates here\n```\n<version>2.4.0</version>\n";
        let report = scan_str(FileKind::Documentation, text, "2.4.0", "2.5.0");
        assert!(report.occurrences.is_empty());
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_doc_heading_without_block_yields_to_next_heading() {
        let text = "## Maven Info\nComing soon.\n\n## Gradle Info\n```groovy\nimplementation 'com.example:artifact:2.4.0'\n```\n";
        let report = scan_str(FileKind::Documentation, text, "2.4.0", "2.5.0");
        assert_eq!(report.occurrences.len(), 1);
        assert_eq!(report.occurrences[0].line, 6);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_doc_ignores_values_outside_sections() {
        let text = "implementation 'com.example:artifact:2.4.0'\n## Gradle Info\n```\nimplementation 'com.example:artifact:2.4.0'\n```\n";
        let report = scan_str(FileKind::Documentation, text, "2.4.0", "2.5.0");
        assert_eq!(report.occurrences.len(), 1);
        assert_eq!(report.occurrences[0].line, 4);
    }

    #[test]
    fn test_doc_unterminated_block() {
        let text = "## Gradle Info\n```\nnothing\n";
        let report = scan_str(FileKind::Documentation, text, "2.4.0", "2.5.0");
        assert!(matches!(
            report.diagnostics.as_slice(),
            [ScanDiagnostic::UnterminatedBlock {
                section: DocSection::Gradle,
                ..
            }]
        ));
    }

    #[test]
    fn test_crlf_line_numbers() {
        let text = "a\r\nb\r\nversion = \"1.0.0\"\r\n";
        let report = scan_str(FileKind::BuildDescriptor, text, "1.0.0", "1.0.1");
        assert_eq!(report.occurrences[0].line, 3);
        assert_eq!(report.occurrences[0].replacement, "version = \"1.0.1\"");
    }

    #[test]
    fn test_candidate_files_dedup_keeps_first_kind() {
        let mut files = CandidateFiles::new();
        files.insert("b/build.gradle.kts", FileKind::BuildDescriptor);
        files.insert("a/A.java", FileKind::Source(Dialect::Java));
        files.insert("b/build.gradle.kts", FileKind::Documentation);
        assert_eq!(files.len(), 2);
        let kinds: Vec<FileKind> = files.iter().map(|(_, k)| k).collect();
        assert_eq!(
            kinds,
            vec![FileKind::Source(Dialect::Java), FileKind::BuildDescriptor]
        );
    }
}
