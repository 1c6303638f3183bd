//! Pattern catalog: where a version can be declared in each supported file kind.
//!
//! Every pattern is compiled once on first use and shared read-only for the
//! rest of the process. Matching is line-oriented; nothing here understands
//! the languages beyond the handful of declaration shapes listed below.

use regex::{Captures, Regex};
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

/// Heading that introduces the Maven coordinates block of a README
pub const MAVEN_HEADING: &str = "Maven Info";
/// Heading that introduces the Gradle coordinates block of a README
pub const GRADLE_HEADING: &str = "Gradle Info";

const FENCE: &str = "```";
const LINE_COMMENT: &str = "//";

/// Java modifiers that may precede a declaration
const JAVA_MODIFIERS: &str = r"(?:(?:public|protected|private|static|final|synchronized|abstract)\s+)*";
/// Kotlin modifiers that may precede a declaration
const KOTLIN_MODIFIERS: &str = r"(?:(?:public|internal|protected|private|override|open|final)\s+)*";

/// A version literal located inside a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture<'a> {
    /// The version text between the quotes or tags
    pub text: &'a str,
    /// Byte offset of `text` within the line
    pub start: usize,
}

/// Outcome of matching a header pattern against one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMatch<'a> {
    /// The declaration carries its literal on the same line
    Inline(Capture<'a>),
    /// A `getVersion()` header; the literal is expected in its body.
    /// `rest` is the byte offset where the header ends, for one-line bodies.
    /// `braced` is false when the opening brace sits on a later line.
    Opened { rest: usize, braced: bool },
}

/// Source languages whose files may declare the version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dialect {
    Java,
    Kotlin,
}

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::Java, Dialect::Kotlin];

    /// File extension (without the dot) of this dialect's sources
    pub fn extension(self) -> &'static str {
        match self {
            Dialect::Java => "java",
            Dialect::Kotlin => "kt",
        }
    }

    /// Dialect of a file, judged by its extension
    pub fn from_path(path: &Path) -> Option<Dialect> {
        let ext = path.extension()?.to_str()?;
        Dialect::ALL.into_iter().find(|d| d.extension() == ext)
    }

    fn patterns(self) -> &'static DialectPatterns {
        match self {
            Dialect::Java => java_patterns(),
            Dialect::Kotlin => kotlin_patterns(),
        }
    }

    /// Match the header pattern: a `getVersion()` body opener or a same-line
    /// version constant.
    pub fn match_header(self, line: &str) -> Option<HeaderMatch<'_>> {
        let caps = self.patterns().header.captures(line)?;
        match capture(&caps, "version") {
            Some(cap) => Some(HeaderMatch::Inline(cap)),
            None => Some(HeaderMatch::Opened {
                rest: caps.get(0).map_or(line.len(), |m| m.end()),
                braced: caps.name("brace").is_some(),
            }),
        }
    }

    /// Match the value pattern: a `return "X"` statement.
    pub fn match_value(self, line: &str) -> Option<Capture<'_>> {
        let caps = self.patterns().value.captures(line)?;
        capture(&caps, "version")
    }

    /// Whether the line starts some other function or method declaration,
    /// which ends any body still waiting for a literal.
    pub fn starts_declaration(self, line: &str) -> bool {
        self.patterns().declaration.is_match(line)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Java => f.write_str("Java"),
            Dialect::Kotlin => f.write_str("Kotlin"),
        }
    }
}

struct DialectPatterns {
    header: Regex,
    value: Regex,
    declaration: Regex,
}

fn java_patterns() -> &'static DialectPatterns {
    static PATTERNS: OnceLock<DialectPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| DialectPatterns {
        header: compile(&format!(
            r#"^\s*{JAVA_MODIFIERS}String\s+(?:getVersion\s*\(\s*\)\s*(?:(?P<brace>\{{)|$)|(?i:version)\s*=\s*"(?P<version>[^"]+)"\s*;)"#
        )),
        value: compile(r#"\breturn\s+"(?P<version>[^"]+)"\s*;"#),
        // At least one modifier, so `else if (x) {` is never taken for a method
        declaration: compile(
            r"^\s*(?:(?:public|protected|private|static|final|synchronized|abstract)\s+)+[\w.<>\[\],]+\s+\w+\s*\(",
        ),
    })
}

fn kotlin_patterns() -> &'static DialectPatterns {
    static PATTERNS: OnceLock<DialectPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| DialectPatterns {
        header: compile(&format!(
            r#"^\s*{KOTLIN_MODIFIERS}(?:fun\s+getVersion\s*\(\s*\)\s*(?::\s*String\s*)?(?:(?P<brace>\{{)|$)|(?:fun\s+getVersion\s*\(\s*\)\s*(?::\s*String\s*)?|(?:const\s+)?val\s+(?i:version)\s*(?::\s*String\s*)?)=\s*"(?P<version>[^"]+)")"#
        )),
        value: compile(r#"\breturn\s+"(?P<version>[^"]+)""#),
        declaration: compile(&format!(r"^\s*{KOTLIN_MODIFIERS}fun\s")),
    })
}

fn build_descriptor_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // The assignment must be the whole line, so plugin coordinates such as
    // `id("x") version "1.0"` never count.
    PATTERN.get_or_init(|| {
        compile(
            r#"^\s*(?:(?:project\.)?version|const\s+(?:\w+\s+)*version(?:\s*:\s*String)?)\s*=\s*(?:"(?P<version>[^"]+)"|'(?P<single>[^']+)')\s*;?\s*$"#,
        )
    })
}

fn maven_value_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| compile(r"<version>\s*(?P<version>[^<\s]+)\s*</version>"))
}

fn gradle_value_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        compile(
            r#"(?:"[^"':\s]+:[^"':\s]+:(?P<version>[^"':\s]+)"|'[^"':\s]+:[^"':\s]+:(?P<single>[^"':\s]+)')"#,
        )
    })
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in version pattern must compile")
}

fn capture<'a>(caps: &Captures<'a>, name: &str) -> Option<Capture<'a>> {
    caps.name(name).map(|m| Capture {
        text: m.as_str(),
        start: m.start(),
    })
}

fn quoted_capture<'a>(caps: &Captures<'a>) -> Option<Capture<'a>> {
    capture(caps, "version").or_else(|| capture(caps, "single"))
}

/// Whether the line is a single-line comment and must never match
pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with(LINE_COMMENT)
}

/// Match a build descriptor version assignment spanning the whole line
pub fn match_build_descriptor(line: &str) -> Option<Capture<'_>> {
    let caps = build_descriptor_pattern().captures(line)?;
    quoted_capture(&caps)
}

/// Sections of the documentation file that may carry the version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocSection {
    Maven,
    Gradle,
}

impl DocSection {
    pub const ALL: [DocSection; 2] = [DocSection::Maven, DocSection::Gradle];

    pub fn heading(self) -> &'static str {
        match self {
            DocSection::Maven => MAVEN_HEADING,
            DocSection::Gradle => GRADLE_HEADING,
        }
    }

    /// Whether the line introduces this section
    pub fn is_heading(self, line: &str) -> bool {
        line.contains(self.heading())
    }

    /// Match the dependency coordinate carrying the version in this section
    pub fn match_value(self, line: &str) -> Option<Capture<'_>> {
        let caps = match self {
            DocSection::Maven => maven_value_pattern().captures(line)?,
            DocSection::Gradle => gradle_value_pattern().captures(line)?,
        };
        quoted_capture(&caps)
    }

    pub(crate) fn index(self) -> usize {
        match self {
            DocSection::Maven => 0,
            DocSection::Gradle => 1,
        }
    }
}

impl fmt::Display for DocSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

/// Whether the line opens or closes a fenced code block
pub fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with(FENCE)
}
