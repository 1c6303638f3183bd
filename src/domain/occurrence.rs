use std::path::{Path, PathBuf};

/// A single located version literal, with the line it should become
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionOccurrence {
    /// File the version was found in
    pub file: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// Version text exactly as captured from the line
    pub found: String,
    /// Full replacement for the line, without terminator
    pub replacement: String,
}

impl VersionOccurrence {
    /// Build an occurrence, substituting `found` with `target` inside `original_line`
    ///
    /// Only the first instance of the version inside the captured span is
    /// replaced; `span_start` is the byte offset of the captured version text.
    pub fn new(
        file: &Path,
        line: usize,
        original_line: &str,
        span_start: usize,
        found: &str,
        target: &str,
    ) -> Self {
        let span_end = span_start + found.len();
        let mut replacement = String::with_capacity(original_line.len() + target.len());
        replacement.push_str(&original_line[..span_start]);
        replacement.push_str(target);
        replacement.push_str(&original_line[span_end..]);

        VersionOccurrence {
            file: file.to_path_buf(),
            line,
            found: found.to_string(),
            replacement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replacement_preserves_surroundings() {
        let line = "\treturn \"2.4.0\"; // 2.4.0 is current  ";
        let start = line.find("2.4.0").unwrap();
        let occ = VersionOccurrence::new(Path::new("A.java"), 7, line, start, "2.4.0", "2.4.1");
        assert_eq!(occ.replacement, "\treturn \"2.4.1\"; // 2.4.0 is current  ");
        assert_eq!(occ.found, "2.4.0");
        assert_eq!(occ.line, 7);
    }
}
