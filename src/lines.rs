//! Line splitting and line-terminator discovery shared by scanning and rewriting.
//!
//! Lines are split the way a line reader does: `\r\n`, a lone `\n` and a lone
//! `\r` all end a line. Line numbers handed out by the scanner therefore always
//! agree with what the rewriter sees when it reads the same file again.

/// Line terminator style used by a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
    Cr,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Cr => "\r",
        }
    }

    /// Detect the style from the first terminator present in `text`
    pub fn detect(text: &str) -> Option<LineEnding> {
        let bytes = text.as_bytes();
        let pos = bytes.iter().position(|&b| b == b'\n' || b == b'\r')?;
        Some(match (bytes[pos], bytes.get(pos + 1)) {
            (b'\r', Some(b'\n')) => LineEnding::CrLf,
            (b'\r', _) => LineEnding::Cr,
            _ => LineEnding::Lf,
        })
    }
}

/// Text split into lines, remembering whether the last line was terminated
#[derive(Debug)]
pub struct SplitLines<'a> {
    pub lines: Vec<&'a str>,
    pub trailing_terminator: bool,
}

/// Split text into lines without their terminators
pub fn split_lines(text: &str) -> SplitLines<'_> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }

    let trailing_terminator = start == bytes.len() && !bytes.is_empty();
    if start < bytes.len() {
        lines.push(&text[start..]);
    }

    SplitLines {
        lines,
        trailing_terminator,
    }
}
