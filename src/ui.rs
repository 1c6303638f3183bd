//! Console formatting for the command-line front end.

use console::style;
use std::path::Path;

use crate::domain::{Version, VersionOccurrence};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// `file:line` of an occurrence, relative to `base` when it lives below it.
pub fn format_location(occ: &VersionOccurrence, base: &Path) -> String {
    let file = occ.file.strip_prefix(base).unwrap_or(&occ.file);
    format!("{}:{}", style(file.display()).cyan(), occ.line)
}

/// Display where a version is declared, one `file:line` per occurrence.
pub fn display_occurrences(version: &Version, occurrences: &[VersionOccurrence], base: &Path) {
    println!(
        "\n{}",
        style(format!("Version {} declared in:", version)).bold()
    );
    if occurrences.is_empty() {
        println!("  (no files)");
    }
    for occ in occurrences {
        println!("  {}", format_location(occ, base));
    }
}

/// One line of a dry-run plan: where, and the line as it would be written
pub fn format_plan_line(occ: &VersionOccurrence, base: &Path) -> String {
    format!("{}  {}", format_location(occ, base), occ.replacement.trim())
}

/// Display the lines a bump would write, old version to new.
pub fn display_plan(
    current: &Version,
    next: &Version,
    occurrences: &[VersionOccurrence],
    base: &Path,
) {
    println!("\n{}", style("Proposed Version Change:").bold());
    println!("  From: {}", style(current).red());
    println!("  To:   {}", style(next).green());
    for occ in occurrences {
        println!("  {}", format_plan_line(occ, base));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::strip_ansi_codes;
    use std::path::PathBuf;

    fn occ(file: &str) -> VersionOccurrence {
        VersionOccurrence {
            file: PathBuf::from(file),
            line: 3,
            found: "1.0.0".to_string(),
            replacement: "    version = \"1.0.1\"".to_string(),
        }
    }

    #[test]
    fn test_location_relative_to_base() {
        let text = format_location(&occ("/p/build.gradle.kts"), Path::new("/p"));
        assert_eq!(strip_ansi_codes(&text), "build.gradle.kts:3");
    }

    #[test]
    fn test_location_outside_base_keeps_full_path() {
        let text = format_location(&occ("/p/build.gradle.kts"), Path::new("/elsewhere"));
        assert_eq!(strip_ansi_codes(&text), "/p/build.gradle.kts:3");
    }

    #[test]
    fn test_plan_line_trims_replacement() {
        let text = format_plan_line(&occ("/p/build.gradle.kts"), Path::new("/p"));
        assert_eq!(
            strip_ansi_codes(&text),
            "build.gradle.kts:3  version = \"1.0.1\""
        );
    }
}
