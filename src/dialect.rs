//! Export dialect detection.

use tracing::debug;

use crate::classify::{is_markdown_heading, COMPACT_HEADER};
use crate::roster::Dialect;

/// Field that opens the fixed-field block of a bordered export.
pub const FACTION_FIELD_MARKER: &str = "+ FACTION KEYWORD:";

/// A line made only of `+`, at least two long.
pub fn is_border_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 2 && trimmed.chars().all(|c| c == '+')
}

/// Classify a roster by its first two non-empty lines.
///
/// Compact is tried first, then Bordered; anything else is Legacy.
pub fn detect_dialect<S: AsRef<str>>(lines: &[S]) -> Dialect {
    let mut significant = lines
        .iter()
        .enumerate()
        .map(|(index, line)| (index, line.as_ref().trim()))
        .filter(|(_, line)| !line.is_empty());

    let Some((first_index, first)) = significant.next() else {
        return Dialect::Legacy;
    };
    let second = significant.next().map(|(_, line)| line).unwrap_or("");

    let dialect = if COMPACT_HEADER.is_match(first)
        && lines[first_index + 1..]
            .iter()
            .any(|line| is_markdown_heading(line.as_ref()))
    {
        Dialect::Compact
    } else if is_border_line(first) && second.starts_with(FACTION_FIELD_MARKER) {
        Dialect::Bordered
    } else {
        Dialect::Legacy
    };

    debug!(?dialect, first_line = first, "detected roster dialect");
    dialect
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bordered_export() {
        let lines = [
            "+++++++++++++++++++++++++++++++++++++++++++++++",
            "+ FACTION KEYWORD: Xenos - Necrons",
            "+ DETACHMENT: Awakened Dynasty",
            "+++++++++++++++++++++++++++++++++++++++++++++++",
        ];
        assert_eq!(detect_dialect(&lines), Dialect::Bordered);
    }

    #[test]
    fn border_without_faction_field_is_legacy() {
        let lines = ["++++++++", "+ DETACHMENT: Awakened Dynasty"];
        assert_eq!(detect_dialect(&lines), Dialect::Legacy);
    }

    #[test]
    fn compact_export() {
        let lines = [
            "Chaos Space Marines - Pactbound Zealots [1990 pts]",
            "",
            "## Characters",
            "Chaos Lord [95 pts]: Warlord",
        ];
        assert_eq!(detect_dialect(&lines), Dialect::Compact);
    }

    #[test]
    fn bracket_total_without_heading_is_legacy() {
        let lines = ["My List [1990 pts]", "Chaos Lord (95 points)"];
        assert_eq!(detect_dialect(&lines), Dialect::Legacy);
    }

    #[test]
    fn leading_blank_lines_are_skipped() {
        let lines = ["", "   ", "++", "+ FACTION KEYWORD: Imperium - Adeptus Custodes"];
        assert_eq!(detect_dialect(&lines), Dialect::Bordered);
    }

    #[test]
    fn legacy_fallback() {
        let lines = ["The Hunt Never Ended (2000 Points)", "", "Space Marines"];
        assert_eq!(detect_dialect(&lines), Dialect::Legacy);
        let empty: [&str; 0] = [];
        assert_eq!(detect_dialect(&empty), Dialect::Legacy);
    }
}
