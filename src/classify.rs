//! Line classification: stateless predicates over a single line of roster text.
//!
//! Every parser goes through these; none of them look at surrounding lines.

use lazy_static::lazy_static;
use regex::Regex;

/// Structural labels the export tools put between groups of units.
pub const SECTION_HEADERS: &[&str] = &[
    "CHARACTERS",
    "CHARACTER",
    "EPIC HERO",
    "EPIC HEROES",
    "BATTLELINE",
    "DEDICATED TRANSPORTS",
    "OTHER DATASHEETS",
    "ALLIED UNITS",
    "FORTIFICATIONS",
];

/// Battle sizes printed in roster preambles, e.g. "Strike Force (2000 points)".
pub const GAME_FORMATS: &[&str] = &["Strike Force", "Incursion", "Onslaught", "Combat Patrol"];

/// Marker that ends the preamble-looking trailer of app exports.
const EXPORT_SIGNATURE: &str = "Exported with";

const BULLETS: [char; 2] = ['•', '◦'];

lazy_static! {
    // "(1990 points)", "(75 Points)", "(1 point)"
    pub static ref POINTS_PATTERN: Regex = Regex::new(r"(?i)\((\d+)\s*points?\)").unwrap();
    static ref POINTS_REMOVAL_PATTERN: Regex = Regex::new(r"(?i)\s*\(\d+\s*points?\)").unwrap();

    // Already-cleaned unit lines end in a bare "(75)"
    pub static ref BARE_POINTS_PATTERN: Regex = Regex::new(r"\((\d+)\)\s*$").unwrap();

    static ref ENHANCEMENT_MARKER: Regex = Regex::new(r"(?i)enhancements?:").unwrap();
    // "(+30 pts)" trailing an enhancement name
    static ref ENHANCEMENT_COST: Regex = Regex::new(r"(?i)\s*\(\+?\d+\s*(?:pts?|points?)\)").unwrap();

    // "• 4x Assault Intercessors"
    pub static ref BULLET_MODEL: Regex = Regex::new(r"^\s*•\s*(\d+)\s*x\s+\S").unwrap();

    // "Char1: 3x The Silent King (420 pts): Warlord", "2x Cryptothralls (60 pts): ..."
    // and the unprefixed "Chaos Lord (105 pts)"
    pub static ref STRUCTURED_UNIT: Regex =
        Regex::new(r"(?i)^(?:Char\d+:\s*)?(?:(\d+)x\s+)?([^•◦\s].*?)\s*\((\d+)\s*pts?\)").unwrap();
    pub static ref CHARACTER_PREFIX: Regex = Regex::new(r"(?i)^Char\d+:\s*(\d+)x\s+\S").unwrap();
    pub static ref COUNT_PREFIX: Regex = Regex::new(r"^(\d+)x\s+\S").unwrap();

    // "Chaos Lord [125 pts]: Warlord, Enhancement: Dread Majesty"
    pub static ref COMPACT_UNIT: Regex =
        Regex::new(r"(?i)^([^•◦#\s].*?)\s*\[(\d+)\s*pts?\](?::\s*(.*))?$").unwrap();
    pub static ref COMPACT_HEADER: Regex = Regex::new(r"(?i)^(.*?)\s*\[(\d+)\s*pts?\]\s*$").unwrap();
    pub static ref DETACHMENT_CHOICE: Regex = Regex::new(r"(?i)^\s*Detachment Choice:\s*(.+?)\s*$").unwrap();

    // "+ FACTION KEYWORD: Xenos - Necrons"
    pub static ref BORDERED_FIELD: Regex = Regex::new(r"^\+\s*([A-Za-z][A-Za-z ]*?)\s*:\s*(.*?)\s*$").unwrap();

    static ref DIGIT: Regex = Regex::new(r"\d").unwrap();
    pub static ref NUMBER: Regex = Regex::new(r"(\d+)").unwrap();
}

/// True for a recognized roster section label or a markdown `##` heading.
///
/// With `generic` set (Legacy dialect) any all-uppercase line that has at least
/// one letter and no digit also counts.
pub fn is_section_header(line: &str, generic: bool) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    if is_markdown_heading(trimmed) || SECTION_HEADERS.contains(&trimmed) {
        return true;
    }
    generic
        && trimmed.chars().any(|c| c.is_alphabetic())
        && !DIGIT.is_match(trimmed)
        && trimmed == trimmed.to_uppercase()
}

pub fn is_markdown_heading(line: &str) -> bool {
    line.trim_start().starts_with("##")
}

pub fn is_points_line(line: &str) -> bool {
    POINTS_PATTERN.is_match(line)
}

pub fn is_enhancement_line(line: &str) -> bool {
    ENHANCEMENT_MARKER.is_match(line)
}

pub fn is_game_format_line(line: &str) -> bool {
    GAME_FORMATS.iter().any(|format| line.contains(format))
}

pub fn is_army_info_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && !is_points_line(trimmed)
        && !trimmed.contains(BULLETS)
        && !DIGIT.is_match(trimmed)
        && !trimmed.contains(EXPORT_SIGNATURE)
}

pub fn is_bullet_line(line: &str) -> bool {
    line.trim_start().starts_with(BULLETS)
}

pub fn is_export_signature(line: &str) -> bool {
    line.contains(EXPORT_SIGNATURE)
}

/// Number of leading whitespace characters, counting non-breaking spaces.
pub fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// The last "(N points)" in a line: byte offset where it starts and its value.
pub fn points_in_line(line: &str) -> Option<(usize, u32)> {
    let cap = POINTS_PATTERN.captures_iter(line).last()?;
    let whole = cap.get(0)?;
    let value = cap[1].parse().ok()?;
    Some((whole.start(), value))
}

/// A trailing bare "(N)" as written by the renderer.
pub fn bare_points_in_line(line: &str) -> Option<(usize, u32)> {
    let cap = BARE_POINTS_PATTERN.captures(line)?;
    let whole = cap.get(0)?;
    let value = cap[1].parse().ok()?;
    Some((whole.start(), value))
}

pub fn remove_points(line: &str) -> String {
    POINTS_REMOVAL_PATTERN.replace_all(line, "").trim_end().to_string()
}

/// Pull the enhancement's proper name out of a line carrying the marker.
///
/// Handles "• Enhancements: Bastion Plate", "Enhancement: Dread Majesty (+30 pts)"
/// and details lists such as "Warlord, Enhancement: Dread Majesty, Exalted weapon".
pub fn extract_enhancement(line: &str) -> Option<String> {
    let marker = ENHANCEMENT_MARKER.find(line)?;
    let rest = line[marker.end()..].trim();

    let name = match ENHANCEMENT_COST.find(rest) {
        Some(cost) => &rest[..cost.start()],
        None => rest.split(',').next().unwrap_or(rest),
    };
    let name = name.trim();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
