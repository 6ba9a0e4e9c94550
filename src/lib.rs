//! Roster text normalization.
//!
//! Army lists exported by list-building tools come in a few incompatible text
//! dialects. [`normalize_roster`] detects the dialect, parses the header and
//! the units into a canonical form, and renders them back out under a set of
//! [`FormattingOptions`].
//!
//! ```
//! use roster_cleaner::{normalize_roster, FormattingOptions};
//!
//! let input = "Armoured Column (150 points)\n\nRhino (75 points)\nRhino (75 points)";
//! let options = FormattingOptions {
//!     consolidate_duplicates: true,
//!     show_header: false,
//!     ..FormattingOptions::default()
//! };
//! assert_eq!(normalize_roster(input, &options), "2 Rhino (75)");
//! ```

pub mod classify;
pub mod dialect;
pub mod error;
pub mod header;
pub mod models;
pub mod names;
pub mod options;
pub mod render;
pub mod roster;
pub mod text;
pub mod units;

use serde_json::Value;
use tracing::debug;

pub use dialect::detect_dialect;
pub use error::{Result, RosterError};
pub use options::{FormattingOptions, OptionsStore};
pub use roster::{ArmyHeader, Dialect, FactionFlags, RosterEntry, Unit};

use header::parse_header;
use models::attach_model_counts;
use render::{finish, post_process, render};
use text::normalize_output;
use units::parse_units;

/// A roster parsed into its canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRoster {
    pub dialect: Dialect,
    pub header: ArmyHeader,
    pub entries: Vec<RosterEntry>,
}

impl ParsedRoster {
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.entries.iter().filter_map(RosterEntry::as_unit)
    }
}

fn split_lines(input: &str) -> Vec<String> {
    input
        .trim()
        .split('\n')
        .map(|line| normalize_output(line.trim_end_matches('\r')))
        .collect()
}

/// Detect, parse and (when `show_models` is set) count models.
pub fn parse_roster(input: &str, options: &FormattingOptions) -> ParsedRoster {
    let lines = split_lines(input);

    let dialect = detect_dialect(&lines);
    let parsed = parse_header(dialect, &lines);
    let flags = parsed.header.faction_flags();

    let mut entries = parse_units(dialect, &lines, parsed.units_start, flags, options.smart_format);
    if options.show_models {
        attach_model_counts(&mut entries, &lines, dialect);
    }

    debug!(
        ?dialect,
        ?flags,
        units = entries.iter().filter(|entry| entry.as_unit().is_some()).count(),
        "parsed roster"
    );

    ParsedRoster {
        dialect,
        header: parsed.header,
        entries,
    }
}

/// Clean `input` into the configured output text.
///
/// Empty or whitespace-only input yields an empty string. Anything that is not
/// a recognized export is read with the legacy grammar on a best-effort basis.
pub fn normalize_roster(input: &str, options: &FormattingOptions) -> String {
    if input.trim().is_empty() {
        return String::new();
    }

    let roster = parse_roster(input, options);
    let lines = render(&roster.header, &roster.entries, options);
    finish(&post_process(lines, options))
}

/// [`normalize_roster`] over a loosely-typed request object holding `input`
/// and any of the camelCase option keys.
pub fn normalize_roster_value(request: &Value) -> Result<String> {
    let object = request
        .as_object()
        .ok_or_else(|| RosterError::invalid_argument("request", "an object"))?;
    let input = object
        .get("input")
        .and_then(Value::as_str)
        .ok_or_else(|| RosterError::invalid_argument("input", "a string"))?;
    let options = FormattingOptions::from_value(request)?;
    Ok(normalize_roster(input, &options))
}
