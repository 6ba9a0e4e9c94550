//! Canonical roster representation shared by the parsers and the renderer.

use serde::Serialize;

use crate::text::normalize_faction_name;

/// Export format a roster was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dialect {
    /// "+++" bordered fixed-field header, structured or legacy unit lines.
    Bordered,
    /// "Name - Detachment [N pts]" header with `##` sections and `Name [N pts]:` units.
    Compact,
    /// Free-text preamble and "Name (N points)" unit blocks; also the fallback.
    Legacy,
}

/// Roster preamble: title, faction/detachment line and total points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArmyHeader {
    pub roster_name: Option<String>,
    /// Joined with " - " when rendered.
    pub faction_line: Vec<String>,
    pub total_points: Option<u32>,
    /// Verbatim roster title line (Legacy only), points parenthetical included.
    pub title_line: Option<String>,
}

impl ArmyHeader {
    pub fn is_empty(&self) -> bool {
        self.title_line.is_none() && self.faction_line.is_empty() && self.total_points.is_none()
    }

    pub fn faction_flags(&self) -> FactionFlags {
        FactionFlags::from_army_info(&self.faction_line)
    }
}

/// Factions with their own smart-format rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FactionFlags {
    pub tau_empire: bool,
    pub chaos_space_marines: bool,
}

impl FactionFlags {
    pub fn from_army_info<S: AsRef<str>>(lines: &[S]) -> Self {
        let keys: Vec<String> = lines.iter().map(|line| normalize_faction_name(line.as_ref())).collect();
        FactionFlags {
            tau_empire: keys.iter().any(|key| key.contains("tauempire")),
            chaos_space_marines: keys.iter().any(|key| key.contains("chaosspacemarines")),
        }
    }
}

/// One purchasable entry of a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unit {
    pub raw_name: String,
    pub display_name: String,
    pub points: Option<u32>,
    pub enhancement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_count: Option<u32>,
    /// Index of the unit's opening line in the source line array.
    pub source_line: usize,
    pub order: usize,
}

/// Parser output: units in source order with the blank lines between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RosterEntry {
    Unit(Unit),
    Separator,
}

impl RosterEntry {
    pub fn as_unit(&self) -> Option<&Unit> {
        match self {
            RosterEntry::Unit(unit) => Some(unit),
            RosterEntry::Separator => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faction_flags_from_header_lines() {
        let flags = FactionFlags::from_army_info(&["T\u{2019}au Empire", "Kauyon"]);
        assert!(flags.tau_empire);
        assert!(!flags.chaos_space_marines);

        let flags = FactionFlags::from_army_info(&["Chaos Space Marines", "Fellhammer Siege-host"]);
        assert!(flags.chaos_space_marines);
        assert!(!flags.tau_empire);
    }

    #[test]
    fn empty_header() {
        assert!(ArmyHeader::default().is_empty());
        let header = ArmyHeader {
            faction_line: vec!["SM".to_string()],
            ..ArmyHeader::default()
        };
        assert!(!header.is_empty());
    }
}
