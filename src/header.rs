//! Roster preamble parsing, one grammar per dialect.

use tracing::debug;

use crate::classify::{
    is_army_info_line, is_game_format_line, is_points_line, is_section_header, points_in_line, remove_points,
    BORDERED_FIELD, COMPACT_HEADER, DETACHMENT_CHOICE, NUMBER,
};
use crate::dialect::is_border_line;
use crate::roster::{ArmyHeader, Dialect};

/// Header fields plus the index of the first line the unit parser should look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderParse {
    pub header: ArmyHeader,
    pub units_start: usize,
}

pub fn parse_header<S: AsRef<str>>(dialect: Dialect, lines: &[S]) -> HeaderParse {
    let parsed = match dialect {
        Dialect::Legacy => parse_legacy_header(lines),
        Dialect::Bordered => parse_bordered_header(lines),
        Dialect::Compact => parse_compact_header(lines),
    };
    debug!(
        ?dialect,
        faction = %parsed.header.faction_line.join(" - "),
        total_points = ?parsed.header.total_points,
        units_start = parsed.units_start,
        "parsed roster header"
    );
    parsed
}

// ─────────────────────────────────────────────────────────────────────────────
// Legacy
// ─────────────────────────────────────────────────────────────────────────────

/// Free-text preamble. The first non-format points line is the roster title;
/// every army-info line anywhere in the document joins the faction line.
pub fn parse_legacy_header<S: AsRef<str>>(lines: &[S]) -> HeaderParse {
    let mut header = ArmyHeader::default();
    let mut units_start = 0;

    for (index, raw) in lines.iter().enumerate() {
        let line = raw.as_ref().trim();
        if line.is_empty() || is_section_header(line, true) {
            continue;
        }

        if header.title_line.is_none() && is_points_line(line) && !is_game_format_line(line) {
            let name = remove_points(line);
            header.roster_name = (!name.is_empty()).then_some(name);
            header.total_points = points_in_line(line).map(|(_, points)| points);
            header.title_line = Some(line.to_string());
            units_start = index + 1;
            continue;
        }

        if is_points_line(line) || is_game_format_line(line) {
            continue;
        }

        if is_army_info_line(line) {
            let info = if line == "Space Marines" { "SM" } else { line };
            header.faction_line.push(info.to_string());
        }
    }

    HeaderParse { header, units_start }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bordered
// ─────────────────────────────────────────────────────────────────────────────

/// "+ FIELD: value" lines between two `+++` borders.
pub fn parse_bordered_header<S: AsRef<str>>(lines: &[S]) -> HeaderParse {
    let mut header = ArmyHeader::default();
    let mut faction = None;
    let mut detachment = None;

    let opening = lines.iter().position(|line| is_border_line(line.as_ref()));
    let Some(opening) = opening else {
        return HeaderParse { header, units_start: 0 };
    };

    let mut units_start = lines.len();
    for (index, raw) in lines.iter().enumerate().skip(opening + 1) {
        let line = raw.as_ref().trim();
        if is_border_line(line) {
            units_start = index + 1;
            break;
        }
        if !line.starts_with('+') {
            // Unterminated block: units begin at the first non-field line.
            units_start = index;
            break;
        }

        let Some(cap) = BORDERED_FIELD.captures(line) else {
            continue;
        };
        let value = cap[2].trim();
        match cap[1].to_uppercase().as_str() {
            "FACTION KEYWORD" => {
                let keyword = value.rsplit('-').next().unwrap_or(value).trim();
                faction = Some(keyword.to_string());
            }
            "DETACHMENT" => detachment = Some(value.to_string()),
            "TOTAL ARMY POINTS" => {
                header.total_points = NUMBER.captures(value).and_then(|num| num[1].parse().ok());
            }
            _ => {}
        }
    }

    header.faction_line = [faction, detachment]
        .into_iter()
        .flatten()
        .filter(|field| !field.is_empty())
        .collect();

    HeaderParse { header, units_start }
}

// ─────────────────────────────────────────────────────────────────────────────
// Compact
// ─────────────────────────────────────────────────────────────────────────────

/// Single "Faction - Detachment [N pts]" line, detachment overridable by a
/// "Detachment Choice:" line anywhere in the document.
pub fn parse_compact_header<S: AsRef<str>>(lines: &[S]) -> HeaderParse {
    let mut header = ArmyHeader::default();

    let first = lines
        .iter()
        .position(|line| !line.as_ref().trim().is_empty())
        .unwrap_or(0);
    let units_start = first + 1;

    if let Some(cap) = lines.get(first).and_then(|line| COMPACT_HEADER.captures(line.as_ref().trim())) {
        header.faction_line = cap[1]
            .split(" - ")
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
        header.total_points = cap[2].parse().ok();
    }

    let choice = lines
        .iter()
        .find_map(|line| DETACHMENT_CHOICE.captures(line.as_ref()).map(|cap| cap[1].to_string()));
    if let Some(choice) = choice {
        if header.faction_line.len() >= 2 {
            let last = header.faction_line.len() - 1;
            header.faction_line[last] = choice;
        } else {
            header.faction_line.push(choice);
        }
    }

    HeaderParse { header, units_start }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    #[test]
    fn legacy_title_and_army_info() {
        let input = lines(
            "The Goal is to Survive the Shooting Phase  (1990 points)\n\
             \n\
             Chaos Space Marines\n\
             Fellhammer Siege-host\n\
             Strike Force (2000 points)\n\
             \n\
             CHARACTERS\n\
             \n\
             Chaos Lord in Terminator Armour (105 points)\n\
             \u{20}\u{20}• Warlord\n\
             \n\
             Exported with App Version: v1.24.0 (39)",
        );
        let parsed = parse_legacy_header(&input);
        assert_eq!(
            parsed.header.title_line.as_deref(),
            Some("The Goal is to Survive the Shooting Phase  (1990 points)")
        );
        assert_eq!(
            parsed.header.roster_name.as_deref(),
            Some("The Goal is to Survive the Shooting Phase")
        );
        assert_eq!(parsed.header.total_points, Some(1990));
        assert_eq!(parsed.header.faction_line, vec!["Chaos Space Marines", "Fellhammer Siege-host"]);
        assert_eq!(parsed.units_start, 1);
        assert!(parsed.header.faction_flags().chaos_space_marines);
    }

    #[test]
    fn legacy_space_marines_abbreviated() {
        let input = lines("The Hunt Never Ended (2000 Points)\n\nSpace Marines\nDark Angels");
        let parsed = parse_legacy_header(&input);
        assert_eq!(parsed.header.faction_line, vec!["SM", "Dark Angels"]);
    }

    #[test]
    fn legacy_game_format_is_not_the_title() {
        let input = lines("Strike Force (2000 points)\nIntercessor Squad (80 points)");
        let parsed = parse_legacy_header(&input);
        assert_eq!(parsed.header.title_line.as_deref(), Some("Intercessor Squad (80 points)"));
        assert_eq!(parsed.units_start, 2);
    }

    #[test]
    fn legacy_without_points_has_empty_title() {
        let input = lines("Just Some Words\nMore Words");
        let parsed = parse_legacy_header(&input);
        assert!(parsed.header.title_line.is_none());
        assert_eq!(parsed.units_start, 0);
    }

    #[test]
    fn bordered_fields() {
        let input = lines(
            "++++++++++++++++++++++++++++++++++++++++\n\
             + FACTION KEYWORD: Chaos - Chaos Space Marines\n\
             + DETACHMENT: Pactbound Zealots\n\
             + TOTAL ARMY POINTS: 1990pts\n\
             +\n\
             + WARLORD: Char1: Chaos Lord\n\
             ++++++++++++++++++++++++++++++++++++++++\n\
             \n\
             Char1: 1x Chaos Lord (125 pts): Warlord",
        );
        let parsed = parse_bordered_header(&input);
        assert_eq!(parsed.header.faction_line, vec!["Chaos Space Marines", "Pactbound Zealots"]);
        assert_eq!(parsed.header.total_points, Some(1990));
        assert_eq!(parsed.units_start, 7);
        assert!(parsed.header.faction_flags().chaos_space_marines);
    }

    #[test]
    fn bordered_takes_most_specific_keyword() {
        let input = lines("++++\n+ FACTION KEYWORD: Imperium - Adeptus Astartes - Dark Angels\n++++");
        let parsed = parse_bordered_header(&input);
        assert_eq!(parsed.header.faction_line, vec!["Dark Angels"]);
        assert_eq!(parsed.units_start, 3);
    }

    #[test]
    fn compact_header_line() {
        let input = lines(
            "Chaos Space Marines - Pactbound Zealots [1990 pts]\n\
             ## Characters\n\
             Chaos Lord [95 pts]: Warlord",
        );
        let parsed = parse_compact_header(&input);
        assert_eq!(parsed.header.faction_line, vec!["Chaos Space Marines", "Pactbound Zealots"]);
        assert_eq!(parsed.header.total_points, Some(1990));
        assert_eq!(parsed.units_start, 1);
    }

    #[test]
    fn compact_detachment_choice_overrides() {
        let input = lines(
            "T'au Empire - Kauyon [2000 pts]\n\
             Detachment Choice: Mont'ka\n\
             ## Characters",
        );
        let parsed = parse_compact_header(&input);
        assert_eq!(parsed.header.faction_line, vec!["T'au Empire", "Mont'ka"]);
        assert!(parsed.header.faction_flags().tau_empire);

        let input = lines("Necrons [1000 pts]\nDetachment Choice: Awakened Dynasty\n## Battleline");
        let parsed = parse_compact_header(&input);
        assert_eq!(parsed.header.faction_line, vec!["Necrons", "Awakened Dynasty"]);
    }
}
