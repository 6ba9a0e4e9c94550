//! Rendering of a parsed roster and the post-processing pipeline.
//!
//! [`render`] turns the header and the unit entries into lines. The pipeline
//! steps then run in a fixed order over those lines: inline enhancements,
//! consolidate duplicates, one-liner, strip empty lines. [`finish`] joins the
//! result and folds apostrophes and spaces.

use crate::classify::{remove_points, BARE_POINTS_PATTERN};
use crate::options::FormattingOptions;
use crate::roster::{ArmyHeader, RosterEntry, Unit};
use crate::text::normalize_output;

/// Sub-line written under a unit that carries an enhancement.
pub const ENHANCEMENT_LINE_PREFIX: &str = "  • Enhancement: ";

pub fn render_header(header: &ArmyHeader, options: &FormattingOptions) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(title) = &header.title_line {
        lines.push(if options.show_points {
            title.clone()
        } else {
            remove_points(title)
        });
    }

    if !header.faction_line.is_empty() {
        let mut faction = header.faction_line.join(" - ");
        // Exports without a title line carry their total on the faction line.
        if header.title_line.is_none() && options.show_points {
            if let Some(total) = header.total_points {
                faction.push_str(&format!(" ({} points)", total));
            }
        }
        lines.push(faction);
    }

    lines
}

pub fn render_unit(unit: &Unit, options: &FormattingOptions) -> Vec<String> {
    let mut line = String::new();
    if options.show_models {
        if let Some(count) = unit.model_count.filter(|count| *count > 1) {
            line.push_str(&format!("{}x ", count));
        }
    }
    line.push_str(&unit.display_name);
    if options.show_points {
        if let Some(points) = unit.points {
            line.push_str(&format!(" ({})", points));
        }
    }

    let mut lines = vec![line];
    if let Some(enhancement) = &unit.enhancement {
        lines.push(format!("{}{}", ENHANCEMENT_LINE_PREFIX, enhancement));
    }
    lines
}

/// Header block, one blank line when units follow it, then the units.
pub fn render(header: &ArmyHeader, entries: &[RosterEntry], options: &FormattingOptions) -> Vec<String> {
    let mut lines = Vec::new();

    if options.show_header {
        lines.extend(render_header(header, options));
        if !lines.is_empty() && !entries.is_empty() {
            lines.push(String::new());
        }
    }

    for entry in entries {
        match entry {
            RosterEntry::Unit(unit) => lines.extend(render_unit(unit, options)),
            RosterEntry::Separator => lines.push(String::new()),
        }
    }

    lines
}

// ─────────────────────────────────────────────────────────────────────────────
// Pipeline
// ─────────────────────────────────────────────────────────────────────────────

/// "Unit (P)" + "  • Enhancement: E" becomes "Unit [E] (P)"; without a points
/// suffix the bracket is appended.
pub fn inline_enhancements(lines: Vec<String>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(lines.len());

    for line in lines {
        if let Some(enhancement) = line.strip_prefix(ENHANCEMENT_LINE_PREFIX) {
            if let Some(unit_line) = merged.last_mut().filter(|prev| !prev.trim().is_empty()) {
                *unit_line = insert_enhancement(unit_line, enhancement.trim());
                continue;
            }
        }
        merged.push(line);
    }

    merged
}

fn insert_enhancement(unit_line: &str, enhancement: &str) -> String {
    match BARE_POINTS_PATTERN.find(unit_line) {
        Some(points) => format!(
            "{} [{}] {}",
            unit_line[..points.start()].trim_end(),
            enhancement,
            &unit_line[points.start()..]
        ),
        None => format!("{} [{}]", unit_line, enhancement),
    }
}

/// Runs of identical non-empty lines collapse to "N line". Repeats that are
/// not adjacent stay as they are.
pub fn consolidate_duplicates(lines: Vec<String>) -> Vec<String> {
    let mut runs: Vec<(usize, String)> = Vec::new();

    for line in lines {
        if let Some((count, prev)) = runs.last_mut() {
            if *prev == line && !line.trim().is_empty() {
                *count += 1;
                continue;
            }
        }
        runs.push((1, line));
    }

    runs.into_iter()
        .map(|(count, line)| if count > 1 { format!("{} {}", count, line) } else { line })
        .collect()
}

pub fn to_one_liner(lines: Vec<String>) -> Vec<String> {
    let parts: Vec<&str> = lines.iter().map(|line| line.trim()).filter(|line| !line.is_empty()).collect();
    if parts.is_empty() {
        Vec::new()
    } else {
        vec![parts.join(", ")]
    }
}

pub fn strip_empty_lines(lines: Vec<String>) -> Vec<String> {
    lines.into_iter().filter(|line| !line.trim().is_empty()).collect()
}

/// Apply the enabled pipeline steps in their fixed order.
pub fn post_process(mut lines: Vec<String>, options: &FormattingOptions) -> Vec<String> {
    if options.effective_inline_enhancements() {
        lines = inline_enhancements(lines);
    }
    if options.consolidate_duplicates {
        lines = consolidate_duplicates(lines);
    }
    if options.one_liner {
        lines = to_one_liner(lines);
    }
    if options.no_empty_lines {
        lines = strip_empty_lines(lines);
    }
    lines
}

pub fn finish(lines: &[String]) -> String {
    normalize_output(&lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    fn unit(name: &str, points: Option<u32>, enhancement: Option<&str>) -> Unit {
        Unit {
            raw_name: name.to_string(),
            display_name: name.to_string(),
            points,
            enhancement: enhancement.map(str::to_string),
            model_count: None,
            source_line: 0,
            order: 0,
        }
    }

    #[test]
    fn unit_lines() {
        let options = FormattingOptions::default();
        let mut lord = unit("Lord", Some(125), Some("Dread Majesty"));
        assert_eq!(render_unit(&lord, &options), vec!["Lord (125)", "  • Enhancement: Dread Majesty"]);

        lord.model_count = Some(1);
        let with_models = FormattingOptions {
            show_models: true,
            show_points: false,
            ..options
        };
        assert_eq!(render_unit(&lord, &with_models)[0], "Lord");

        let mut squad = unit("Assault Intercessors", Some(75), None);
        squad.model_count = Some(5);
        assert_eq!(render_unit(&squad, &with_models), vec!["5x Assault Intercessors"]);
        assert_eq!(render_unit(&squad, &options), vec!["Assault Intercessors (75)"]);
    }

    #[test]
    fn legacy_header_block() {
        let header = ArmyHeader {
            roster_name: Some("The Hunt".to_string()),
            faction_line: vec!["SM".to_string(), "Dark Angels".to_string()],
            total_points: Some(2000),
            title_line: Some("The Hunt (2000 Points)".to_string()),
        };
        let entries = vec![RosterEntry::Unit(unit("Rhino", Some(75), None))];

        let lines = render(&header, &entries, &FormattingOptions::default());
        assert_eq!(lines, vec!["The Hunt (2000 Points)", "SM - Dark Angels", "", "Rhino (75)"]);

        let hidden = FormattingOptions {
            show_points: false,
            ..FormattingOptions::default()
        };
        assert_eq!(render(&header, &entries, &hidden)[0], "The Hunt");
    }

    #[test]
    fn fielded_header_block() {
        let header = ArmyHeader {
            faction_line: vec!["Chaos Space Marines".to_string(), "Pactbound Zealots".to_string()],
            total_points: Some(1990),
            ..ArmyHeader::default()
        };
        assert_eq!(
            render_header(&header, &FormattingOptions::default()),
            vec!["Chaos Space Marines - Pactbound Zealots (1990 points)"]
        );
    }

    #[test]
    fn header_without_units_has_no_trailing_blank() {
        let header = ArmyHeader {
            faction_line: vec!["Necrons".to_string()],
            ..ArmyHeader::default()
        };
        assert_eq!(render(&header, &[], &FormattingOptions::default()), vec!["Necrons"]);

        let hidden = FormattingOptions {
            show_header: false,
            ..FormattingOptions::default()
        };
        let entries = vec![RosterEntry::Unit(unit("Rhino", Some(75), None))];
        assert_eq!(render(&header, &entries, &hidden), vec!["Rhino (75)"]);
    }

    #[test]
    fn inline_before_points_or_appended() {
        let lines = strings(&["Lord (125)", "  • Enhancement: Dread Majesty", "", "Warpsmith", "  • Enhancement: Soul Link"]);
        assert_eq!(
            inline_enhancements(lines),
            vec!["Lord [Dread Majesty] (125)", "", "Warpsmith [Soul Link]"]
        );
    }

    #[test]
    fn orphan_enhancement_line_is_kept() {
        let lines = strings(&["", "  • Enhancement: Dread Majesty"]);
        assert_eq!(inline_enhancements(lines.clone()), lines);
    }

    #[test]
    fn consolidation_only_merges_adjacent() {
        let lines = strings(&["Cultists (50)", "Cultists (50)", "", "Rhino (75)", "", "Cultists (50)"]);
        assert_eq!(
            consolidate_duplicates(lines),
            vec!["2 Cultists (50)", "", "Rhino (75)", "", "Cultists (50)"]
        );
    }

    #[test]
    fn one_liner_and_strip() {
        let lines = strings(&["Necrons", "", "Lord [Veil] (80)", "", "  Warriors (90)  "]);
        assert_eq!(to_one_liner(lines.clone()), vec!["Necrons, Lord [Veil] (80), Warriors (90)"]);
        assert_eq!(strip_empty_lines(lines).len(), 3);
        assert!(to_one_liner(strings(&["", " "])).is_empty());
    }

    #[test]
    fn pipeline_order() {
        let lines = strings(&[
            "Lord (125)",
            "  • Enhancement: Dread Majesty",
            "Lord (125)",
            "  • Enhancement: Dread Majesty",
            "",
            "Rhino (75)",
        ]);
        let options = FormattingOptions {
            one_liner: true,
            consolidate_duplicates: true,
            ..FormattingOptions::default()
        };
        assert_eq!(
            post_process(lines, &options),
            vec!["2 Lord [Dread Majesty] (125), Rhino (75)"]
        );
    }

    #[test]
    fn finish_normalizes_characters() {
        let lines = strings(&["T\u{2019}au\u{00A0}Empire", "Shas\u{2018}ui"]);
        assert_eq!(finish(&lines), "T'au Empire\nShas'ui");
    }
}
