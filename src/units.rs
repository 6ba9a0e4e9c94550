//! Unit parsing: a single forward pass over the roster body.
//!
//! A unit stays open until the next unit line or the end of input, so every
//! enhancement line in between lands on it. Separators are decided at flush
//! time by comparing display names with the previously emitted unit.

use tracing::trace;

use crate::classify::{
    bare_points_in_line, extract_enhancement, is_bullet_line, is_enhancement_line, is_export_signature,
    is_game_format_line, is_section_header, points_in_line, COMPACT_UNIT, STRUCTURED_UNIT,
};
use crate::names::format_unit_name;
use crate::roster::{Dialect, FactionFlags, RosterEntry, Unit};

/// Name and points read off a line that opens a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitLine {
    pub name: String,
    pub points: Option<u32>,
}

/// "Name (N points)", or the "Name (N)" shape the renderer writes back out.
pub fn legacy_unit_line(line: &str) -> Option<UnitLine> {
    if is_bullet_line(line) || is_export_signature(line) {
        return None;
    }
    let (start, points) = points_in_line(line).or_else(|| bare_points_in_line(line))?;
    let name = line[..start].trim();
    if name.is_empty() {
        return None;
    }
    Some(UnitLine {
        name: name.to_string(),
        points: Some(points),
    })
}

pub fn structured_unit_line(line: &str) -> Option<UnitLine> {
    let cap = STRUCTURED_UNIT.captures(line)?;
    Some(UnitLine {
        name: cap[2].trim().to_string(),
        points: cap[3].parse().ok(),
    })
}

pub fn compact_unit_line(line: &str) -> Option<UnitLine> {
    let cap = COMPACT_UNIT.captures(line)?;
    Some(UnitLine {
        name: cap[1].trim().to_string(),
        points: cap[2].parse().ok(),
    })
}

/// Recognize a unit-opening line in the grammar of `dialect`.
pub fn unit_line(dialect: Dialect, line: &str) -> Option<UnitLine> {
    match dialect {
        Dialect::Legacy => legacy_unit_line(line),
        Dialect::Bordered => structured_unit_line(line).or_else(|| legacy_unit_line(line)),
        Dialect::Compact => compact_unit_line(line),
    }
}

/// Parser state carried from line to line.
struct UnitParser {
    dialect: Dialect,
    flags: FactionFlags,
    smart_format: bool,
    entries: Vec<RosterEntry>,
    current: Option<Unit>,
    last_emitted_name: Option<String>,
    header_processed: bool,
    emitted: usize,
}

impl UnitParser {
    fn new(dialect: Dialect, flags: FactionFlags, smart_format: bool) -> Self {
        UnitParser {
            dialect,
            flags,
            smart_format,
            entries: Vec::new(),
            current: None,
            last_emitted_name: None,
            // Only the legacy grammar has a preamble that can look like units.
            header_processed: dialect != Dialect::Legacy,
            emitted: 0,
        }
    }

    fn flush(&mut self) {
        let Some(mut unit) = self.current.take() else {
            return;
        };

        if let Some(last) = &self.last_emitted_name {
            if *last != unit.display_name {
                self.entries.push(RosterEntry::Separator);
            }
        }

        unit.order = self.emitted;
        self.emitted += 1;
        self.last_emitted_name = Some(unit.display_name.clone());
        self.entries.push(RosterEntry::Unit(unit));
    }

    fn open(&mut self, index: usize, line: &str, unit_line: UnitLine) {
        self.flush();

        let display_name = format_unit_name(&unit_line.name, self.flags, self.smart_format);
        trace!(line = index, raw = %unit_line.name, display = %display_name, "unit");

        let enhancement = if is_enhancement_line(line) {
            extract_enhancement(line)
        } else {
            None
        };

        self.current = Some(Unit {
            raw_name: unit_line.name,
            display_name,
            points: unit_line.points,
            enhancement,
            model_count: None,
            source_line: index,
            order: self.emitted,
        });
    }

    fn feed(&mut self, index: usize, raw: &str) {
        let line = raw.trim();
        if line.is_empty() || is_section_header(line, self.dialect == Dialect::Legacy) {
            return;
        }

        let opened = unit_line(self.dialect, line);

        if !self.header_processed {
            match opened {
                Some(_) if !is_game_format_line(line) => self.header_processed = true,
                _ => return,
            }
        }

        if let Some(unit_line) = opened {
            self.open(index, line, unit_line);
        } else if is_enhancement_line(line) {
            if let (Some(unit), Some(enhancement)) = (self.current.as_mut(), extract_enhancement(line)) {
                unit.enhancement = Some(enhancement);
            }
        }
    }

    fn finish(mut self) -> Vec<RosterEntry> {
        self.flush();
        self.entries
    }
}

/// Parse every unit from `start` onwards.
///
/// Consecutive units with the same display name stay adjacent; any other pair
/// is split by a single [`RosterEntry::Separator`].
pub fn parse_units<S: AsRef<str>>(
    dialect: Dialect,
    lines: &[S],
    start: usize,
    flags: FactionFlags,
    smart_format: bool,
) -> Vec<RosterEntry> {
    let mut parser = UnitParser::new(dialect, flags, smart_format);
    for (index, line) in lines.iter().enumerate().skip(start) {
        parser.feed(index, line.as_ref());
    }
    parser.finish()
}
