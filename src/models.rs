//! Model counting from the bullet structure under a unit line.
//!
//! Export tools list the models of a unit as "• Nx Name" bullets with the
//! model's wargear indented underneath. A bullet without anything nested under
//! it is a piece of equipment, not a model. This is a structural proxy and can
//! miscount; it is kept as is.

use crate::classify::{
    indentation, is_markdown_heading, is_section_header, BULLET_MODEL, CHARACTER_PREFIX, COMPACT_UNIT,
    COUNT_PREFIX, STRUCTURED_UNIT,
};
use crate::roster::{Dialect, RosterEntry};

/// Number of models in the unit opened at `start`. Never less than 1.
pub fn count_models<S: AsRef<str>>(lines: &[S], start: usize, dialect: Dialect) -> u32 {
    let Some(first) = lines.get(start).map(AsRef::as_ref) else {
        return 1;
    };

    match dialect {
        Dialect::Compact => count_compact_models(lines, start),
        Dialect::Bordered if STRUCTURED_UNIT.is_match(first.trim()) => count_structured_models(lines, start),
        Dialect::Bordered | Dialect::Legacy => count_indented_models(lines, start),
    }
}

/// Fill `model_count` on every unit. Only called when counts are displayed.
pub fn attach_model_counts<S: AsRef<str>>(entries: &mut [RosterEntry], lines: &[S], dialect: Dialect) {
    for entry in entries.iter_mut() {
        if let RosterEntry::Unit(unit) = entry {
            unit.model_count = Some(count_models(lines, unit.source_line, dialect));
        }
    }
}

fn bullet_count(line: &str) -> Option<u32> {
    BULLET_MODEL.captures(line).and_then(|cap| cap[1].parse().ok())
}

/// Legacy and bordered blocks: only the shallowest bullets count, and only
/// when wargear is nested directly beneath them.
pub fn count_indented_models<S: AsRef<str>>(lines: &[S], start: usize) -> u32 {
    let base = indentation(lines[start].as_ref());

    let block: Vec<(usize, &str)> = lines[start + 1..]
        .iter()
        .map(AsRef::as_ref)
        .take_while(|line| {
            !line.trim().is_empty() && !is_section_header(line, false) && indentation(line) > base
        })
        .map(|line| (indentation(line), line))
        .collect();

    let Some(level) = block.iter().map(|(indent, _)| *indent).min() else {
        return 1;
    };

    let total: u32 = block
        .iter()
        .enumerate()
        .filter(|(_, (indent, _))| *indent == level)
        .filter_map(|(pos, (_, line))| {
            let count = bullet_count(line)?;
            let has_wargear = block.get(pos + 1).is_some_and(|(next, _)| *next > level);
            has_wargear.then_some(count)
        })
        .fold(0, u32::saturating_add);

    total.max(1)
}

/// "CharK: Nx Name" and "Nx Name" unit lines carry the count themselves;
/// otherwise sum the flat bullet list under the line.
pub fn count_structured_models<S: AsRef<str>>(lines: &[S], start: usize) -> u32 {
    let first = lines[start].as_ref().trim();

    let prefixed = CHARACTER_PREFIX
        .captures(first)
        .or_else(|| COUNT_PREFIX.captures(first))
        .and_then(|cap| cap[1].parse::<u32>().ok());
    if let Some(count) = prefixed {
        return count.max(1);
    }

    let total: u32 = lines[start + 1..]
        .iter()
        .map(AsRef::as_ref)
        .take_while(|line| !line.trim().is_empty() && !STRUCTURED_UNIT.is_match(line.trim()))
        .filter_map(bullet_count)
        .fold(0, u32::saturating_add);

    total.max(1)
}

/// Compact records: sum bullet counts until the next heading or unit record.
pub fn count_compact_models<S: AsRef<str>>(lines: &[S], start: usize) -> u32 {
    let total: u32 = lines[start + 1..]
        .iter()
        .map(AsRef::as_ref)
        .take_while(|line| !is_markdown_heading(line) && !COMPACT_UNIT.is_match(line.trim()))
        .filter_map(bullet_count)
        .fold(0, u32::saturating_add);

    total.max(1)
}
