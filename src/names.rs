//! Smart-format unit naming: pluralization and faction cosmetic rules.

use std::collections::HashMap;

use lazy_static::lazy_static;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::roster::FactionFlags;

/// Army-wide adjective dropped from the front of unit names.
const FACTION_QUALIFIER_PREFIX: &str = "Chaos ";

const SQUAD_SUFFIX: &str = " Squad";

/// Exact renames applied to every roster once the squad suffix is gone.
static GENERIC_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Terminator Assaults", "Assault Terminators"),
        ("Infantrys", "Infantry"),
        ("Sisters Novitiates", "Novitiates"),
    ])
});

/// Chaos Space Marines nicknames. Identity rows document names that must stay as-is.
static CHAOS_SPACE_MARINE_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Cultist Mob", "Cultists"),
        ("Accursed Cultists", "Accursed Cultists"),
        ("Legionaries", "Legionaries"),
        ("Possessed", "Possessed"),
    ])
});

/// T'au units that read as plural once "Battlesuit" is gone.
const TAU_UNIT_BASES: &[&str] = &["Broadside", "Crisis Fireknife", "Crisis Starscythe", "Stealth"];

lazy_static! {
    static ref BATTLESUIT_TOKEN: Regex = Regex::new(r"\bBattlesuit\b").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref BATTLESUITS_SUFFIX: Regex = Regex::new(r"^(.+?)\s+Battlesuits$").unwrap();
    static ref COMMANDER_PREFIX: Regex = Regex::new(r"^Commander (?:in )?").unwrap();
    static ref STRAY_PLURAL: Regex = Regex::new(r"\s+s$").unwrap();
}

fn pluralize(base: &str) -> String {
    if base.ends_with('s') {
        base.to_string()
    } else {
        format!("{}s", base)
    }
}

/// Rewrite a raw unit name for display. Returns the name unchanged when
/// `smart_format` is off.
pub fn format_unit_name(unit_name: &str, flags: FactionFlags, smart_format: bool) -> String {
    if !smart_format {
        return unit_name.to_string();
    }

    let mut name = unit_name
        .strip_prefix(FACTION_QUALIFIER_PREFIX)
        .unwrap_or(unit_name)
        .to_string();

    if let Some(base) = name.strip_suffix(SQUAD_SUFFIX) {
        name = pluralize(base);
    }

    if let Some(renamed) = GENERIC_NAMES.get(name.as_str()) {
        name = renamed.to_string();
    }

    if flags.chaos_space_marines {
        if let Some(renamed) = CHAOS_SPACE_MARINE_NAMES.get(name.as_str()) {
            name = renamed.to_string();
        }
    }

    if flags.tau_empire {
        name = format_tau_unit_name(&name);
    }

    name
}

pub fn format_tau_unit_name(unit_name: &str) -> String {
    let without_keyword = BATTLESUIT_TOKEN.replace_all(unit_name, "");
    let mut formatted = WHITESPACE_RUN.replace_all(&without_keyword, " ").trim().to_string();

    if let Some(cap) = BATTLESUITS_SUFFIX.captures(&formatted) {
        formatted = pluralize(cap[1].trim());
    }

    formatted = COMMANDER_PREFIX.replace(&formatted, "").trim().to_string();

    if TAU_UNIT_BASES.contains(&formatted.as_str()) {
        formatted.push('s');
    }

    STRAY_PLURAL.replace(&formatted, "s").into_owned()
}
