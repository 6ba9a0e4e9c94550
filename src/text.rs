//! Character-level text normalization shared by the parsers and the renderer.

use unicode_normalization::UnicodeNormalization;

/// Apostrophe look-alikes that export tools and word processors substitute for `'`.
const APOSTROPHE_VARIANTS: [char; 6] = ['\u{2018}', '\u{2019}', '\u{02BC}', '\u{2032}', '\u{2035}', '`'];

/// Space characters that should read as a plain space in the output.
const NON_BREAKING_SPACES: [char; 3] = ['\u{00A0}', '\u{202F}', '\u{2007}'];

pub fn normalize_apostrophes(text: &str) -> String {
    text.chars()
        .map(|ch| if APOSTROPHE_VARIANTS.contains(&ch) { '\'' } else { ch })
        .collect()
}

pub fn normalize_spaces(text: &str) -> String {
    text.chars()
        .map(|ch| if NON_BREAKING_SPACES.contains(&ch) { ' ' } else { ch })
        .collect()
}

/// Final output pass: plain apostrophes and plain spaces only.
pub fn normalize_output(text: &str) -> String {
    normalize_spaces(&normalize_apostrophes(text))
}

/// Reduce a faction name to a comparable key: lowercase ASCII letters and digits.
///
/// Diacritics are removed by decomposing to NFD and dropping combining marks,
/// so "T'au Émpïré!" becomes "tauempire".
pub fn normalize_faction_name(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|ch| !(0x0300..=0x036F).contains(&(*ch as u32)))
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apostrophe_variants_become_ascii() {
        let input = "\u{2018}foo\u{2019} `bar` \u{2032}baz\u{2035} \u{02BC}qux'";
        assert_eq!(normalize_apostrophes(input), "'foo' 'bar' 'baz' 'qux'");
    }

    #[test]
    fn standard_apostrophes_untouched() {
        assert_eq!(normalize_apostrophes("it's a test"), "it's a test");
        assert_eq!(normalize_apostrophes(""), "");
    }

    #[test]
    fn non_breaking_spaces_become_plain() {
        assert_eq!(normalize_spaces("Chaos\u{00A0}Lord\u{202F}(105)"), "Chaos Lord (105)");
    }

    #[test]
    fn faction_name_strips_diacritics_and_punctuation() {
        assert_eq!(normalize_faction_name("T'au Émpïré!"), "tauempire");
        assert_eq!(normalize_faction_name("Space Marines!"), "spacemarines");
        assert_eq!(normalize_faction_name("Astra Militarum."), "astramilitarum");
        assert_eq!(normalize_faction_name(""), "");
    }

    #[test]
    fn faction_name_drops_all_apostrophe_forms() {
        assert_eq!(normalize_faction_name("O'Shovah"), "oshovah");
        assert_eq!(normalize_faction_name("O`Shovah"), "oshovah");
        assert_eq!(normalize_faction_name("T\u{2019}au Empire"), "tauempire");
    }
}
