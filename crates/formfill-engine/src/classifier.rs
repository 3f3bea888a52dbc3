//! Stable vs. generated `id` heuristics.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Long hex hashes (`a1b2c3d4e5`) and `prefix-hexhash` ids (`css-1a2b`).
    static ref HASHED_ID: Regex = Regex::new(r"(?i)^[a-f0-9]{8,}$|^[a-z]+-[a-f0-9]{4,}").unwrap();
    static ref LOWERCASE_WORD: Regex = Regex::new(r"^[a-z]{4,}$").unwrap();
    static ref HAS_UPPER: Regex = Regex::new(r"[A-Z]").unwrap();
    static ref HAS_LOWER: Regex = Regex::new(r"[a-z]").unwrap();
}

/// Whether an `id` value looks machine-generated and must not anchor a selector.
///
/// Rules apply in order, first match wins:
/// 1. missing or empty
/// 2. hex hash or `word-hexhash`
/// 3. three characters or fewer
/// 4. contains `-` or `_` (stable)
/// 5. four or more lowercase letters only (stable)
/// 6. shorter than eight characters with mixed case (`APjFqb`)
/// 7. anything else is stable
pub fn is_generated_id(id: Option<&str>) -> bool {
    let Some(id) = id.filter(|s| !s.is_empty()) else {
        return true;
    };

    if HASHED_ID.is_match(id) {
        return true;
    }

    let len = id.encode_utf16().count();
    if len <= 3 {
        return true;
    }

    if id.contains('-') || id.contains('_') {
        return false;
    }

    if LOWERCASE_WORD.is_match(id) {
        return false;
    }

    len < 8 && HAS_UPPER.is_match(id) && HAS_LOWER.is_match(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_ids_are_generated() {
        assert!(is_generated_id(None));
        assert!(is_generated_id(Some("")));
    }

    #[test]
    fn hex_hashes_are_generated() {
        assert!(is_generated_id(Some("a1b2c3d4e5")));
        assert!(is_generated_id(Some("DEADBEEF")));
        assert!(is_generated_id(Some("css-1a2b3c")));
        assert!(is_generated_id(Some("Ember-a1f0")));
    }

    #[test]
    fn hash_pattern_beats_separator_rule() {
        // `word-hexhash` is checked before the hyphen rule.
        assert!(is_generated_id(Some("react-abcd_root")));
    }

    #[test]
    fn short_ids_are_generated() {
        assert!(is_generated_id(Some("q2")));
        assert!(is_generated_id(Some("gb")));
        assert!(is_generated_id(Some("a-b")));
    }

    #[test]
    fn mixed_case_minified_ids_are_generated() {
        assert!(is_generated_id(Some("APjFqb")));
        assert!(is_generated_id(Some("Tg7LZd")));
    }

    #[test]
    fn lengths_count_utf16_units() {
        // Two astral characters are four units, past the short-id rule.
        assert!(!is_generated_id(Some("\u{1F600}\u{1F600}")));
        // Seven chars but nine units, so the minified-id rule does not apply.
        assert!(!is_generated_id(Some("AbcDe\u{1F600}\u{1F600}")));
        assert!(is_generated_id(Some("AbcDe\u{1F600}")));
    }

    #[test]
    fn separators_mark_stable_ids() {
        assert!(!is_generated_id(Some("search-form")));
        assert!(!is_generated_id(Some("nav-bar")));
        assert!(!is_generated_id(Some("login_btn")));
        assert!(!is_generated_id(Some("App-1")));
        assert!(!is_generated_id(Some("aB_cD")));
    }

    #[test]
    fn lowercase_words_are_stable() {
        assert!(!is_generated_id(Some("email")));
        assert!(!is_generated_id(Some("sidebar")));
        assert!(!is_generated_id(Some("search")));
    }

    #[test]
    fn longer_mixed_case_ids_are_stable() {
        assert!(!is_generated_id(Some("loginButton")));
        assert!(!is_generated_id(Some("MAINNAV")));
        assert!(!is_generated_id(Some("main2")));
    }
}
