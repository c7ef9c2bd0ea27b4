//! Named-tag substitution.
//!
//! Two placeholder spellings are recognized for every key, both
//! case-insensitive and whitespace tolerant inside the marker:
//!
//! - legacy comment marker: `<!-- [BLOGGY::title] -->`
//! - brace marker: `{{! title }}`
//!
//! Substitution is best-effort: placeholders with no mapped key stay
//! verbatim in the output.

use regex::{NoExpand, Regex};
use std::collections::BTreeMap;

/// Case-insensitive placeholder name → replacement text mapping for one
/// pipeline run. Never mutated once built.
#[derive(Debug, Default, Clone)]
pub struct TagMap {
    entries: BTreeMap<String, String>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value; keys are folded to lowercase so `TITLE` and `title`
    /// are one entry.
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .insert(key.as_ref().to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in deterministic (sorted key) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Replace every occurrence of every mapped key, in both spellings.
///
/// Keys are regex-escaped so they match as literal text; replacement values
/// are inserted verbatim (`NoExpand`), so `$` in a value is not a capture
/// reference.
pub fn substitute(text: &str, values: &TagMap) -> String {
    let mut result = text.to_string();

    for (key, value) in values.iter() {
        let escaped = regex::escape(key);

        let legacy = Regex::new(&format!(r"(?i)<!--\s*\[BLOGGY::{escaped}\]\s*-->"))
            .expect("legacy tag pattern");
        result = legacy.replace_all(&result, NoExpand(value)).into_owned();

        let braced = Regex::new(&format!(r"(?i)\{{\{{!\s*{escaped}\s*\}}\}}"))
            .expect("braced tag pattern");
        result = braced.replace_all(&result, NoExpand(value)).into_owned();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> TagMap {
        let mut m = TagMap::new();
        for (k, v) in pairs {
            m.insert(*k, *v);
        }
        m
    }

    #[test]
    fn test_idempotent_without_placeholders() {
        let text = "<p>nothing to replace here</p>";
        let out = substitute(text, &map(&[("title", "Hi")]));
        assert_eq!(out, text);
    }

    #[test]
    fn test_both_spellings_same_value() {
        let text = "<h1>{{! title }}</h1><title><!-- [BLOGGY::title] --></title>";
        let out = substitute(text, &map(&[("title", "My Post")]));
        assert_eq!(out, "<h1>My Post</h1><title>My Post</title>");
    }

    #[test]
    fn test_case_insensitive_marker_and_key() {
        let text = "<!-- [bloggy::TITLE] --> and {{!TiTlE}}";
        let out = substitute(text, &map(&[("Title", "x")]));
        assert_eq!(out, "x and x");
    }

    #[test]
    fn test_whitespace_tolerant() {
        let text = "<!--   [BLOGGY::title]   --> {{!   title   }}";
        let out = substitute(text, &map(&[("title", "x")]));
        assert_eq!(out, "x x");
    }

    #[test]
    fn test_unmatched_placeholder_left_verbatim() {
        let text = "{{! unmapped }} stays";
        let out = substitute(text, &map(&[("title", "x")]));
        assert_eq!(out, text);
    }

    #[test]
    fn test_value_with_dollar_signs_is_literal() {
        let out = substitute("{{! price }}", &map(&[("price", "$1 and ${two}")]));
        assert_eq!(out, "$1 and ${two}");
    }

    #[test]
    fn test_key_with_regex_metacharacters() {
        let out = substitute(
            "<!-- [BLOGGY::accent-color] --> {{! c++ }}",
            &map(&[("accent-color", "#fff"), ("c++", "lang")]),
        );
        assert_eq!(out, "#fff lang");
    }

    #[test]
    fn test_tagmap_case_folding() {
        let m = map(&[("TITLE", "a")]);
        assert_eq!(m.get("title"), Some("a"));
        assert_eq!(m.get("TiTLE"), Some("a"));
    }
}
