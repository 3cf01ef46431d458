//! Row filtering for the record table.
//!
//! Five matching modes over one, several or all projected columns.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::Row;
use crate::table::cell_text;

/// How the pattern is matched against cell text.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SearchMode {
    /// Case-insensitive substring
    #[default]
    Contains,
    /// Case-sensitive full equality
    Exact,
    /// Case-insensitive prefix
    StartsWith,
    /// Case-insensitive suffix
    EndsWith,
    /// Regular expression matched anywhere; invalid patterns fall back to `Contains`
    Regex,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Contains => "Contains",
            SearchMode::Exact => "Exact",
            SearchMode::StartsWith => "Starts With",
            SearchMode::EndsWith => "Ends With",
            SearchMode::Regex => "Regex",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Contains" => Some(SearchMode::Contains),
            "Exact" => Some(SearchMode::Exact),
            "Starts With" | "StartsWith" => Some(SearchMode::StartsWith),
            "Ends With" | "EndsWith" => Some(SearchMode::EndsWith),
            "Regex" => Some(SearchMode::Regex),
            _ => None,
        }
    }
}

/// A search as entered in the toolbar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub pattern: String,
    #[serde(default)]
    pub mode: SearchMode,
    /// Columns to test; empty means every header.
    #[serde(default)]
    pub columns: Vec<String>,
}

impl SearchQuery {
    pub fn new(pattern: impl Into<String>, mode: SearchMode) -> Self {
        Self {
            pattern: pattern.into(),
            mode,
            columns: Vec::new(),
        }
    }

    pub fn in_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    /// Prepares the query for matching many rows.
    pub fn compile(&self) -> SearchFilter<'_> {
        let matcher = match self.mode {
            SearchMode::Contains => Matcher::Contains(self.pattern.to_lowercase()),
            SearchMode::Exact => Matcher::Exact(&self.pattern),
            SearchMode::StartsWith => Matcher::StartsWith(self.pattern.to_lowercase()),
            SearchMode::EndsWith => Matcher::EndsWith(self.pattern.to_lowercase()),
            SearchMode::Regex => match Regex::new(&self.pattern) {
                Ok(re) => Matcher::Regex(re),
                Err(e) => {
                    tracing::debug!("Invalid search regex {:?}, using contains: {}", self.pattern, e);
                    Matcher::Contains(self.pattern.to_lowercase())
                }
            },
        };
        SearchFilter {
            query: self,
            matcher,
        }
    }
}

enum Matcher<'a> {
    Contains(String),
    Exact(&'a str),
    StartsWith(String),
    EndsWith(String),
    Regex(Regex),
}

impl Matcher<'_> {
    fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::Contains(needle) => text.to_lowercase().contains(needle.as_str()),
            Matcher::Exact(expected) => text == *expected,
            Matcher::StartsWith(prefix) => text.to_lowercase().starts_with(prefix.as_str()),
            Matcher::EndsWith(suffix) => text.to_lowercase().ends_with(suffix.as_str()),
            Matcher::Regex(re) => re.is_match(text),
        }
    }
}

/// A compiled [`SearchQuery`].
pub struct SearchFilter<'q> {
    query: &'q SearchQuery,
    matcher: Matcher<'q>,
}

impl SearchFilter<'_> {
    /// True if any tested column of `row` matches.
    pub fn accepts(&self, row: &Row, headers: &[String]) -> bool {
        if self.query.pattern.is_empty() {
            return true;
        }

        let columns = if self.query.columns.is_empty() {
            headers
        } else {
            self.query.columns.as_slice()
        };

        columns
            .iter()
            .filter(|column| row.contains_key(column.as_str()))
            .any(|column| self.matcher.is_match(&cell_text(row, column)))
    }
}

/// One-shot form of [`SearchFilter::accepts`].
pub fn accepts(row: &Row, headers: &[String], query: &SearchQuery) -> bool {
    query.compile().accepts(row, headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    fn headers(row: &Row) -> Vec<String> {
        row.keys().cloned().collect()
    }

    #[test]
    fn test_starts_with_example() {
        let r = row(json!({"name": "Resistor"}));
        let h = headers(&r);
        assert!(accepts(&r, &h, &SearchQuery::new("Res", SearchMode::StartsWith)));
        assert!(accepts(&r, &h, &SearchQuery::new("res", SearchMode::StartsWith)));
        assert!(!accepts(&r, &h, &SearchQuery::new("sis", SearchMode::StartsWith)));
    }

    #[test]
    fn test_empty_pattern_accepts_everything() {
        let r = row(json!({"name": "Resistor"}));
        for mode in [SearchMode::Exact, SearchMode::Regex, SearchMode::Contains] {
            assert!(accepts(&r, &[], &SearchQuery::new("", mode)));
        }
    }

    #[test]
    fn test_contains_and_ends_with_ignore_case() {
        let r = row(json!({"name": "Resistor"}));
        let h = headers(&r);
        assert!(accepts(&r, &h, &SearchQuery::new("SIST", SearchMode::Contains)));
        assert!(accepts(&r, &h, &SearchQuery::new("TOR", SearchMode::EndsWith)));
        assert!(!accepts(&r, &h, &SearchQuery::new("Res", SearchMode::EndsWith)));
    }

    #[test]
    fn test_exact_is_case_sensitive() {
        let r = row(json!({"name": "Resistor"}));
        let h = headers(&r);
        assert!(accepts(&r, &h, &SearchQuery::new("Resistor", SearchMode::Exact)));
        assert!(!accepts(&r, &h, &SearchQuery::new("resistor", SearchMode::Exact)));
        assert!(!accepts(&r, &h, &SearchQuery::new("Resist", SearchMode::Exact)));
    }

    #[test]
    fn test_regex_and_invalid_regex_fallback() {
        let r = row(json!({"name": "R-100 (smd)"}));
        let h = headers(&r);
        assert!(accepts(&r, &h, &SearchQuery::new(r"R-\d+", SearchMode::Regex)));
        assert!(!accepts(&r, &h, &SearchQuery::new(r"^\d", SearchMode::Regex)));
        // Unbalanced paren: treated as a case-insensitive substring.
        assert!(accepts(&r, &h, &SearchQuery::new("(SMD", SearchMode::Regex)));
        assert!(!accepts(&r, &h, &SearchQuery::new("(xyz", SearchMode::Regex)));
    }

    #[test]
    fn test_matches_display_values() {
        let r = row(json!({"pins": [1, 2, 3], "meta": {"a": 1}, "notes": null, "qty": 12}));
        let h = headers(&r);
        assert!(accepts(&r, &h, &SearchQuery::new("[3 items]", SearchMode::Exact)));
        assert!(accepts(&r, &h, &SearchQuery::new("{...}", SearchMode::Exact)));
        assert!(accepts(&r, &h, &SearchQuery::new("null", SearchMode::Exact)));
        assert!(accepts(&r, &h, &SearchQuery::new("12", SearchMode::Exact)));
    }

    #[test]
    fn test_column_restriction() {
        let r = row(json!({"opendb_id": "abc", "name": "Capacitor", "vendor": "ACME"}));
        let h = headers(&r);
        let query = SearchQuery::new("acme", SearchMode::Contains);
        assert!(accepts(&r, &h, &query));
        assert!(!accepts(&r, &h, &query.clone().in_columns(vec!["name".to_string()])));
        assert!(accepts(
            &r,
            &h,
            &query.in_columns(vec!["name".to_string(), "vendor".to_string()])
        ));
    }

    #[test]
    fn test_mode_names_round_trip() {
        for mode in [
            SearchMode::Contains,
            SearchMode::Exact,
            SearchMode::StartsWith,
            SearchMode::EndsWith,
            SearchMode::Regex,
        ] {
            assert_eq!(SearchMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(SearchMode::from_str("fuzzy"), None);
    }
}
