//! Dotted field paths.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::FieldAccessError;

fn segment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("segment regex is valid"))
}

/// An ordered sequence of field names, written `a.b.c`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses and validates a dotted path.
    ///
    /// # Errors
    /// `InvalidPath` for an empty path, an empty segment (`a..b`), or a
    /// segment that is not an identifier.
    pub fn parse(path: &str) -> Result<Self, FieldAccessError> {
        let invalid = |reason: &str| FieldAccessError::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        if path.is_empty() {
            return Err(invalid("path is empty"));
        }

        let mut segments = Vec::new();
        for segment in path.split('.') {
            if segment.is_empty() {
                return Err(invalid("empty segment"));
            }
            if !segment_regex().is_match(segment) {
                return Err(invalid(&format!("'{segment}' is not a field name")));
            }
            segments.push(segment.to_string());
        }

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The path made of the first `len` segments.
    #[must_use]
    pub fn prefix(&self, len: usize) -> String {
        self.segments[..len.min(self.segments.len())].join(".")
    }
}

impl FromStr for FieldPath {
    type Err = FieldAccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested() {
        let p = FieldPath::parse("query.query").unwrap();
        assert_eq!(p.segments(), ["query", "query"]);
        assert_eq!(p.as_str(), "query.query");
        assert_eq!(p.prefix(1), "query");
    }

    #[test]
    fn test_parse_single() {
        let p: FieldPath = "value".parse().unwrap();
        assert_eq!(p.segments().len(), 1);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "a..b", ".a", "a.", "1abc", "a.b-c", "a b"] {
            let err = FieldPath::parse(bad).unwrap_err();
            assert!(
                matches!(err, FieldAccessError::InvalidPath { .. }),
                "expected InvalidPath for {bad:?}"
            );
        }
    }
}
