//! Defines the parsed representation of selector expressions.
use crate::error::SelectorError;
use crate::parser::parse_segments;
use std::fmt;
use std::str::FromStr;

/// A single step in a selector path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// An object key (e.g. `.name`).
    Key(String),
    /// An array index (e.g. `[0]`).
    Index(usize),
    /// Every element of an array (`[*]`).
    Wildcard,
}

/// A parsed path expression addressing one or more nodes in a document.
///
/// Parsing fails fast; a `Selector` in hand is always well-formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    text: String,
    segments: Vec<PathSegment>,
}

impl Selector {
    /// Parses a selector expression such as `a.b[*].c`.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let segments = parse_segments(input)?;
        Ok(Self {
            text: input.trim().to_string(),
            segments,
        })
    }

    /// The original expression text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Whether this selector can address a (possibly empty) collection of
    /// nodes rather than a single scalar location: it contains a wildcard, or
    /// an indexed segment followed by further path.
    pub fn is_collection(&self) -> bool {
        self.segments.iter().enumerate().any(|(i, segment)| match segment {
            PathSegment::Wildcard => true,
            PathSegment::Index(_) => i + 1 < self.segments.len(),
            PathSegment::Key(_) => false,
        })
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_selectors_are_not_collection_shaped() {
        assert!(!Selector::parse("a").unwrap().is_collection());
        assert!(!Selector::parse("a.b.c").unwrap().is_collection());
        // A trailing index addresses exactly one location.
        assert!(!Selector::parse("a.b[0]").unwrap().is_collection());
    }

    #[test]
    fn wildcard_makes_a_selector_collection_shaped() {
        assert!(Selector::parse("a[*]").unwrap().is_collection());
        assert!(Selector::parse("a.b[*].c").unwrap().is_collection());
    }

    #[test]
    fn index_followed_by_path_is_collection_shaped() {
        assert!(Selector::parse("a[0].b").unwrap().is_collection());
    }
}
