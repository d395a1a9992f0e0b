//! Built-in predicate vocabulary and their constraint constructors.
//!
//! Predicates that only make sense for one value kind (`min_length`,
//! `in_range`, `matches_pattern`) report a type mismatch as a predicate
//! failure, which the algebra converts into an exceptional result. Absence
//! is never an error here: absent nodes simply do not match.
use crate::constraint::{Constraint, LazyConstraint, Predicate};
use crate::context::ValidationContext;
use crate::error::ConstraintError;
use regex_lite::Regex;
use serde_json::Value;
use verdict_document::{Node, Selector, SelectorError};

/// The kind of a JSON value, for type predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    pub fn of(value: &Value) -> JsonKind {
        match value {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Bool,
            Value::Number(_) => JsonKind::Number,
            Value::String(_) => JsonKind::String,
            Value::Array(_) => JsonKind::Array,
            Value::Object(_) => JsonKind::Object,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            JsonKind::Null => "null",
            JsonKind::Bool => "bool",
            JsonKind::Number => "number",
            JsonKind::String => "string",
            JsonKind::Array => "array",
            JsonKind::Object => "object",
        }
    }
}

fn found(node: &Node<'_>) -> String {
    JsonKind::of(node.value()).name().to_string()
}

// --- Predicate Implementations ---

#[derive(Debug)]
struct Defined;

impl Predicate for Defined {
    fn test(
        &self,
        node: Option<&Node<'_>>,
        _context: &dyn ValidationContext,
    ) -> Result<bool, ConstraintError> {
        Ok(node.is_some())
    }

    fn describe(&self) -> String {
        "be defined".to_string()
    }
}

#[derive(Debug)]
struct Equals {
    expected: Value,
}

impl Predicate for Equals {
    fn test(
        &self,
        node: Option<&Node<'_>>,
        _context: &dyn ValidationContext,
    ) -> Result<bool, ConstraintError> {
        Ok(node.is_some_and(|n| *n.value() == self.expected))
    }

    fn describe(&self) -> String {
        format!("equal {}", self.expected)
    }
}

#[derive(Debug)]
struct OfType {
    kind: JsonKind,
}

impl Predicate for OfType {
    fn test(
        &self,
        node: Option<&Node<'_>>,
        _context: &dyn ValidationContext,
    ) -> Result<bool, ConstraintError> {
        Ok(node.is_some_and(|n| JsonKind::of(n.value()) == self.kind))
    }

    fn describe(&self) -> String {
        format!("be of type {}", self.kind.name())
    }
}

#[derive(Debug)]
struct MinLength {
    limit: usize,
}

impl Predicate for MinLength {
    fn test(
        &self,
        node: Option<&Node<'_>>,
        _context: &dyn ValidationContext,
    ) -> Result<bool, ConstraintError> {
        match node {
            None => Ok(false),
            Some(n) => match n.value().as_str() {
                Some(s) => Ok(s.chars().count() >= self.limit),
                None => Err(ConstraintError::TypeMismatch {
                    expected: "string",
                    found: found(n),
                }),
            },
        }
    }

    fn describe(&self) -> String {
        format!("be at least {} characters", self.limit)
    }
}

#[derive(Debug)]
struct MaxLength {
    limit: usize,
}

impl Predicate for MaxLength {
    fn test(
        &self,
        node: Option<&Node<'_>>,
        _context: &dyn ValidationContext,
    ) -> Result<bool, ConstraintError> {
        match node {
            None => Ok(false),
            Some(n) => match n.value().as_str() {
                Some(s) => Ok(s.chars().count() <= self.limit),
                None => Err(ConstraintError::TypeMismatch {
                    expected: "string",
                    found: found(n),
                }),
            },
        }
    }

    fn describe(&self) -> String {
        format!("be at most {} characters", self.limit)
    }
}

#[derive(Debug)]
struct InRange {
    min: f64,
    max: f64,
}

impl Predicate for InRange {
    fn test(
        &self,
        node: Option<&Node<'_>>,
        _context: &dyn ValidationContext,
    ) -> Result<bool, ConstraintError> {
        match node {
            None => Ok(false),
            Some(n) => match n.value().as_f64() {
                Some(v) => Ok(v >= self.min && v <= self.max),
                None => Err(ConstraintError::TypeMismatch {
                    expected: "number",
                    found: found(n),
                }),
            },
        }
    }

    fn describe(&self) -> String {
        format!("be between {} and {}", self.min, self.max)
    }
}

#[derive(Debug)]
struct MatchesPattern {
    regex: Regex,
}

impl Predicate for MatchesPattern {
    fn test(
        &self,
        node: Option<&Node<'_>>,
        _context: &dyn ValidationContext,
    ) -> Result<bool, ConstraintError> {
        match node {
            None => Ok(false),
            Some(n) => match n.value().as_str() {
                Some(s) => Ok(self.regex.is_match(s)),
                None => Err(ConstraintError::TypeMismatch {
                    expected: "string",
                    found: found(n),
                }),
            },
        }
    }

    fn describe(&self) -> String {
        format!("match /{}/", self.regex.as_str())
    }
}

// --- Constructors ---

/// The selected node must exist.
pub fn defined() -> Constraint {
    Constraint::leaf(Defined)
}

/// The selected value must equal the given value. Absent nodes do not match.
pub fn equals(expected: impl Into<Value>) -> Constraint {
    Constraint::leaf(Equals {
        expected: expected.into(),
    })
}

/// The selected value must be of the given JSON kind.
pub fn of_type(kind: JsonKind) -> Constraint {
    Constraint::leaf(OfType { kind })
}

/// The selected string must have at least `limit` characters.
pub fn min_length(limit: usize) -> Constraint {
    Constraint::leaf(MinLength { limit })
}

/// The selected string must have at most `limit` characters.
pub fn max_length(limit: usize) -> Constraint {
    Constraint::leaf(MaxLength { limit })
}

/// The selected number must lie in the inclusive range.
pub fn in_range(min: f64, max: f64) -> Constraint {
    Constraint::leaf(InRange { min, max })
}

/// The selected string must match the regex. Fails fast on a bad pattern.
pub fn matches_pattern(pattern: &str) -> Result<Constraint, ConstraintError> {
    let regex = Regex::new(pattern).map_err(|e| ConstraintError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    Ok(Constraint::leaf(MatchesPattern { regex }))
}

/// The selected value must equal whatever the given selector resolves to in
/// the same document at evaluation time. When the dependency is absent, the
/// value must be absent too.
pub fn equals_field(selector: &str) -> Result<Constraint, SelectorError> {
    let selector = Selector::parse(selector)?;
    Ok(Constraint::Lazy(LazyConstraint::new(
        selector,
        |dependency: Option<&Node<'_>>| match dependency {
            Some(node) => equals(node.value().clone()),
            None => !defined(),
        },
    )))
}
