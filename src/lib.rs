//! Verdict: declarative constraint validation for JSON documents.
//!
//! Rules target fields addressed by path selectors; each rule attaches a
//! composable boolean constraint evaluated against the selected value(s).
//! Outcomes are collected into a structured pass/fail tree rather than a
//! single boolean, so callers can report which constraint failed, where,
//! and why — including predicate errors raised during evaluation.
//!
//! ```
//! use serde_json::json;
//! use verdict::predicates::{defined, min_length};
//! use verdict::{Document, FieldRule, NullContext, Validator};
//!
//! let mut validator = Validator::new();
//! validator.add_rule(FieldRule::new("user.name", defined() & min_length(1)).unwrap());
//!
//! let document = Document::new(json!({ "user": { "name": "ada" } }));
//! let result = validator.validate(&NullContext, &document);
//! assert!(result.is_valid());
//! ```

// --- Public API ---
pub use verdict_document::{Document, Node, PathSegment, Selector, SelectorError};
pub use verdict_engine::predicates;
pub use verdict_engine::{
    AlwaysValidRule, Combinator, Constraint, ConstraintError, FieldRule, FuncRule, LazyConstraint,
    NullContext, Predicate, Rule, RuleError, RuleInfo, ValidationContext, ValidationResult,
};

/// An ordered set of rules tested as one unit against a document.
///
/// Rules are immutable once added; validation combines every rule's result
/// with ALL semantics into a single composite. An empty validator is
/// vacuously valid.
#[derive(Debug, Default)]
pub struct Validator {
    rules: Vec<Box<dyn Rule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn add_rule(&mut self, rule: impl Rule + 'static) {
        self.rules.push(Box::new(rule));
    }

    /// Builder-style variant of [`add_rule`](Validator::add_rule).
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.add_rule(rule);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Tests every rule against the document and aggregates the outcomes.
    pub fn validate<'a>(
        &self,
        context: &dyn ValidationContext,
        document: &'a Document,
    ) -> ValidationResult<'a> {
        log::debug!("validating document against {} rule(s)", self.rules.len());
        ValidationResult::Composite {
            combinator: Combinator::All,
            children: self
                .rules
                .iter()
                .map(|rule| rule.test(context, document))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_validator_is_vacuously_valid() {
        let validator = Validator::new();
        let document = Document::new(json!({}));
        assert!(validator.validate(&NullContext, &document).is_valid());
    }

    #[test]
    fn one_failing_rule_fails_the_whole_validation() {
        let validator = Validator::new()
            .with_rule(FieldRule::new("a", predicates::defined()).unwrap())
            .with_rule(FieldRule::new("b", predicates::defined()).unwrap());
        let document = Document::new(json!({ "a": 1 }));
        let result = validator.validate(&NullContext, &document);
        assert!(!result.is_valid());
    }
}
