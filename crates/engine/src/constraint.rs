//! The composable boolean constraint algebra.
//!
//! A [`Constraint`] is a closed variant tree: domain predicates at the
//! leaves, AND/OR/NOT combinators above them, and [`LazyConstraint`] for
//! cross-field dependencies resolved at evaluation time. Constraints are
//! immutable after construction, cheap to clone (children are shared behind
//! `Arc`) and safe to evaluate concurrently against many documents.
use crate::context::ValidationContext;
use crate::error::ConstraintError;
use crate::result::{Combinator, ValidationResult};
use std::fmt;
use std::ops;
use std::sync::Arc;
use verdict_document::{Node, Selector};

/// A domain-specific boolean predicate over a single node.
///
/// `node` is `None` when the owning rule's selector matched nothing;
/// predicates must treat absence as a defined input rather than an error.
/// Returning `Err` reports a failure of the predicate itself (e.g. a numeric
/// check applied to a string node); the algebra converts it into an
/// exceptional result at the evaluation boundary.
pub trait Predicate: fmt::Debug + Send + Sync {
    fn test(
        &self,
        node: Option<&Node<'_>>,
        context: &dyn ValidationContext,
    ) -> Result<bool, ConstraintError>;

    /// Short human-readable description, used when rendering a failure trail.
    fn describe(&self) -> String;
}

/// Builds a concrete constraint from a resolved dependency node (or absence).
pub type NodeFactory = dyn for<'a, 'b> Fn(Option<&'b Node<'a>>) -> Constraint + Send + Sync;

/// A composable boolean constraint over a document node.
///
/// AND and OR are n-ary internally; the `&`, `|` and `!` operators provide
/// the binary construction surface, and [`optimize`](Constraint::optimize)
/// splices nested composites flat before repeated evaluation.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// A domain predicate.
    Leaf(Arc<dyn Predicate>),
    /// Matches iff every child matches.
    And(Vec<Arc<Constraint>>),
    /// Matches iff any child matches.
    Or(Vec<Arc<Constraint>>),
    /// Matches iff the inner constraint does not.
    Not(Arc<Constraint>),
    /// Built at evaluation time from another location in the same document.
    Lazy(LazyConstraint),
}

impl Constraint {
    pub fn leaf(predicate: impl Predicate + 'static) -> Self {
        Constraint::Leaf(Arc::new(predicate))
    }

    /// Tests the node and returns the bare verdict.
    ///
    /// Composites may short-circuit here. Predicate failures propagate raw to
    /// direct callers; use [`evaluate`](Constraint::evaluate) for the total,
    /// result-producing form.
    pub fn matches(
        &self,
        node: Option<&Node<'_>>,
        context: &dyn ValidationContext,
    ) -> Result<bool, ConstraintError> {
        match self {
            Constraint::Leaf(predicate) => predicate.test(node, context),
            Constraint::And(children) => {
                for child in children {
                    if !child.matches(node, context)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Constraint::Or(children) => {
                for child in children {
                    if child.matches(node, context)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Constraint::Not(inner) => Ok(!inner.matches(node, context)?),
            Constraint::Lazy(lazy) => Ok(lazy.evaluate(node, context).is_valid()),
        }
    }

    /// Evaluates the node into a result tree.
    ///
    /// Total: never returns an error and never panics on predicate failure.
    /// Composites evaluate every child (no short-circuit) so the result shows
    /// all outcomes for diagnostics.
    pub fn evaluate<'a>(
        &self,
        node: Option<&Node<'a>>,
        context: &dyn ValidationContext,
    ) -> ValidationResult<'a> {
        match self {
            Constraint::And(children) => ValidationResult::Composite {
                combinator: Combinator::All,
                children: children
                    .iter()
                    .map(|child| child.evaluate(node, context))
                    .collect(),
            },
            Constraint::Or(children) => ValidationResult::Composite {
                combinator: Combinator::Any,
                children: children
                    .iter()
                    .map(|child| child.evaluate(node, context))
                    .collect(),
            },
            Constraint::Lazy(lazy) => lazy.evaluate(node, context),
            // The sole error-to-result conversion point: every predicate
            // failure in the tree surfaces here as an exceptional result.
            Constraint::Leaf(_) | Constraint::Not(_) => match self.matches(node, context) {
                Ok(matched) => ValidationResult::Leaf {
                    constraint: self.clone(),
                    node: node.cloned(),
                    matched,
                },
                Err(error) => ValidationResult::Exception {
                    constraint: self.clone(),
                    node: node.cloned(),
                    error,
                },
            },
        }
    }

    /// Returns a semantically equivalent, flatter constraint tree.
    ///
    /// Children are optimized first; nested composites of the same kind are
    /// spliced into their parent and single-child composites collapse to the
    /// child. Idempotent: re-optimizing an optimized tree changes nothing.
    pub fn optimize(&self) -> Constraint {
        match self {
            Constraint::Leaf(_) | Constraint::Lazy(_) => self.clone(),
            Constraint::Not(inner) => Constraint::Not(Arc::new(inner.optimize())),
            Constraint::And(children) => {
                let mut flat: Vec<Arc<Constraint>> = Vec::with_capacity(children.len());
                for child in children {
                    match child.optimize() {
                        Constraint::And(nested) => flat.extend(nested),
                        other => flat.push(Arc::new(other)),
                    }
                }
                collapse(flat, Constraint::And)
            }
            Constraint::Or(children) => {
                let mut flat: Vec<Arc<Constraint>> = Vec::with_capacity(children.len());
                for child in children {
                    match child.optimize() {
                        Constraint::Or(nested) => flat.extend(nested),
                        other => flat.push(Arc::new(other)),
                    }
                }
                collapse(flat, Constraint::Or)
            }
        }
    }
}

fn collapse(
    mut children: Vec<Arc<Constraint>>,
    composite: fn(Vec<Arc<Constraint>>) -> Constraint,
) -> Constraint {
    if children.len() == 1 {
        Arc::unwrap_or_clone(children.remove(0))
    } else {
        composite(children)
    }
}

// --- Operator Overloads ---

impl ops::BitAnd for Constraint {
    type Output = Constraint;

    fn bitand(self, rhs: Constraint) -> Constraint {
        Constraint::And(vec![Arc::new(self), Arc::new(rhs)])
    }
}

impl ops::BitOr for Constraint {
    type Output = Constraint;

    fn bitor(self, rhs: Constraint) -> Constraint {
        Constraint::Or(vec![Arc::new(self), Arc::new(rhs)])
    }
}

impl ops::Not for Constraint {
    type Output = Constraint;

    fn not(self) -> Constraint {
        Constraint::Not(Arc::new(self))
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Leaf(predicate) => f.write_str(&predicate.describe()),
            Constraint::And(children) => write_joined(f, children, " and "),
            Constraint::Or(children) => write_joined(f, children, " or "),
            Constraint::Not(inner) => write!(f, "not {inner}"),
            Constraint::Lazy(lazy) => write!(f, "{lazy}"),
        }
    }
}

fn write_joined(
    f: &mut fmt::Formatter<'_>,
    children: &[Arc<Constraint>],
    separator: &str,
) -> fmt::Result {
    f.write_str("(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{child}")?;
    }
    f.write_str(")")
}

/// A constraint whose concrete form depends on another location in the same
/// document, resolved against the document root at evaluation time.
///
/// Supports rules like "field X must equal field Y": the selector locates Y,
/// the factory builds the concrete constraint from Y's current value (or
/// absence), and the original node is evaluated against that constraint.
/// Nothing is memoized across calls; the same instance may be reused against
/// unrelated documents.
#[derive(Clone)]
pub struct LazyConstraint {
    selector: Arc<Selector>,
    factory: Arc<NodeFactory>,
}

impl LazyConstraint {
    pub fn new<F>(selector: Selector, factory: F) -> Self
    where
        F: for<'a, 'b> Fn(Option<&'b Node<'a>>) -> Constraint + Send + Sync + 'static,
    {
        Self {
            selector: Arc::new(selector),
            factory: Arc::new(factory),
        }
    }

    /// The selector locating the dependency within the document.
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Resolves the dependency, builds the concrete constraint and delegates
    /// evaluation of the tested node to it. Failures funnel through the same
    /// exceptional-result conversion as leaf predicates.
    pub fn evaluate<'a>(
        &self,
        node: Option<&Node<'a>>,
        context: &dyn ValidationContext,
    ) -> ValidationResult<'a> {
        match self.delegate(node, context) {
            Ok(result) => result,
            Err(error) => ValidationResult::Exception {
                constraint: Constraint::Lazy(self.clone()),
                node: node.cloned(),
                error,
            },
        }
    }

    fn delegate<'a>(
        &self,
        node: Option<&Node<'a>>,
        context: &dyn ValidationContext,
    ) -> Result<ValidationResult<'a>, ConstraintError> {
        let node = node.ok_or_else(|| ConstraintError::AbsentRoot {
            selector: self.selector.as_str().to_string(),
        })?;
        // Root is re-derived from the tested node on every call; a cached
        // root would break reuse across documents and sub-tree validation.
        let root = node.root();
        let matches = root.select_many(&self.selector);
        if matches.len() > 1 {
            log::warn!(
                "dependency selector '{}' matched {} nodes; using the first",
                self.selector,
                matches.len()
            );
        }
        let resolved = matches.into_iter().next();
        // Factories may build unoptimized trees.
        let constraint = (self.factory)(resolved.as_ref()).optimize();
        let inner = constraint.evaluate(Some(node), context);
        Ok(ValidationResult::Delegated {
            constraint: self.clone(),
            resolved,
            inner: Box::new(inner),
        })
    }
}

impl fmt::Debug for LazyConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyConstraint")
            .field("selector", &self.selector)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for LazyConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "constraint built from '{}'", self.selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::NullContext;
    use crate::predicates::{defined, equals, in_range};
    use serde_json::json;
    use verdict_document::Document;

    fn constant(value: bool) -> Constraint {
        #[derive(Debug)]
        struct Constant(bool);
        impl Predicate for Constant {
            fn test(
                &self,
                _node: Option<&Node<'_>>,
                _context: &dyn ValidationContext,
            ) -> Result<bool, ConstraintError> {
                Ok(self.0)
            }
            fn describe(&self) -> String {
                self.0.to_string()
            }
        }
        Constraint::leaf(Constant(value))
    }

    fn failing() -> Constraint {
        #[derive(Debug)]
        struct Failing;
        impl Predicate for Failing {
            fn test(
                &self,
                _node: Option<&Node<'_>>,
                _context: &dyn ValidationContext,
            ) -> Result<bool, ConstraintError> {
                Err(ConstraintError::Other("boom".to_string()))
            }
            fn describe(&self) -> String {
                "always fail".to_string()
            }
        }
        Constraint::leaf(Failing)
    }

    #[test]
    fn boolean_algebra_on_matches() {
        let ctx = NullContext;
        for (x, y) in [(false, false), (false, true), (true, false), (true, true)] {
            let and = constant(x) & constant(y);
            let or = constant(x) | constant(y);
            assert_eq!(and.matches(None, &ctx).unwrap(), x && y);
            assert_eq!(or.matches(None, &ctx).unwrap(), x || y);
        }
        assert!(!(!constant(true)).matches(None, &NullContext).unwrap());
        assert!((!constant(false)).matches(None, &NullContext).unwrap());
    }

    #[test]
    fn evaluate_agrees_with_matches() {
        let ctx = NullContext;
        let constraint = (constant(true) | constant(false)) & !constant(false);
        assert_eq!(
            constraint.evaluate(None, &ctx).is_valid(),
            constraint.matches(None, &ctx).unwrap()
        );
    }

    #[test]
    fn predicate_failure_becomes_an_exceptional_result() {
        let result = failing().evaluate(None, &NullContext);
        assert!(!result.is_valid());
        match result {
            ValidationResult::Exception { error, .. } => {
                assert_eq!(error, ConstraintError::Other("boom".to_string()));
            }
            other => panic!("expected an exceptional result, got {other:?}"),
        }
    }

    #[test]
    fn composite_evaluation_reports_both_sides() {
        let result = (constant(false) & constant(true)).evaluate(None, &NullContext);
        assert!(!result.is_valid());
        match result {
            ValidationResult::Composite {
                combinator: Combinator::All,
                children,
            } => {
                assert_eq!(children.len(), 2);
                assert!(!children[0].is_valid());
                assert!(children[1].is_valid());
            }
            other => panic!("expected a composite result, got {other:?}"),
        }
    }

    #[test]
    fn optimize_flattens_nested_composites() {
        let constraint = (constant(true) & constant(true)) & constant(true);
        match constraint.optimize() {
            Constraint::And(children) => assert_eq!(children.len(), 3),
            other => panic!("expected a flattened AND, got {other:?}"),
        }
    }

    #[test]
    fn optimize_is_idempotent() {
        let constraint =
            ((constant(true) & constant(false)) & (constant(true) | constant(false)))
                | !constant(true);
        let once = constraint.optimize();
        let twice = once.optimize();
        assert_eq!(format!("{once:?}"), format!("{twice:?}"));
    }

    #[test]
    fn optimize_preserves_semantics() {
        let ctx = NullContext;
        let constraint = (constant(true) & (constant(false) | constant(true))) & constant(true);
        assert_eq!(
            constraint.optimize().matches(None, &ctx).unwrap(),
            constraint.matches(None, &ctx).unwrap()
        );
    }

    fn must_equal_b() -> LazyConstraint {
        LazyConstraint::new(
            Selector::parse("b").unwrap(),
            |dependency: Option<&Node<'_>>| match dependency {
                Some(node) => equals(node.value().clone()),
                None => !defined(),
            },
        )
    }

    #[test]
    fn lazy_constraint_matches_when_fields_agree() {
        let document = Document::new(json!({ "a": 5, "b": 5 }));
        let a = document.select_one(&Selector::parse("a").unwrap()).unwrap();
        let result = must_equal_b().evaluate(Some(&a), &NullContext);
        assert!(result.is_valid());
    }

    #[test]
    fn lazy_constraint_records_the_resolved_dependency() {
        let document = Document::new(json!({ "a": 5, "b": 6 }));
        let a = document.select_one(&Selector::parse("a").unwrap()).unwrap();
        let result = must_equal_b().evaluate(Some(&a), &NullContext);
        assert!(!result.is_valid());
        match result {
            ValidationResult::Delegated { resolved, inner, .. } => {
                let resolved = resolved.unwrap();
                assert_eq!(resolved.value(), &json!(6));
                assert_eq!(resolved.location(), "$.b");
                assert!(!inner.is_valid());
            }
            other => panic!("expected a delegated result, got {other:?}"),
        }
    }

    #[test]
    fn lazy_constraint_rederives_root_per_evaluation() {
        let lazy = must_equal_b();
        let first = Document::new(json!({ "a": 1, "b": 1 }));
        let second = Document::new(json!({ "a": 1, "b": 2 }));
        let selector = Selector::parse("a").unwrap();

        let a1 = first.select_one(&selector).unwrap();
        let a2 = second.select_one(&selector).unwrap();
        assert!(lazy.evaluate(Some(&a1), &NullContext).is_valid());
        assert!(!lazy.evaluate(Some(&a2), &NullContext).is_valid());
    }

    #[test]
    fn lazy_constraint_over_an_absent_node_is_exceptional_not_a_panic() {
        let result = must_equal_b().evaluate(None, &NullContext);
        assert!(!result.is_valid());
        assert!(matches!(result, ValidationResult::Exception { .. }));
    }

    #[test]
    fn lazy_matches_never_raises() {
        let matched = Constraint::Lazy(must_equal_b())
            .matches(None, &NullContext)
            .unwrap();
        assert!(!matched);
    }

    #[test]
    fn type_mismatch_surfaces_as_exception_with_the_original_error() {
        let document = Document::new(json!({ "age": "not a number" }));
        let age = document
            .select_one(&Selector::parse("age").unwrap())
            .unwrap();
        let result = in_range(0.0, 150.0).evaluate(Some(&age), &NullContext);
        match result {
            ValidationResult::Exception { error, .. } => {
                assert!(matches!(error, ConstraintError::TypeMismatch { .. }));
            }
            other => panic!("expected an exceptional result, got {other:?}"),
        }
    }

    #[test]
    fn display_renders_the_algebra_infix() {
        let constraint = (constant(true) & constant(false)) | !constant(true);
        assert_eq!(constraint.to_string(), "((true and false) or not true)");
    }
}
