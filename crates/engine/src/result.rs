//! The structured outcome of evaluating a constraint or rule.
//!
//! Results are immutable once produced and carry enough identity (which
//! constraint or rule, which node) to render a human-readable failure trail
//! without re-running evaluation. They borrow the document being validated
//! and share constraints cheaply via `Arc` clones.
use crate::constraint::{Constraint, LazyConstraint};
use crate::error::ConstraintError;
use crate::rule::RuleInfo;
use std::fmt;
use verdict_document::Node;

/// How a composite combines the validity of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Valid iff every child is valid. Vacuously valid with zero children.
    All,
    /// Valid iff at least one child is valid.
    Any,
}

/// One evaluation outcome: success, failure, or exceptional failure.
#[derive(Debug)]
pub enum ValidationResult<'a> {
    /// One constraint tested one node.
    Leaf {
        constraint: Constraint,
        node: Option<Node<'a>>,
        matched: bool,
    },
    /// The predicate failed while testing the node. Always invalid.
    Exception {
        constraint: Constraint,
        node: Option<Node<'a>>,
        error: ConstraintError,
    },
    /// Ordered child outcomes combined with ALL or ANY semantics.
    Composite {
        combinator: Combinator,
        children: Vec<ValidationResult<'a>>,
    },
    /// A per-node outcome annotated with the rule that produced it.
    Decorated {
        rule: RuleInfo,
        inner: Box<ValidationResult<'a>>,
    },
    /// The outcome of a lazily built constraint, recording the dependency
    /// node it was built from so diagnostics can show "A had to equal B,
    /// whose value was V".
    Delegated {
        constraint: LazyConstraint,
        resolved: Option<Node<'a>>,
        inner: Box<ValidationResult<'a>>,
    },
}

impl ValidationResult<'_> {
    /// The recursive pass/fail verdict of this subtree.
    pub fn is_valid(&self) -> bool {
        match self {
            ValidationResult::Leaf { matched, .. } => *matched,
            ValidationResult::Exception { .. } => false,
            ValidationResult::Composite {
                combinator: Combinator::All,
                children,
            } => children.iter().all(|child| child.is_valid()),
            ValidationResult::Composite {
                combinator: Combinator::Any,
                children,
            } => children.iter().any(|child| child.is_valid()),
            ValidationResult::Decorated { inner, .. }
            | ValidationResult::Delegated { inner, .. } => inner.is_valid(),
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            ValidationResult::Leaf {
                constraint,
                node,
                matched,
            } => {
                let verdict = if *matched { "ok" } else { "failed" };
                writeln!(f, "{pad}{verdict}: {constraint} at {}", location(node))
            }
            ValidationResult::Exception {
                constraint,
                node,
                error,
            } => {
                writeln!(f, "{pad}error: {constraint} at {}: {error}", location(node))
            }
            ValidationResult::Composite {
                combinator,
                children,
            } => {
                let label = match combinator {
                    Combinator::All => "all of:",
                    Combinator::Any => "any of:",
                };
                writeln!(f, "{pad}{label}")?;
                for child in children {
                    child.render(f, depth + 1)?;
                }
                Ok(())
            }
            ValidationResult::Decorated { rule, inner } => {
                writeln!(f, "{pad}rule {rule}:")?;
                inner.render(f, depth + 1)
            }
            ValidationResult::Delegated {
                constraint,
                resolved,
                inner,
            } => {
                match resolved {
                    Some(node) => writeln!(
                        f,
                        "{pad}{constraint} (resolved {} = {}):",
                        node.location(),
                        node.value()
                    )?,
                    None => writeln!(f, "{pad}{constraint} (dependency absent):")?,
                }
                inner.render(f, depth + 1)
            }
        }
    }
}

fn location<'a>(node: &'a Option<Node<'_>>) -> &'a str {
    node.as_ref().map_or("<absent>", |n| n.location())
}

impl fmt::Display for ValidationResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}
