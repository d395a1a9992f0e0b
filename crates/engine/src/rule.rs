//! Rules bind selectors to constraints and evaluate whole documents.
use crate::constraint::{Constraint, Predicate};
use crate::context::ValidationContext;
use crate::error::{ConstraintError, RuleError};
use crate::result::{Combinator, ValidationResult};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use verdict_document::{Document, Node, Selector};

/// Lightweight identity of a rule, embedded in decorated results so a
/// failure trail can name its source without holding the rule itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleInfo {
    pub selector: Option<String>,
    pub alias: Option<String>,
}

impl RuleInfo {
    /// The human-facing name: the alias when present, else the selector.
    pub fn label(&self) -> &str {
        self.alias
            .as_deref()
            .or(self.selector.as_deref())
            .unwrap_or("<rule>")
    }
}

impl fmt::Display for RuleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.label())
    }
}

/// A named validation rule tested against a whole document.
pub trait Rule: fmt::Debug + Send + Sync {
    fn test<'a>(
        &self,
        context: &dyn ValidationContext,
        document: &'a Document,
    ) -> ValidationResult<'a>;

    fn info(&self) -> RuleInfo;
}

/// Binds a path selector (plus an optional alias) to a constraint.
///
/// The constraint is optimized exactly once, at construction; the selector
/// shape (scalar vs collection) is likewise decided once and fixed for the
/// rule's lifetime.
#[derive(Debug)]
pub struct FieldRule {
    selector: Selector,
    alias: Option<String>,
    constraint: Constraint,
    collection: bool,
}

impl FieldRule {
    pub fn new(selector: &str, constraint: Constraint) -> Result<Self, RuleError> {
        let selector = Selector::parse(selector)?;
        let collection = selector.is_collection();
        Ok(Self {
            selector,
            alias: None,
            constraint: constraint.optimize(),
            collection,
        })
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }
}

impl Rule for FieldRule {
    fn test<'a>(
        &self,
        context: &dyn ValidationContext,
        document: &'a Document,
    ) -> ValidationResult<'a> {
        let root = document.root();
        let evaluated: Vec<ValidationResult<'a>> = if self.collection {
            let nodes = root.select_many(&self.selector);
            log::debug!("selector '{}' matched {} node(s)", self.selector, nodes.len());
            nodes
                .iter()
                .map(|node| self.constraint.evaluate(Some(node), context))
                .collect()
        } else {
            // Absence is a defined input: the constraint still runs.
            let node = root.select_one(&self.selector);
            vec![self.constraint.evaluate(node.as_ref(), context)]
        };
        ValidationResult::Composite {
            combinator: Combinator::All,
            children: evaluated
                .into_iter()
                .map(|inner| ValidationResult::Decorated {
                    rule: self.info(),
                    inner: Box::new(inner),
                })
                .collect(),
        }
    }

    fn info(&self) -> RuleInfo {
        RuleInfo {
            selector: Some(self.selector.as_str().to_string()),
            alias: self.alias.clone(),
        }
    }
}

/// Always succeeds regardless of input; a placeholder/default rule.
#[derive(Debug)]
pub struct AlwaysValidRule {
    constraint: Constraint,
}

#[derive(Debug)]
struct AlwaysTrue;

impl Predicate for AlwaysTrue {
    fn test(
        &self,
        _node: Option<&Node<'_>>,
        _context: &dyn ValidationContext,
    ) -> Result<bool, ConstraintError> {
        Ok(true)
    }

    fn describe(&self) -> String {
        "anything".to_string()
    }
}

impl AlwaysValidRule {
    pub fn new() -> Self {
        Self {
            constraint: Constraint::leaf(AlwaysTrue),
        }
    }
}

impl Default for AlwaysValidRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for AlwaysValidRule {
    fn test<'a>(
        &self,
        context: &dyn ValidationContext,
        document: &'a Document,
    ) -> ValidationResult<'a> {
        let root = document.root();
        ValidationResult::Decorated {
            rule: self.info(),
            inner: Box::new(self.constraint.evaluate(Some(&root), context)),
        }
    }

    fn info(&self) -> RuleInfo {
        RuleInfo {
            selector: None,
            alias: Some("always valid".to_string()),
        }
    }
}

/// Wraps an arbitrary whole-document predicate with an explanatory label.
///
/// Bypasses the selector/constraint machinery; used for document-level
/// invariants that do not fit the field-selector model.
pub struct FuncRule {
    constraint: Constraint,
    explain: String,
}

struct DocumentPredicate {
    func: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
    explain: String,
}

impl fmt::Debug for DocumentPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentPredicate")
            .field("explain", &self.explain)
            .finish_non_exhaustive()
    }
}

impl Predicate for DocumentPredicate {
    fn test(
        &self,
        node: Option<&Node<'_>>,
        _context: &dyn ValidationContext,
    ) -> Result<bool, ConstraintError> {
        Ok(node.map(|n| (self.func)(n.value())).unwrap_or(false))
    }

    fn describe(&self) -> String {
        self.explain.clone()
    }
}

impl FuncRule {
    pub fn new(
        func: impl Fn(&Value) -> bool + Send + Sync + 'static,
        explain: impl Into<String>,
    ) -> Self {
        let explain = explain.into();
        Self {
            constraint: Constraint::leaf(DocumentPredicate {
                func: Arc::new(func),
                explain: explain.clone(),
            }),
            explain,
        }
    }
}

impl fmt::Debug for FuncRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuncRule")
            .field("explain", &self.explain)
            .finish_non_exhaustive()
    }
}

impl Rule for FuncRule {
    fn test<'a>(
        &self,
        context: &dyn ValidationContext,
        document: &'a Document,
    ) -> ValidationResult<'a> {
        let root = document.root();
        ValidationResult::Decorated {
            rule: self.info(),
            inner: Box::new(self.constraint.evaluate(Some(&root), context)),
        }
    }

    fn info(&self) -> RuleInfo {
        RuleInfo {
            selector: None,
            alias: Some(self.explain.clone()),
        }
    }
}
