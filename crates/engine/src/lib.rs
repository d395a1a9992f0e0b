//! Composable constraint algebra and evaluation for JSON validation.
//!
//! This crate provides the core of the validation engine: the boolean
//! [`Constraint`] algebra with its one-time optimization pass, the
//! [`LazyConstraint`] cross-field resolver, the [`ValidationResult`] tree
//! that reports success, failure and exceptional failure, and the [`Rule`]
//! layer that binds selectors to constraints.
//!
//! ## Key Abstractions
//!
//! - **`Constraint`**: a closed variant tree of predicates and AND/OR/NOT
//!   combinators, composed with the `&`, `|` and `!` operators
//! - **`Predicate`**: the open seam for domain-specific leaf checks
//! - **`ValidationResult`**: the structured outcome tree; failures and
//!   predicate errors are data flowing upward, never control flow
//! - **`Rule`**: selector-to-constraint bindings tested against documents

pub mod constraint;
pub mod context;
pub mod error;
pub mod predicates;
pub mod result;
pub mod rule;

// --- Public API ---
pub use constraint::{Constraint, LazyConstraint, NodeFactory, Predicate};
pub use context::{NullContext, ValidationContext};
pub use error::{ConstraintError, RuleError};
pub use result::{Combinator, ValidationResult};
pub use rule::{AlwaysValidRule, FieldRule, FuncRule, Rule, RuleInfo};
