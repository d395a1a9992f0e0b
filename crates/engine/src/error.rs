//! Error taxonomy for constraint evaluation and rule construction.
use thiserror::Error;
use verdict_document::SelectorError;

/// A failure raised by a predicate while testing a node.
///
/// Converted into an exceptional result exactly once, at the evaluation
/// boundary; nothing above that boundary ever sees it as an `Err`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("cannot resolve '{selector}' against an absent node")]
    AbsentRoot { selector: String },

    #[error("{0}")]
    Other(String),
}

/// A construction-time rule failure. Rules fail fast: a malformed selector is
/// rejected immediately, never deferred to evaluation time.
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("selector error: {0}")]
    Selector(#[from] SelectorError),
}
