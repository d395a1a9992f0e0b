//! A JSON-native document model and path-selector engine.
//!
//! This crate owns the document side of the validation engine: a parsed
//! [`Document`], borrowed [`Node`] views into it, and the selector language
//! (`a.b[*].c`) used to address one or more nodes. Documents are read-only
//! during validation; nodes are immutable views and never mutate the tree.

pub mod ast;
pub mod error;
pub mod node;
mod parser;

// --- Public API ---
pub use ast::{PathSegment, Selector};
pub use error::SelectorError;
pub use node::{Document, Node};
