//! Document ownership and the borrowed node views used during validation.
use crate::ast::{PathSegment, Selector};
use serde_json::Value;
use std::fmt;

/// A parsed JSON document. Owns every value reachable from its root; all
/// access during validation goes through immutable [`Node`] views.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// The top-level node of the whole document.
    pub fn root(&self) -> Node<'_> {
        Node {
            root: &self.root,
            value: &self.root,
            location: ROOT_LOCATION.to_string(),
        }
    }

    pub fn select_one(&self, selector: &Selector) -> Option<Node<'_>> {
        self.root().select_one(selector)
    }

    pub fn select_many(&self, selector: &Selector) -> Vec<Node<'_>> {
        self.root().select_many(selector)
    }
}

impl From<Value> for Document {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

const ROOT_LOCATION: &str = "$";

/// A borrowed view of one location inside a document.
///
/// Nodes are cheap to clone and never outlive their document. Equality is
/// identity: two nodes are equal when they address the exact same value in
/// the exact same document, regardless of structural similarity.
#[derive(Debug, Clone)]
pub struct Node<'a> {
    root: &'a Value,
    value: &'a Value,
    location: String,
}

impl<'a> Node<'a> {
    /// The root of the document this node belongs to.
    pub fn root(&self) -> Node<'a> {
        Node {
            root: self.root,
            value: self.root,
            location: ROOT_LOCATION.to_string(),
        }
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// The dotted path of this node, e.g. `$.orders[2].total`. Diagnostic
    /// only; identity comparison does not use it.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Resolves a selector relative to this node, yielding every match.
    pub fn select_many(&self, selector: &Selector) -> Vec<Node<'a>> {
        let mut current = vec![self.clone()];
        for segment in selector.segments() {
            let mut next = Vec::new();
            for node in &current {
                node.step(segment, &mut next);
            }
            current = next;
            if current.is_empty() {
                break;
            }
        }
        current
    }

    /// Resolves a selector relative to this node, yielding the first match.
    pub fn select_one(&self, selector: &Selector) -> Option<Node<'a>> {
        self.select_many(selector).into_iter().next()
    }

    fn step(&self, segment: &PathSegment, out: &mut Vec<Node<'a>>) {
        match segment {
            PathSegment::Key(key) => {
                if let Some(value) = self.value.get(key.as_str()) {
                    out.push(Node {
                        root: self.root,
                        value,
                        location: format!("{}.{}", self.location, key),
                    });
                }
            }
            PathSegment::Index(index) => {
                if let Some(value) = self.value.get(*index) {
                    out.push(Node {
                        root: self.root,
                        value,
                        location: format!("{}[{}]", self.location, index),
                    });
                }
            }
            PathSegment::Wildcard => {
                if let Value::Array(elements) = self.value {
                    for (index, value) in elements.iter().enumerate() {
                        out.push(Node {
                            root: self.root,
                            value,
                            location: format!("{}[{}]", self.location, index),
                        });
                    }
                }
            }
        }
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.root, other.root) && std::ptr::eq(self.value, other.value)
    }
}

impl Eq for Node<'_> {}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.location)
    }
}
