//! The opaque ambient context threaded through every evaluation.
use std::any::Any;

/// Caller-supplied ambient data (locale, lookup tables, ...) handed to every
/// predicate invocation. The engine never inspects it; predicates that need
/// it downcast via [`as_any`](ValidationContext::as_any).
pub trait ValidationContext: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Send + Sync> ValidationContext for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The default context for callers with no ambient data.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullContext;
