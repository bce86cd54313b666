//! AST foundation types: spans and spanned nodes.

use std::ops::Range;

/// A byte range in query source text.
/// This is the canonical span type used throughout the crate.
pub type Span = Range<usize>;

/// A value with an associated source span.
///
/// Used for small leaf values (aliases, table names) that need a location
/// for diagnostics but do not warrant a dedicated node type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<T> {
    /// The wrapped value.
    pub node: T,
    /// The span in source text where this value appears.
    pub span: Span,
}

impl<T> Spanned<T> {
    /// Creates a new spanned value.
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }

    /// Maps the inner value while preserving the span.
    pub fn map<U, F>(self, f: F) -> Spanned<U>
    where
        F: FnOnce(T) -> U,
    {
        Spanned {
            node: f(self.node),
            span: self.span,
        }
    }

    /// Returns a reference to the span.
    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl<T> AsRef<T> for Spanned<T> {
    fn as_ref(&self) -> &T {
        &self.node
    }
}

/// Returns the smallest span covering both `a` and `b`.
pub fn cover(a: &Span, b: &Span) -> Span {
    a.start.min(b.start)..a.end.max(b.end)
}
