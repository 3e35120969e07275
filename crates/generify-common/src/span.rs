//! Source spans as byte offsets within one source unit.
//!
//! Range-keyed constraint variables (syntactic type references, cast
//! expressions) are identified by the span of the source text they stand
//! for. Spans are only meaningful relative to the unit they came from; the
//! graph pairs them with a unit id and never interprets the offsets.

use serde::Serialize;

/// A half-open byte range `[start, end)` inside a source unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// An empty span at offset 0, used when no position is available.
    pub const EMPTY: Span = Span { start: 0, end: 0 };

    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start must not exceed end");
        Span { start, end }
    }

    #[inline]
    pub fn len(self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Whether `offset` falls inside this span.
    #[inline]
    pub fn contains(self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    #[inline]
    pub fn to_range(self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

/// A value paired with the span it was read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Spanned { value, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_len_and_contains() {
        let span = Span::new(10, 14);
        assert_eq!(span.len(), 4);
        assert!(span.contains(10));
        assert!(span.contains(13));
        assert!(!span.contains(14));
        assert!(!span.contains(9));
    }

    #[test]
    fn test_empty_span() {
        assert!(Span::EMPTY.is_empty());
        assert!(!Span::EMPTY.contains(0));
    }

    #[test]
    fn test_span_ordering_is_positional() {
        let a = Span::new(1, 5);
        let b = Span::new(2, 3);
        assert!(a < b);
    }
}
