/// Span of a node.
///
/// Spans are non-empty, continuous ranges over terminal positions.
///
/// Spans are non-inclusive and do not cover the `end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    /// Lower bounds of the span.
    pub start: usize,
    /// Upper bounds of the span.
    pub end: usize,
}

impl From<usize> for Span {
    fn from(idx: usize) -> Self {
        Span {
            start: idx,
            end: idx + 1,
        }
    }
}

impl Span {
    /// Create new span.
    pub(crate) fn new(lower: usize, upper: usize) -> Self {
        assert!(lower < upper, "Span start has to be smaller then end.");
        Span {
            start: lower,
            end: upper,
        }
    }
}
