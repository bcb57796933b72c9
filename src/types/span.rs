//! Defines a [`Span`] which is used to represent a region in the template
//! source code.

use std::ops::{Index, Range};

/// A byte range in template source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// The start offset, inclusive.
    pub m: usize,
    /// The end offset, exclusive.
    pub n: usize,
}

impl Span {
    /// Moves the span `offset` bytes to the right.
    ///
    /// Used to translate a span found in a slice of the source back into a
    /// span of the whole source.
    pub fn shift(self, offset: usize) -> Self {
        Self {
            m: self.m + offset,
            n: self.n + offset,
        }
    }

    pub fn len(self) -> usize {
        self.n - self.m
    }

    pub fn is_empty(self) -> bool {
        self.m == self.n
    }
}

impl Index<Span> for str {
    type Output = str;

    fn index(&self, span: Span) -> &Self::Output {
        let Span { m, n } = span;
        &self[m..n]
    }
}

impl From<Range<usize>> for Span {
    fn from(r: Range<usize>) -> Self {
        Self {
            m: r.start,
            n: r.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_shift_and_index() {
        let source = "lorem <f:if> ipsum";
        let span = Span::from(1..6).shift(5);
        assert_eq!(&source[span], "<f:if");
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
    }
}
