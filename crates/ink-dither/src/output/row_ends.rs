//! First/last printed column tracking.

/// First and last column printed in the current row, or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowEnds(Option<(usize, usize)>);

impl RowEnds {
    /// First printed column.
    #[inline]
    pub fn first(self) -> Option<usize> {
        self.0.map(|(first, _)| first)
    }

    /// Last printed column.
    #[inline]
    pub fn last(self) -> Option<usize> {
        self.0.map(|(_, last)| last)
    }

    /// `(first, last)` printed columns.
    #[inline]
    pub fn span(self) -> Option<(usize, usize)> {
        self.0
    }

    /// Whether nothing was printed.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0.is_none()
    }

    /// Record a print at column `x`. Works for either scan direction.
    #[inline]
    pub(crate) fn mark(&mut self, x: usize) {
        self.0 = Some(match self.0 {
            Some((first, last)) => (first.min(x), last.max(x)),
            None => (x, x),
        });
    }

    pub(crate) fn reset(&mut self) {
        self.0 = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_in_reverse_order() {
        let mut ends = RowEnds::default();
        assert!(ends.is_empty());
        for x in [40, 12, 33] {
            ends.mark(x);
        }
        assert_eq!(ends.span(), Some((12, 40)));
        ends.reset();
        assert_eq!(ends.first(), None);
    }
}
