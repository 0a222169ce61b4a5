//! Phase-shifted matrix views with an amortized column cursor.

use std::sync::Arc;

/// A phase-shifted, read-only view of a [`DitherMatrix`](super::DitherMatrix).
///
/// The view shares the parent's thresholds and keeps its own cursor, so
/// scanning a row one column at a time (in either direction) costs a
/// single add and compare per lookup. Power-of-two widths skip the cursor
/// entirely and mask the column instead.
#[derive(Debug, Clone)]
pub struct MatrixView {
    data: Arc<[u32]>,
    x_size: usize,
    y_size: usize,
    x_offset: usize,
    y_offset: usize,
    fast_mask: Option<usize>,
    last_x: usize,
    last_x_mod: usize,
    last_y_mod: usize,
    index: usize,
}

impl MatrixView {
    pub(crate) fn new(
        data: Arc<[u32]>,
        x_size: usize,
        y_size: usize,
        x_offset: usize,
        y_offset: usize,
    ) -> Self {
        let last_x_mod = x_offset % x_size;
        let last_y_mod = x_size * (y_offset % y_size);
        Self {
            data,
            x_size,
            y_size,
            x_offset,
            y_offset,
            fast_mask: x_size.is_power_of_two().then(|| x_size - 1),
            last_x: 0,
            last_x_mod,
            last_y_mod,
            index: last_x_mod + last_y_mod,
        }
    }

    /// Position the view on row `y`.
    pub fn set_row(&mut self, y: usize) {
        self.last_y_mod = self.x_size * ((y + self.y_offset) % self.y_size);
        self.index = self.last_x_mod + self.last_y_mod;
    }

    /// Threshold at column `x` of the current row.
    ///
    /// Steps of `x ± 1` from the previous lookup move the cursor
    /// incrementally; any other jump recomputes it.
    #[inline]
    pub fn ditherpoint(&mut self, x: usize) -> u32 {
        if let Some(mask) = self.fast_mask {
            return self.data[self.last_y_mod + ((x + self.x_offset) & mask)];
        }
        if x == self.last_x + 1 {
            self.last_x_mod += 1;
            self.index += 1;
            if self.last_x_mod >= self.x_size {
                self.last_x_mod -= self.x_size;
                self.index -= self.x_size;
            }
        } else if x + 1 == self.last_x {
            if self.last_x_mod == 0 {
                self.last_x_mod = self.x_size - 1;
                self.index += self.x_size - 1;
            } else {
                self.last_x_mod -= 1;
                self.index -= 1;
            }
        } else if x != self.last_x {
            self.last_x_mod = (x + self.x_offset) % self.x_size;
            self.index = self.last_x_mod + self.last_y_mod;
        }
        self.last_x = x;
        self.data[self.index]
    }

    /// Column phase of this view.
    #[inline]
    pub fn x_offset(&self) -> usize {
        self.x_offset
    }

    /// Row phase of this view.
    #[inline]
    pub fn y_offset(&self) -> usize {
        self.y_offset
    }
}

#[cfg(test)]
mod tests {
    use crate::matrix::DitherMatrix;

    fn odd_matrix() -> DitherMatrix {
        // 3x3, not a power of two: exercises the incremental cursor
        let values: Vec<u32> = (0..9).map(|v| v * 1000).collect();
        DitherMatrix::from_array(3, 3, &values, false, true).unwrap()
    }

    #[test]
    fn test_view_offsets() {
        let m = odd_matrix();
        let mut view = m.view(1, 2);
        view.set_row(0);
        assert_eq!(view.ditherpoint(0), m.threshold(1, 2));
        view.set_row(2);
        assert_eq!(view.ditherpoint(0), m.threshold(1, 1));
    }

    #[test]
    fn test_cursor_matches_direct_lookup_both_directions() {
        let m = odd_matrix();
        let mut view = m.view(2, 1);
        for y in 0..5 {
            view.set_row(y);
            for x in 0..20 {
                assert_eq!(view.ditherpoint(x), m.threshold(x + 2, y + 1), "fwd x={x} y={y}");
            }
            for x in (0..20).rev() {
                assert_eq!(view.ditherpoint(x), m.threshold(x + 2, y + 1), "rev x={x} y={y}");
            }
        }
    }

    #[test]
    fn test_cursor_arbitrary_jumps() {
        let m = odd_matrix();
        let mut view = m.view(0, 0);
        view.set_row(4);
        for &x in &[7usize, 2, 3, 11, 10, 0, 5] {
            assert_eq!(view.ditherpoint(x), m.threshold(x, 4));
        }
    }

    #[test]
    fn test_fast_mask_path() {
        let m = DitherMatrix::bayer(3).unwrap();
        let mut view = m.view(5, 3);
        view.set_row(6);
        for x in [0usize, 9, 3, 100, 99] {
            assert_eq!(view.ditherpoint(x), m.threshold(x + 5, 9));
        }
    }
}
