//! Threshold matrix construction.

use std::sync::Arc;

use super::{MatrixError, MatrixView};

/// Seed of the classic recursive Bayer matrix.
const BAYER_SEED: [u32; 4] = [0, 2, 3, 1];

/// Largest number of cells a matrix may hold.
const MAX_CELLS: usize = 1 << 24;

/// A two-dimensional table of dither thresholds.
///
/// Thresholds are stored row-major and always lie in `0..=65535`. The
/// matrix is immutable once built: [`shear()`](Self::shear) and
/// [`scale_exponentially()`](Self::scale_exponentially) produce new
/// matrices rather than editing cells in place.
///
/// # Example
///
/// ```
/// use ink_dither::DitherMatrix;
///
/// // 2^3 = 8x8 self-similar matrix grown from the Bayer seed
/// let matrix = DitherMatrix::iterated(2, 3, &[0, 2, 3, 1]).unwrap();
/// assert_eq!(matrix.x_size(), 8);
/// assert_eq!(matrix.threshold(0, 0), 0);
///
/// let mut view = matrix.view(3, 5);
/// view.set_row(0);
/// assert_eq!(view.ditherpoint(0), matrix.threshold(3, 5));
/// ```
#[derive(Debug, Clone)]
pub struct DitherMatrix {
    base: usize,
    exponent: u32,
    x_size: usize,
    y_size: usize,
    data: Arc<[u32]>,
}

/// Rank of cell `(x, y)` in a `size^steps` self-similar matrix.
///
/// Each iteration level contributes the seed rank of the cell's position
/// at that scale. The finest level carries the most weight, so adjacent
/// cells land far apart in rank.
fn ordered_point(x: usize, y: usize, steps: u32, size: usize, seed: &[u32]) -> u64 {
    let cells = (size * size) as u64;
    let mut rank = 0u64;
    let mut divisor = 1usize;
    for level in 0..steps {
        let xa = (x / divisor) % size;
        let ya = (y / divisor) % size;
        rank += seed[ya + xa * size] as u64 * cells.pow(steps - 1 - level);
        divisor *= size;
    }
    rank
}

/// Scale a cell rank in `0..total` into the 16-bit threshold range.
#[inline]
fn scale_rank(rank: u64, total: usize) -> u32 {
    (rank * 65536 / total as u64) as u32
}

fn check_dimensions(x_size: usize, y_size: usize, len: usize) -> Result<usize, MatrixError> {
    if x_size == 0 || y_size == 0 {
        return Err(MatrixError::EmptyDimensions { x_size, y_size });
    }
    let expected = x_size
        .checked_mul(y_size)
        .filter(|&cells| cells <= MAX_CELLS)
        .ok_or(MatrixError::EmptyDimensions { x_size, y_size })?;
    if len != expected {
        return Err(MatrixError::LengthMismatch {
            expected,
            actual: len,
        });
    }
    Ok(expected)
}

impl DitherMatrix {
    fn from_parts(base: usize, exponent: u32, x_size: usize, y_size: usize, data: Vec<u32>) -> Self {
        debug_assert_eq!(data.len(), x_size * y_size);
        Self {
            base,
            exponent,
            x_size,
            y_size,
            data: data.into(),
        }
    }

    /// Build a `base^exponent` square matrix by recursive composition of a
    /// `base x base` seed.
    ///
    /// `seed` holds the ranks `0..base*base` of the seed pattern. The
    /// resulting ranks are scaled into `0..=65535`.
    pub fn iterated(base: usize, exponent: u32, seed: &[u32]) -> Result<Self, MatrixError> {
        if base < 2 || exponent == 0 {
            return Err(MatrixError::InvalidIteration { base, exponent });
        }
        let size = base
            .checked_pow(exponent)
            .filter(|size| size.checked_mul(*size).is_some_and(|c| c <= MAX_CELLS))
            .ok_or(MatrixError::TooLarge { base, exponent })?;
        let cells = base * base;
        if seed.len() != cells {
            return Err(MatrixError::LengthMismatch {
                expected: cells,
                actual: seed.len(),
            });
        }
        if let Some((index, &value)) = seed
            .iter()
            .enumerate()
            .find(|&(_, &v)| v as usize >= cells)
        {
            return Err(MatrixError::ValueOutOfRange {
                index,
                value,
                max: cells as u32 - 1,
            });
        }

        let total = size * size;
        let mut data = vec![0u32; total];
        for y in 0..size {
            for x in 0..size {
                let rank = ordered_point(x, y, exponent, base, seed);
                data[x + y * size] = scale_rank(rank, total);
            }
        }
        tracing::debug!(base, exponent, size, "Built iterated dither matrix");
        Ok(Self::from_parts(base, exponent, size, size, data))
    }

    /// The recursive Bayer matrix of edge `2^exponent`.
    pub fn bayer(exponent: u32) -> Result<Self, MatrixError> {
        Self::iterated(2, exponent, &BAYER_SEED)
    }

    /// Load an externally supplied threshold array.
    ///
    /// With `prescaled` the values are thresholds and must lie in
    /// `0..=65535`; otherwise they are cell ranks in `0..x_size*y_size` and
    /// are scaled like an iterated matrix. With `transpose` the array is
    /// read column-major.
    pub fn from_array(
        x_size: usize,
        y_size: usize,
        values: &[u32],
        transpose: bool,
        prescaled: bool,
    ) -> Result<Self, MatrixError> {
        let total = check_dimensions(x_size, y_size, values.len())?;
        let max = if prescaled {
            65535
        } else {
            (total - 1).min(u32::MAX as usize) as u32
        };
        if let Some((index, &value)) = values.iter().enumerate().find(|&(_, &v)| v > max) {
            return Err(MatrixError::ValueOutOfRange { index, value, max });
        }

        let mut data = vec![0u32; total];
        for y in 0..y_size {
            for x in 0..x_size {
                let value = if transpose {
                    values[y + x * y_size]
                } else {
                    values[x + y * x_size]
                };
                data[x + y * x_size] = if prescaled {
                    value
                } else {
                    scale_rank(value as u64, total)
                };
            }
        }
        tracing::debug!(x_size, y_size, transpose, prescaled, "Loaded dither matrix");
        Ok(Self::from_parts(x_size, 1, x_size, y_size, data))
    }

    /// Load a threshold curve: prescaled thresholds given as floating-point
    /// samples in `0.0..=65535.0`. Fractional thresholds are truncated.
    pub fn from_curve(
        x_size: usize,
        y_size: usize,
        values: &[f64],
        transpose: bool,
    ) -> Result<Self, MatrixError> {
        check_dimensions(x_size, y_size, values.len())?;
        if let Some((index, &value)) = values
            .iter()
            .enumerate()
            .find(|&(_, &v)| !v.is_finite() || !(0.0..=65535.0).contains(&v))
        {
            return Err(MatrixError::InvalidCurveValue { index, value });
        }
        let thresholds: Vec<u32> = values.iter().map(|&v| v as u32).collect();
        Self::from_array(x_size, y_size, &thresholds, transpose, true)
    }

    /// Re-index the matrix with a skew to break up periodic artifacts.
    ///
    /// Rows are first resampled at a vertical stride of `x_shear + 1`, then
    /// columns at a horizontal stride of `y_shear + 1`, both modulo the
    /// matrix size. `shear(0, 0)` is the identity.
    pub fn shear(&self, x_shear: usize, y_shear: usize) -> Self {
        let (xs, ys) = (self.x_size, self.y_size);
        let mut tmp = vec![0u32; xs * ys];
        for j in 0..ys {
            for i in 0..xs {
                let src_y = (j * (x_shear + 1)) % ys;
                tmp[i + j * xs] = self.data[i + src_y * xs];
            }
        }
        let mut data = vec![0u32; xs * ys];
        for j in 0..ys {
            for i in 0..xs {
                let src_x = (i * (y_shear + 1)) % xs;
                data[i + j * xs] = tmp[src_x + j * xs];
            }
        }
        tracing::debug!(x_shear, y_shear, "Sheared dither matrix");
        Self::from_parts(self.base, self.exponent, xs, ys, data)
    }

    /// Build a transition matrix: every threshold `t` becomes
    /// `65535 * (t / 65535)^exponent`.
    ///
    /// Exponents above 1 push thresholds down, so the larger of two
    /// adjacent dot sizes takes over earlier and more gradually.
    pub fn scale_exponentially(&self, exponent: f64) -> Result<Self, MatrixError> {
        if !exponent.is_finite() || exponent <= 0.0 {
            return Err(MatrixError::InvalidExponent(exponent));
        }
        let data = self
            .data
            .iter()
            .map(|&t| (65535.0 * (t as f64 / 65535.0).powf(exponent)) as u32)
            .collect();
        Ok(Self::from_parts(
            self.base,
            self.exponent,
            self.x_size,
            self.y_size,
            data,
        ))
    }

    /// Non-owning phase-shifted view with its own traversal cursor.
    pub fn view(&self, x_offset: usize, y_offset: usize) -> MatrixView {
        MatrixView::new(
            Arc::clone(&self.data),
            self.x_size,
            self.y_size,
            x_offset,
            y_offset,
        )
    }

    /// Threshold at column `x`, row `y` (wrapping).
    #[inline]
    pub fn threshold(&self, x: usize, y: usize) -> u32 {
        self.data[(x % self.x_size) + (y % self.y_size) * self.x_size]
    }

    /// Seed edge length (array width for loaded matrices).
    #[inline]
    pub fn base(&self) -> usize {
        self.base
    }

    /// Number of iterations (1 for loaded matrices).
    #[inline]
    pub fn exponent(&self) -> u32 {
        self.exponent
    }

    /// Matrix width.
    #[inline]
    pub fn x_size(&self) -> usize {
        self.x_size
    }

    /// Matrix height.
    #[inline]
    pub fn y_size(&self) -> usize {
        self.y_size
    }

    /// All thresholds, row-major.
    #[inline]
    pub fn thresholds(&self) -> &[u32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_iterated_bayer_2x2() {
        let m = DitherMatrix::iterated(2, 1, &BAYER_SEED).unwrap();
        // seed is read transposed: map[ya + xa * size]
        assert_eq!(m.thresholds(), &[0, 49152, 32768, 16384]);
    }

    #[test]
    fn test_iterated_is_permutation_of_ranks() {
        let m = DitherMatrix::bayer(4).unwrap();
        assert_eq!(m.x_size(), 16);
        assert_eq!(m.y_size(), 16);

        let mut values: Vec<u32> = m.thresholds().to_vec();
        values.sort_unstable();
        let expected: Vec<u32> = (0..256u32).map(|r| r * 65536 / 256).collect();
        assert_eq!(values, expected);
        assert!(values.iter().all(|&v| v <= 65535));
    }

    #[test]
    fn test_iterated_self_similar() {
        // Top-left 2x2 block of the 4x4 matrix orders like the seed
        let m = DitherMatrix::bayer(2).unwrap();
        let block = [
            m.threshold(0, 0),
            m.threshold(1, 0),
            m.threshold(0, 1),
            m.threshold(1, 1),
        ];
        let mut order: Vec<usize> = (0..4).collect();
        order.sort_by_key(|&i| block[i]);
        let seed = DitherMatrix::iterated(2, 1, &BAYER_SEED).unwrap();
        let mut seed_order: Vec<usize> = (0..4).collect();
        seed_order.sort_by_key(|&i| seed.thresholds()[i]);
        assert_eq!(order, seed_order);
    }

    #[test]
    fn test_iterated_rejects_bad_seed() {
        assert_eq!(
            DitherMatrix::iterated(2, 2, &[0, 1, 2]).unwrap_err(),
            MatrixError::LengthMismatch {
                expected: 4,
                actual: 3
            }
        );
        assert!(matches!(
            DitherMatrix::iterated(2, 2, &[0, 1, 2, 4]),
            Err(MatrixError::ValueOutOfRange { index: 3, .. })
        ));
        assert!(matches!(
            DitherMatrix::iterated(1, 2, &[0]),
            Err(MatrixError::InvalidIteration { .. })
        ));
        assert!(matches!(
            DitherMatrix::iterated(2, 40, &BAYER_SEED),
            Err(MatrixError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_from_array_transpose() {
        let values = [0u32, 1, 2, 3, 4, 5];
        let plain = DitherMatrix::from_array(3, 2, &values, false, true).unwrap();
        assert_eq!(plain.threshold(2, 0), 2);
        assert_eq!(plain.threshold(0, 1), 3);

        let transposed = DitherMatrix::from_array(3, 2, &values, true, true).unwrap();
        // column-major read: (x, y) <- values[y + x * y_size]
        assert_eq!(transposed.threshold(1, 0), 2);
        assert_eq!(transposed.threshold(0, 1), 1);
    }

    #[test]
    fn test_from_array_scales_ranks() {
        let m = DitherMatrix::from_array(2, 2, &[0, 1, 2, 3], false, false).unwrap();
        assert_eq!(m.thresholds(), &[0, 16384, 32768, 49152]);
    }

    #[test]
    fn test_from_array_validates_range() {
        assert!(matches!(
            DitherMatrix::from_array(2, 1, &[0, 65536], false, true),
            Err(MatrixError::ValueOutOfRange { index: 1, .. })
        ));
        assert!(matches!(
            DitherMatrix::from_array(2, 1, &[0, 2], false, false),
            Err(MatrixError::ValueOutOfRange { max: 1, .. })
        ));
        assert!(matches!(
            DitherMatrix::from_array(0, 1, &[], false, true),
            Err(MatrixError::EmptyDimensions { .. })
        ));
    }

    #[test]
    fn test_from_curve() {
        let m = DitherMatrix::from_curve(2, 1, &[100.7, 65535.0], false).unwrap();
        assert_eq!(m.thresholds(), &[100, 65535]);
        assert!(matches!(
            DitherMatrix::from_curve(2, 1, &[0.0, f64::NAN], false),
            Err(MatrixError::InvalidCurveValue { index: 1, .. })
        ));
        assert!(DitherMatrix::from_curve(1, 1, &[-1.0], false).is_err());
    }

    #[test]
    fn test_shear_identity_and_permutation() {
        let m = DitherMatrix::bayer(3).unwrap();
        assert_eq!(m.shear(0, 0).thresholds(), m.thresholds());

        // stride 3 is coprime with 8, so shear permutes cells
        let sheared = m.shear(2, 2);
        let mut a = m.thresholds().to_vec();
        let mut b = sheared.thresholds().to_vec();
        assert_ne!(a, b);
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }

    #[test]
    fn test_scale_exponentially() {
        let m = DitherMatrix::from_array(3, 1, &[0, 32768, 65535], false, true).unwrap();
        let t = m.scale_exponentially(2.0).unwrap();
        assert_eq!(t.thresholds()[0], 0);
        assert_eq!(t.thresholds()[1], 16384);
        assert_eq!(t.thresholds()[2], 65535);
        // source is untouched
        assert_eq!(m.thresholds()[1], 32768);
        assert!(m.scale_exponentially(0.0).is_err());
    }
}
