//! Packed, MSB-first bit planes.

/// Stacked one-bit-per-column planes for a single row.
///
/// # Example
///
/// ```
/// use ink_dither::BitPlanes;
///
/// let planes = BitPlanes::new(10, 2);
/// assert_eq!(planes.stride(), 2);
/// assert_eq!(planes.as_bytes().len(), 4);
/// assert!(!planes.is_set(0, 9));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitPlanes {
    width: usize,
    planes: usize,
    stride: usize,
    data: Vec<u8>,
}

impl BitPlanes {
    /// Zeroed planes for a row of `width` columns.
    pub fn new(width: usize, planes: usize) -> Self {
        let stride = width.div_ceil(8);
        Self {
            width,
            planes,
            stride,
            data: vec![0; stride * planes],
        }
    }

    /// Columns per plane.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of stacked planes.
    #[inline]
    pub fn planes(&self) -> usize {
        self.planes
    }

    /// Bytes per plane.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The packed bytes of plane `plane`.
    pub fn plane(&self, plane: usize) -> &[u8] {
        &self.data[plane * self.stride..(plane + 1) * self.stride]
    }

    /// All planes, back to back.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Whether column `x` is set in `plane`.
    pub fn is_set(&self, plane: usize, x: usize) -> bool {
        plane < self.planes && x < self.width && self.data[plane * self.stride + x / 8] & (0x80 >> (x % 8)) != 0
    }

    /// Dot pattern at column `x`, reassembled from all planes.
    pub fn bits_at(&self, x: usize) -> u32 {
        (0..self.planes)
            .filter(|&p| self.is_set(p, x))
            .fold(0, |bits, p| bits | 1 << p)
    }

    /// Whether no bit is set in any plane.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    /// OR dot pattern `bits` into column `x`; bits above the plane count
    /// are dropped.
    #[inline]
    pub(crate) fn set(&mut self, x: usize, bits: u32) {
        let byte = x / 8;
        let mask = 0x80u8 >> (x % 8);
        let mut remaining = bits;
        let mut plane = 0;
        while remaining != 0 && plane < self.planes {
            if remaining & 1 != 0 {
                self.data[plane * self.stride + byte] |= mask;
            }
            remaining >>= 1;
            plane += 1;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.data.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_first_packing() {
        let mut planes = BitPlanes::new(12, 1);
        planes.set(0, 1);
        planes.set(9, 1);
        assert_eq!(planes.plane(0), &[0x80, 0x40]);
    }

    #[test]
    fn test_multi_bit_dots_stack() {
        let mut planes = BitPlanes::new(8, 2);
        planes.set(3, 0b10);
        planes.set(4, 0b11);
        assert_eq!(planes.plane(0), &[0x08]);
        assert_eq!(planes.plane(1), &[0x10 | 0x08]);
        assert_eq!(planes.bits_at(3), 2);
        assert_eq!(planes.bits_at(4), 3);
        assert_eq!(planes.bits_at(5), 0);
    }

    #[test]
    fn test_extra_bits_dropped_and_clear() {
        let mut planes = BitPlanes::new(4, 1);
        planes.set(1, 0b110);
        assert!(planes.is_blank());
        planes.set(1, 0b1);
        assert!(!planes.is_blank());
        planes.clear();
        assert!(planes.is_blank());
    }
}
