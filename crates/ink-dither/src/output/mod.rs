//! Per-channel output of the dither engine.
//!
//! Each physical subchannel owns a [`ChannelOutput`]: a set of stacked
//! [`BitPlanes`] for the current row plus the [`RowEnds`] bookkeeping that
//! protocol encoders use to skip blank print-head travel.
//!
//! # Bit layout
//!
//! Plane `p` holds bit `p` of every printed dot's bit pattern. Within a
//! plane, column `x` lives in byte `x / 8` at mask `0x80 >> (x % 8)`
//! (MSB first). Planes are stored back to back at a fixed stride of
//! `ceil(width / 8)` bytes.

mod bit_planes;
mod row_ends;

pub use bit_planes::BitPlanes;
pub use row_ends::RowEnds;

/// Output buffers of one physical subchannel for the current row.
#[derive(Debug, Clone)]
pub struct ChannelOutput {
    planes: BitPlanes,
    ends: RowEnds,
}

impl ChannelOutput {
    pub(crate) fn new(width: usize, planes: usize) -> Self {
        Self {
            planes: BitPlanes::new(width, planes),
            ends: RowEnds::default(),
        }
    }

    /// The bit planes of the current row.
    #[inline]
    pub fn planes(&self) -> &BitPlanes {
        &self.planes
    }

    /// First and last printed column of the current row.
    #[inline]
    pub fn row_ends(&self) -> RowEnds {
        self.ends
    }

    /// Whether nothing was printed in the current row.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.ends.is_empty()
    }

    /// Write dot `bits` at column `x`.
    #[inline]
    pub(crate) fn print(&mut self, x: usize, bits: u32) {
        self.planes.set(x, bits);
        self.ends.mark(x);
    }

    pub(crate) fn clear(&mut self) {
        self.planes.clear();
        self.ends.reset();
    }
}
