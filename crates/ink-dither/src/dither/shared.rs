//! Per-row plumbing shared by every algorithm.

use super::ranges::InkRanges;
use crate::matrix::MatrixView;
use crate::output::ChannelOutput;
use crate::row::{InkRow, ZeroMask};

/// Horizontal scan direction of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    /// Serpentine order: even rows run left to right, odd rows right to left.
    #[inline]
    pub(crate) fn for_row(row: usize) -> Self {
        if row % 2 == 0 {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }

    /// Column delta towards the pixels not yet visited.
    #[inline]
    pub(crate) fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }
}

/// Destination columns of one row in scan order, each paired with the
/// source column it samples.
///
/// Source positions advance with a Bresenham-style fixed-point step, so the
/// source column of destination `x` is always `floor(x * src / dst)`.
#[derive(Debug, Clone)]
pub(crate) struct Columns {
    dst_width: usize,
    xstep: usize,
    xmod: usize,
    direction: Direction,
    x: usize,
    src: usize,
    xerror: usize,
    remaining: usize,
}

impl Columns {
    pub(crate) fn new(src_width: usize, dst_width: usize, direction: Direction) -> Self {
        let xstep = src_width / dst_width;
        let xmod = src_width % dst_width;
        let (x, src, xerror) = match direction {
            Direction::Forward => (0, 0, 0),
            Direction::Reverse => {
                let x = dst_width - 1;
                (x, x * xstep + x * xmod / dst_width, x * xmod % dst_width)
            }
        };
        Self {
            dst_width,
            xstep,
            xmod,
            direction,
            x,
            src,
            xerror,
            remaining: dst_width,
        }
    }
}

impl Iterator for Columns {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = (self.x, self.src);
        self.remaining -= 1;
        if self.remaining > 0 {
            match self.direction {
                Direction::Forward => {
                    self.x += 1;
                    self.src += self.xstep;
                    self.xerror += self.xmod;
                    if self.xerror >= self.dst_width {
                        self.xerror -= self.dst_width;
                        self.src += 1;
                    }
                }
                Direction::Reverse => {
                    self.x -= 1;
                    self.src -= self.xstep;
                    if self.xerror < self.xmod {
                        self.xerror += self.dst_width - self.xmod;
                        self.src -= 1;
                    } else {
                        self.xerror -= self.xmod;
                    }
                }
            }
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Columns {}

/// Everything an algorithm needs to know about the row being dithered.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RowInput<'a> {
    pub(crate) index: usize,
    pub(crate) data: InkRow<'a>,
    pub(crate) duplicate: bool,
    pub(crate) mask: ZeroMask,
    pub(crate) dst_width: usize,
}

impl RowInput<'_> {
    #[inline]
    pub(crate) fn direction(&self) -> Direction {
        Direction::for_row(self.index)
    }

    pub(crate) fn columns(&self) -> Columns {
        Columns::new(self.data.width(), self.dst_width, self.direction())
    }

    /// Whether every channel is blank for the whole row.
    #[inline]
    pub(crate) fn is_blank(&self) -> bool {
        self.mask.all_zero(self.data.channels())
    }
}

/// Matrix views and ink ladder of one physical subchannel.
#[derive(Debug, Clone)]
pub(crate) struct DitherChannel {
    pub(crate) ranges: InkRanges,
    /// Decides between "no dot" and the smallest dot.
    pub(crate) dithermat: MatrixView,
    /// Decides between two adjacent dot sizes.
    pub(crate) pick: MatrixView,
}

impl DitherChannel {
    pub(crate) fn set_row(&mut self, row: usize) {
        self.dithermat.set_row(row);
        self.pick.set_row(row);
    }
}

/// Write `bits` at column `x` unless it is the "no dot" pattern.
#[inline]
pub(crate) fn print_ink(output: &mut ChannelOutput, x: usize, bits: u32) {
    if bits != 0 {
        output.print(x, bits);
    }
}
