//! Halftoning of physical ink channels into bit planes.
//!
//! A [`Ditherer`] turns one converted row (one 16-bit sample per physical
//! subchannel per pixel) into per-subchannel bit planes. It is configured
//! once per job through [`DitherBuilder`] and then fed rows in strictly
//! ascending order.
//!
//! # Algorithms
//!
//! - **Very fast**: single threshold per channel, smallest dot only.
//! - **Fast**: multi-level ordered dither over every configured dot size.
//! - **Eventone**: error diffusion biased by the distance to the nearest
//!   printed dot (default).
//! - **Hybrid Eventone**: Eventone whose print decision is perturbed by the
//!   dither matrix.
//!
//! Rows alternate scan direction (even rows left to right) and are
//! resampled from the source width to the destination width.
//!
//! # Example
//!
//! ```
//! use ink_dither::{DitherAlgorithm, DitherBuilder, DitherMatrix, InkRow};
//!
//! let matrix = DitherMatrix::bayer(2).unwrap();
//! let mut ditherer = DitherBuilder::new(4, 4, 1)
//!     .algorithm(DitherAlgorithm::VeryFast)
//!     .matrix(matrix)
//!     .build()
//!     .unwrap();
//!
//! let samples = [65535u16; 4];
//! let row = InkRow::new(&samples, 1).unwrap();
//! ditherer.dither(0, row, false, row.zero_mask()).unwrap();
//!
//! let output = &ditherer.outputs()[0];
//! assert_eq!(output.row_ends().span(), Some((0, 3)));
//! ```

mod builder;
mod error;
mod eventone;
mod fast;
mod ranges;
mod shared;
mod very_fast;

pub use builder::DitherBuilder;
pub use error::DitherError;
pub use eventone::Distance;
pub use ranges::{DotSize, InkDefn, InkRanges, Segment};

use eventone::Eventone;
use fast::Fast;
use shared::{DitherChannel, RowInput};
use very_fast::VeryFast;

use crate::output::ChannelOutput;
use crate::row::{InkRow, ZeroMask};

/// Dither algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherAlgorithm {
    /// Compare each sample against one matrix threshold.
    ///
    /// Stateless and fastest. Only the smallest dot size prints.
    VeryFast,

    /// Ordered dither across all dot sizes.
    ///
    /// Stateless. Uses the transition matrix between dot sizes.
    Fast,

    /// Distance-aware error diffusion.
    ///
    /// Carries error and dot distances across rows; best in highlights.
    #[default]
    Eventone,

    /// Eventone with the print decision jittered by the dither matrix.
    HybridEventone,
}

/// One row of work for an algorithm.
///
/// `channels` and `outputs` are indexed by physical subchannel and must be
/// walked in that order.
pub(crate) trait DitherRow {
    fn dither_row(&mut self, row: &RowInput<'_>, channels: &mut [DitherChannel], outputs: &mut [ChannelOutput]);
}

/// Algorithm-specific state.
#[derive(Debug, Clone)]
enum Engine {
    VeryFast(VeryFast),
    Fast(Fast),
    Eventone(Box<Eventone>),
}

impl DitherRow for Engine {
    fn dither_row(&mut self, row: &RowInput<'_>, channels: &mut [DitherChannel], outputs: &mut [ChannelOutput]) {
        match self {
            Engine::VeryFast(engine) => engine.dither_row(row, channels, outputs),
            Engine::Fast(engine) => engine.dither_row(row, channels, outputs),
            Engine::Eventone(engine) => engine.dither_row(row, channels, outputs),
        }
    }
}

/// A configured dither engine for one job.
///
/// Obtained from [`DitherBuilder::build`]. Output buffers are owned by the
/// ditherer and overwritten by every call to [`dither()`](Self::dither).
#[derive(Debug, Clone)]
pub struct Ditherer {
    src_width: usize,
    dst_width: usize,
    algorithm: DitherAlgorithm,
    engine: Engine,
    channels: Vec<DitherChannel>,
    outputs: Vec<ChannelOutput>,
    last_row: Option<usize>,
}

impl Ditherer {
    /// Dither row `row` of the image.
    ///
    /// `input` must hold `src_width` pixels of one sample per configured
    /// channel. `duplicate` tells stateful algorithms the row is identical
    /// to the previous one; `mask` flags channels that are blank for the
    /// whole row.
    pub fn dither(&mut self, row: usize, input: InkRow<'_>, duplicate: bool, mask: ZeroMask) -> Result<(), DitherError> {
        if input.width() != self.src_width || input.channels() != self.channels.len() {
            return Err(DitherError::RowShape {
                width: input.width(),
                channels: input.channels(),
                expected_width: self.src_width,
                expected_channels: self.channels.len(),
            });
        }
        if let Some(last) = self.last_row {
            if row <= last {
                return Err(DitherError::RowOrder { row, last });
            }
        }
        self.last_row = Some(row);

        for output in &mut self.outputs {
            output.clear();
        }
        for channel in &mut self.channels {
            channel.set_row(row);
        }
        let input = RowInput {
            index: row,
            data: input,
            duplicate,
            mask,
            dst_width: self.dst_width,
        };
        self.engine.dither_row(&input, &mut self.channels, &mut self.outputs);
        Ok(())
    }

    /// Output buffers of the last dithered row, one per channel.
    #[inline]
    pub fn outputs(&self) -> &[ChannelOutput] {
        &self.outputs
    }

    /// Output of `channel` for the last dithered row.
    #[inline]
    pub fn output(&self, channel: usize) -> Option<&ChannelOutput> {
        self.outputs.get(channel)
    }

    /// Ink ladder of `channel`.
    pub fn ranges(&self, channel: usize) -> Option<&InkRanges> {
        self.channels.get(channel).map(|c| &c.ranges)
    }

    /// Selected algorithm.
    #[inline]
    pub fn algorithm(&self) -> DitherAlgorithm {
        self.algorithm
    }

    /// Input width in pixels.
    #[inline]
    pub fn src_width(&self) -> usize {
        self.src_width
    }

    /// Output width in pixels.
    #[inline]
    pub fn dst_width(&self) -> usize {
        self.dst_width
    }

    /// Number of physical channels.
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Eventone distance persisted for `channel` at column `x`.
    ///
    /// `None` for the ordered algorithms.
    pub fn eventone_distance(&self, channel: usize, x: usize) -> Option<Distance> {
        match &self.engine {
            Engine::Eventone(engine) => engine.stored_distance(channel, x),
            _ => None,
        }
    }

    /// Distance Eventone stores where the larger dot printed.
    ///
    /// `None` for the ordered algorithms.
    pub fn eventone_reset(&self) -> Option<Distance> {
        match &self.engine {
            Engine::Eventone(engine) => Some(engine.reset_distance()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::DitherMatrix;
    use pretty_assertions::assert_eq;

    fn very_fast(width: usize) -> Ditherer {
        DitherBuilder::new(width, width, 1)
            .algorithm(DitherAlgorithm::VeryFast)
            .matrix(DitherMatrix::from_array(1, 1, &[0], false, true).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_outputs_cleared_between_rows() {
        let mut ditherer = very_fast(8);
        let full = [65535u16; 8];
        let input = InkRow::new(&full, 1).unwrap();
        ditherer.dither(0, input, false, input.zero_mask()).unwrap();
        assert_eq!(ditherer.output(0).unwrap().row_ends().span(), Some((0, 7)));

        let half = [65535, 65535, 65535, 0, 0, 0, 0, 0];
        let input = InkRow::new(&half, 1).unwrap();
        ditherer.dither(1, input, false, input.zero_mask()).unwrap();
        let output = ditherer.output(0).unwrap();
        assert_eq!(output.row_ends().span(), Some((0, 2)));
        assert_eq!(output.planes().as_bytes(), &[0b1110_0000u8]);
    }

    #[test]
    fn test_rejected_row_does_not_advance() {
        let mut ditherer = very_fast(4);
        let wrong = [0u16; 6];
        let input = InkRow::new(&wrong, 1).unwrap();
        assert_eq!(
            ditherer.dither(0, input, false, input.zero_mask()),
            Err(DitherError::RowShape {
                width: 6,
                channels: 1,
                expected_width: 4,
                expected_channels: 1
            })
        );
        let right = [0u16; 4];
        let input = InkRow::new(&right, 1).unwrap();
        assert!(ditherer.dither(0, input, false, input.zero_mask()).is_ok());
    }

    #[test]
    fn test_rows_may_skip_indices() {
        let mut ditherer = very_fast(4);
        let samples = [30000u16; 4];
        let input = InkRow::new(&samples, 1).unwrap();
        ditherer.dither(2, input, false, input.zero_mask()).unwrap();
        ditherer.dither(7, input, true, input.zero_mask()).unwrap();
        assert_eq!(ditherer.output(0).unwrap().row_ends().span(), Some((0, 3)));
    }

    #[test]
    fn test_eventone_accessors_only_for_eventone() {
        let ditherer = very_fast(4);
        assert_eq!(ditherer.eventone_reset(), None);
        assert_eq!(ditherer.eventone_distance(0, 0), None);
        assert!(ditherer.output(1).is_none());
        assert!(ditherer.ranges(1).is_none());

        let ditherer = DitherBuilder::new(4, 4, 1).build().unwrap();
        assert_eq!(ditherer.eventone_distance(0, 4), None);
        assert!(ditherer.eventone_distance(0, 3).is_some());
    }
}
