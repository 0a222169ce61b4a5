//! DitherBuilder -- configuration entry point for the dither engine.

use super::eventone::Eventone;
use super::fast::Fast;
use super::ranges::{DotSize, InkRanges};
use super::shared::DitherChannel;
use super::very_fast::VeryFast;
use super::{DitherAlgorithm, DitherError, Ditherer, Engine};
use crate::matrix::DitherMatrix;
use crate::output::ChannelOutput;
use crate::row::MAX_CHANNELS;

/// Edge exponent of the matrix used when none is configured (16x16 Bayer).
const DEFAULT_BAYER_EXPONENT: u32 = 4;

/// Transition exponents this close to 1 leave the matrix unchanged.
const TRANSITION_EPSILON: f64 = 0.001;

/// Fluent configuration for a [`Ditherer`].
///
/// - Constructor takes the geometry every job must define
/// - Configuration methods consume and return `self`
/// - Validation happens once, in [`build()`](Self::build)
///
/// Unconfigured channels print a single full-size dot with bit pattern 1
/// at density 1.0.
///
/// # Example
///
/// ```
/// use ink_dither::{DitherAlgorithm, DitherBuilder, DotSize};
///
/// let ditherer = DitherBuilder::new(720, 1440, 2)
///     .algorithm(DitherAlgorithm::Fast)
///     .transition(0.8)
///     .aspect(1440, 720)
///     .inks(0, &[DotSize::new(0.4, 1), DotSize::new(1.0, 2)], 1.0)
///     .build()
///     .unwrap();
///
/// assert_eq!(ditherer.channel_count(), 2);
/// assert_eq!(ditherer.outputs()[0].planes().planes(), 2);
/// assert_eq!(ditherer.outputs()[1].planes().planes(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DitherBuilder {
    src_width: usize,
    dst_width: usize,
    channels: usize,
    algorithm: DitherAlgorithm,
    matrix: Option<DitherMatrix>,
    transition: f64,
    aspect: (u32, u32),
    inks: Vec<(usize, Vec<DotSize>, f64)>,
}

impl DitherBuilder {
    /// Start configuring a ditherer that reads `src_width` pixels of
    /// `channels` samples and writes `dst_width` columns.
    pub fn new(src_width: usize, dst_width: usize, channels: usize) -> Self {
        Self {
            src_width,
            dst_width,
            channels,
            algorithm: DitherAlgorithm::default(),
            matrix: None,
            transition: 1.0,
            aspect: (1, 1),
            inks: Vec::new(),
        }
    }

    /// Set the dithering algorithm.
    #[inline]
    pub fn algorithm(mut self, algorithm: DitherAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the base dither matrix shared by all channels.
    #[inline]
    pub fn matrix(mut self, matrix: DitherMatrix) -> Self {
        self.matrix = Some(matrix);
        self
    }

    /// Set the exponent of the transition matrix used between dot sizes.
    #[inline]
    pub fn transition(mut self, exponent: f64) -> Self {
        self.transition = exponent;
        self
    }

    /// Set the printer's horizontal and vertical resolution.
    #[inline]
    pub fn aspect(mut self, x: u32, y: u32) -> Self {
        self.aspect = (x, y);
        self
    }

    /// Configure the dot sizes and density of `channel`.
    ///
    /// Later calls for the same channel replace earlier ones.
    pub fn inks(mut self, channel: usize, dot_sizes: &[DotSize], density: f64) -> Self {
        self.inks.retain(|(c, _, _)| *c != channel);
        self.inks.push((channel, dot_sizes.to_vec(), density));
        self
    }

    /// Validate the configuration and build the ditherer.
    pub fn build(self) -> Result<Ditherer, DitherError> {
        if self.src_width == 0 || self.dst_width == 0 {
            return Err(DitherError::ZeroWidth {
                src: self.src_width,
                dst: self.dst_width,
            });
        }
        if self.channels == 0 || self.channels > MAX_CHANNELS {
            return Err(DitherError::ChannelCount(self.channels));
        }
        let (x_aspect, y_aspect) = self.aspect;
        if x_aspect == 0 || y_aspect == 0 {
            return Err(DitherError::InvalidAspect {
                x: x_aspect,
                y: y_aspect,
            });
        }

        let mut ranges = Vec::with_capacity(self.channels);
        for channel in 0..self.channels {
            ranges.push(InkRanges::new(channel, &[DotSize::default()], 1.0)?);
        }
        for (channel, dot_sizes, density) in &self.inks {
            let slot = ranges.get_mut(*channel).ok_or(DitherError::UnknownChannel {
                channel: *channel,
                count: self.channels,
            })?;
            *slot = InkRanges::new(*channel, dot_sizes, *density)?;
        }

        let matrix = match self.matrix {
            Some(matrix) => matrix,
            None => DitherMatrix::bayer(DEFAULT_BAYER_EXPONENT)?,
        };
        let transition = if (self.transition - 1.0).abs() > TRANSITION_EPSILON {
            matrix.scale_exponentially(self.transition)?
        } else {
            matrix.clone()
        };

        // Channels sit on an rc x rc grid of matrix phases so that no two
        // channels share a threshold pattern.
        let rc = 1 + (self.channels as f64).sqrt().ceil() as usize;
        let x_step = matrix.x_size() / rc;
        let y_step = matrix.y_size() / rc;
        let channels: Vec<DitherChannel> = ranges
            .into_iter()
            .enumerate()
            .map(|(n, ranges)| {
                let (x_offset, y_offset) = (x_step * (n % rc), y_step * (n / rc));
                DitherChannel {
                    ranges,
                    dithermat: matrix.view(x_offset, y_offset),
                    pick: transition.view(x_offset, y_offset),
                }
            })
            .collect();
        let outputs = channels
            .iter()
            .map(|c| ChannelOutput::new(self.dst_width, c.ranges.signif_bits()))
            .collect();

        let engine = match self.algorithm {
            DitherAlgorithm::VeryFast => Engine::VeryFast(VeryFast),
            DitherAlgorithm::Fast => Engine::Fast(Fast),
            DitherAlgorithm::Eventone | DitherAlgorithm::HybridEventone => Engine::Eventone(Box::new(Eventone::new(
                self.dst_width,
                self.channels,
                x_aspect,
                y_aspect,
                self.algorithm == DitherAlgorithm::HybridEventone,
            ))),
        };

        tracing::debug!(
            algorithm = ?self.algorithm,
            src_width = self.src_width,
            dst_width = self.dst_width,
            channels = self.channels,
            matrix_size = matrix.x_size(),
            transition = self.transition,
            "Built ditherer"
        );

        Ok(Ditherer {
            src_width: self.src_width,
            dst_width: self.dst_width,
            algorithm: self.algorithm,
            engine,
            channels,
            outputs,
            last_row: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let ditherer = DitherBuilder::new(10, 10, 3).build().unwrap();
        assert_eq!(ditherer.algorithm(), DitherAlgorithm::Eventone);
        assert_eq!(ditherer.channel_count(), 3);
        assert!(ditherer.eventone_reset().is_some());
        assert_eq!(ditherer.ranges(2).unwrap().segments().len(), 1);
    }

    #[test]
    fn test_channel_phases_follow_grid() {
        // 5 channels -> rc = 1 + ceil(sqrt(5)) = 4, 16x16 Bayer -> step 4
        let ditherer = DitherBuilder::new(4, 4, 5).build().unwrap();
        let offsets: Vec<(usize, usize)> = ditherer
            .channels
            .iter()
            .map(|c| (c.dithermat.x_offset(), c.dithermat.y_offset()))
            .collect();
        assert_eq!(offsets, vec![(0, 0), (4, 0), (8, 0), (12, 0), (0, 4)]);
        for c in &ditherer.channels {
            assert_eq!(c.pick.x_offset(), c.dithermat.x_offset());
        }
    }

    #[test]
    fn test_rejects_invalid_geometry() {
        assert_eq!(
            DitherBuilder::new(0, 10, 1).build().unwrap_err(),
            DitherError::ZeroWidth { src: 0, dst: 10 }
        );
        assert_eq!(
            DitherBuilder::new(10, 10, 0).build().unwrap_err(),
            DitherError::ChannelCount(0)
        );
        assert_eq!(
            DitherBuilder::new(10, 10, 65).build().unwrap_err(),
            DitherError::ChannelCount(65)
        );
        assert_eq!(
            DitherBuilder::new(10, 10, 1).aspect(0, 720).build().unwrap_err(),
            DitherError::InvalidAspect { x: 0, y: 720 }
        );
    }

    #[test]
    fn test_rejects_inks_for_unknown_channel() {
        let err = DitherBuilder::new(10, 10, 2)
            .inks(2, &[DotSize::default()], 1.0)
            .build()
            .unwrap_err();
        assert_eq!(err, DitherError::UnknownChannel { channel: 2, count: 2 });
    }

    #[test]
    fn test_rejects_bad_transition() {
        let err = DitherBuilder::new(10, 10, 1).transition(-1.0).build().unwrap_err();
        assert!(matches!(err, DitherError::Matrix(_)));
    }

    #[test]
    fn test_later_inks_replace_earlier() {
        let ditherer = DitherBuilder::new(10, 10, 1)
            .inks(0, &[DotSize::new(0.5, 1), DotSize::new(1.0, 2)], 1.0)
            .inks(0, &[DotSize::new(1.0, 1)], 1.0)
            .build()
            .unwrap();
        assert_eq!(ditherer.ranges(0).unwrap().segments().len(), 1);
    }
}
