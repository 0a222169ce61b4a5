//! Strided row views and per-channel zero masks.
//!
//! Every row that flows through the engine is channel-interleaved: one
//! 16-bit sample per channel per pixel. [`InkRow`] carries the channel count
//! alongside the samples so callers never do `x * channels + c` arithmetic
//! by hand.

use thiserror::Error;

/// Maximum number of physical channels a [`ZeroMask`] can describe.
pub const MAX_CHANNELS: usize = 64;

/// Error returned when a sample buffer cannot be viewed as a row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// A row needs at least one channel
    #[error("row must have at least one channel")]
    NoChannels,
    /// The buffer length is not a whole number of pixels
    #[error("row length {len} is not a multiple of {channels} channels")]
    Misaligned {
        /// Number of samples in the buffer
        len: usize,
        /// Channels per pixel
        channels: usize,
    },
}

/// Borrowed, channel-interleaved row of 16-bit samples.
///
/// # Example
///
/// ```
/// use ink_dither::InkRow;
///
/// let samples = [10u16, 20, 30, 40, 50, 60];
/// let row = InkRow::new(&samples, 2).unwrap();
///
/// assert_eq!(row.width(), 3);
/// assert_eq!(row.pixel(1), &[30, 40]);
/// assert_eq!(row.sample(2, 1), 60);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct InkRow<'a> {
    data: &'a [u16],
    width: usize,
    channels: usize,
}

impl<'a> InkRow<'a> {
    /// View `data` as pixels of `channels` interleaved samples.
    pub fn new(data: &'a [u16], channels: usize) -> Result<Self, RowError> {
        if channels == 0 {
            return Err(RowError::NoChannels);
        }
        if data.len() % channels != 0 {
            return Err(RowError::Misaligned {
                len: data.len(),
                channels,
            });
        }
        Ok(Self {
            data,
            width: data.len() / channels,
            channels,
        })
    }

    /// Trusted constructor for buffers sized by the crate itself.
    #[inline]
    pub(crate) fn from_parts(data: &'a [u16], width: usize, channels: usize) -> Self {
        debug_assert_eq!(data.len(), width * channels);
        Self {
            data,
            width,
            channels,
        }
    }

    /// Number of pixels in the row.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of interleaved channels per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// All samples of pixel `x`, in channel order.
    #[inline]
    pub fn pixel(&self, x: usize) -> &'a [u16] {
        let start = x * self.channels;
        &self.data[start..start + self.channels]
    }

    /// Sample of `channel` at pixel `x`.
    #[inline]
    pub fn sample(&self, x: usize, channel: usize) -> u16 {
        self.data[x * self.channels + channel]
    }

    /// The raw interleaved samples.
    #[inline]
    pub fn as_slice(&self) -> &'a [u16] {
        self.data
    }

    /// Compute the zero mask of this row: bit `c` is set iff every sample
    /// of channel `c` is exactly zero.
    pub fn zero_mask(&self) -> ZeroMask {
        let mut nonzero = 0u64;
        for pixel in self.data.chunks_exact(self.channels) {
            for (c, &sample) in pixel.iter().enumerate() {
                if sample != 0 {
                    nonzero |= 1 << c;
                }
            }
        }
        ZeroMask::from_bits(!nonzero & ZeroMask::all(self.channels).bits())
    }
}

/// Bitmask flagging physical channels whose whole row is blank.
///
/// Bit `c` set means channel `c` has no ink anywhere in the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ZeroMask(u64);

impl ZeroMask {
    /// Mask with no channel flagged.
    pub const NONE: ZeroMask = ZeroMask(0);

    /// Mask from raw bits.
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        ZeroMask(bits)
    }

    /// Mask with the low `channels` bits set.
    #[inline]
    pub fn all(channels: usize) -> Self {
        if channels >= MAX_CHANNELS {
            ZeroMask(u64::MAX)
        } else {
            ZeroMask((1u64 << channels) - 1)
        }
    }

    /// Raw bits.
    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Whether `channel` is flagged blank.
    #[inline]
    pub fn is_zero(self, channel: usize) -> bool {
        channel < MAX_CHANNELS && self.0 & (1 << channel) != 0
    }

    /// Whether all of the first `channels` channels are blank.
    #[inline]
    pub fn all_zero(self, channels: usize) -> bool {
        let all = Self::all(channels).0;
        self.0 & all == all
    }

    /// Flag `channel` as blank.
    #[inline]
    pub fn set(&mut self, channel: usize) {
        self.0 |= 1 << channel;
    }
}
