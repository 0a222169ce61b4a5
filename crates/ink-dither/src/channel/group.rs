//! Channel registration, ink splitting and ink limiting.

use super::lut::SplitLut;
use super::ChannelError;
use crate::row::{InkRow, ZeroMask, MAX_CHANNELS};

/// One physical ink implementing part of a logical channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Subchannel {
    /// Darkness of this ink relative to the full-strength ink (`0.0..=1.0`).
    pub value: f64,
    /// Output density multiplier.
    pub density: f64,
    /// Fraction of this ink's range used before the next darker ink starts.
    pub cutoff: f64,
}

impl Default for Subchannel {
    fn default() -> Self {
        Self {
            value: 0.0,
            density: 1.0,
            cutoff: 0.75,
        }
    }
}

/// Collects channel definitions before a job starts.
///
/// Registration is idempotent and order-preserving: subchannel indices are
/// the priority order of the physical inks and never change once the group
/// is initialized.
#[derive(Debug, Clone, Default)]
pub struct ChannelGroupBuilder {
    channels: Vec<Vec<Subchannel>>,
    ink_limit: u32,
    black_channel: Option<usize>,
}

impl ChannelGroupBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or re-register) `subchannel` of `channel` with ink value
    /// `value`. Intermediate channels and subchannels are created empty.
    pub fn add(&mut self, channel: usize, subchannel: usize, value: f64) -> Result<(), ChannelError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ChannelError::InvalidValue {
                channel,
                subchannel,
                value,
            });
        }
        if channel >= self.channels.len() {
            self.channels.resize_with(channel + 1, Vec::new);
        }
        let subs = &mut self.channels[channel];
        if subchannel >= subs.len() {
            subs.resize(subchannel + 1, Subchannel::default());
        }
        subs[subchannel].value = value;
        Ok(())
    }

    fn subchannel_mut(&mut self, channel: usize, subchannel: usize) -> Result<&mut Subchannel, ChannelError> {
        self.channels
            .get_mut(channel)
            .and_then(|subs| subs.get_mut(subchannel))
            .ok_or(ChannelError::UnknownSubchannel {
                channel,
                subchannel,
            })
    }

    /// Scale the output of one subchannel by `adjustment`.
    pub fn set_density_adjustment(
        &mut self,
        channel: usize,
        subchannel: usize,
        adjustment: f64,
    ) -> Result<(), ChannelError> {
        if !adjustment.is_finite() || adjustment < 0.0 {
            return Err(ChannelError::InvalidAdjustment {
                channel,
                subchannel,
                value: adjustment,
            });
        }
        self.subchannel_mut(channel, subchannel)?.density = adjustment;
        Ok(())
    }

    /// Set the fraction of a subchannel's range used before the next darker
    /// ink takes over.
    pub fn set_cutoff_adjustment(
        &mut self,
        channel: usize,
        subchannel: usize,
        adjustment: f64,
    ) -> Result<(), ChannelError> {
        if !adjustment.is_finite() || adjustment < 0.0 {
            return Err(ChannelError::InvalidAdjustment {
                channel,
                subchannel,
                value: adjustment,
            });
        }
        self.subchannel_mut(channel, subchannel)?.cutoff = adjustment;
        Ok(())
    }

    /// Cap the total ink per pixel, on the 16-bit scale summed over all
    /// physical subchannels. Zero or negative disables limiting.
    pub fn set_ink_limit(&mut self, limit: i64) {
        self.ink_limit = limit.clamp(0, u32::MAX as i64) as u32;
    }

    /// Mark the logical channel that receives the virtual black estimate.
    pub fn set_black_channel(&mut self, channel: usize) {
        self.black_channel = Some(channel);
    }

    /// Number of logical channels registered so far.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Finish configuration for an image `width` pixels wide.
    ///
    /// Builds the split table of every multi-ink channel and sizes the
    /// scratch buffers. The returned group is ready for per-row use.
    pub fn initialize(self, width: usize) -> Result<ChannelGroup, ChannelError> {
        if width == 0 {
            return Err(ChannelError::ZeroWidth);
        }
        if self.channels.is_empty() {
            return Err(ChannelError::NoChannels);
        }
        if let Some(black) = self.black_channel {
            if black >= self.channels.len() {
                return Err(ChannelError::BlackChannelOutOfRange {
                    channel: black,
                    count: self.channels.len(),
                });
            }
        }

        let mut channels = Vec::with_capacity(self.channels.len());
        let mut offset = 0;
        for (index, subchannels) in self.channels.into_iter().enumerate() {
            if let Some(missing) = subchannels.iter().position(|s| s.value <= 0.0) {
                return Err(ChannelError::MissingValue {
                    channel: index,
                    subchannel: missing,
                });
            }
            let channel = Channel::new(subchannels, offset);
            offset += channel.subchannels.len();
            channels.push(channel);
        }

        let input_channels = channels.len();
        let total_channels = offset;
        if total_channels > MAX_CHANNELS {
            return Err(ChannelError::TooManyChannels(total_channels));
        }

        // Splitting is a no-op when every channel is exactly one ink; the
        // input buffer then doubles as the output buffer.
        let split = channels.iter().any(|c| c.subchannels.len() != 1);
        let max_density = channels.iter().map(|c| c.max_density).sum();

        tracing::debug!(
            width,
            input_channels,
            total_channels,
            split,
            max_density,
            ink_limit = self.ink_limit,
            "Initialized channel group"
        );

        Ok(ChannelGroup {
            channels,
            input_channels,
            total_channels,
            width,
            ink_limit: self.ink_limit,
            max_density,
            black_channel: self.black_channel,
            input: if split {
                vec![0; width * input_channels]
            } else {
                Vec::new()
            },
            data: vec![0; width * total_channels],
        })
    }
}

#[derive(Debug, Clone)]
struct Channel {
    subchannels: Vec<Subchannel>,
    /// 16-bit density multipliers, one per subchannel.
    densities: Vec<u32>,
    /// Index of the first physical subchannel.
    offset: usize,
    lut: Option<SplitLut>,
    max_density: u32,
}

impl Channel {
    fn new(subchannels: Vec<Subchannel>, offset: usize) -> Self {
        let densities: Vec<u32> = subchannels
            .iter()
            .map(|s| (s.density * 65535.0).round().min(u32::MAX as f64) as u32)
            .collect();
        let lut = (subchannels.len() > 1).then(|| SplitLut::build(&subchannels));
        let raw_max = match &lut {
            Some(lut) => lut.max_total(),
            None if subchannels.is_empty() => 0,
            None => 65535,
        };
        let peak_density = densities.iter().copied().max().unwrap_or(0).max(65535);
        let max_density = (raw_max as u64 * peak_density as u64 / 65535) as u32;
        Self {
            subchannels,
            densities,
            offset,
            lut,
            max_density,
        }
    }
}

/// An initialized channel group, sized for one job's row width.
///
/// Rows must be converted strictly in order: the scratch buffers are reused
/// in place, so the view returned by [`output()`](Self::output) is only
/// valid until the next conversion.
#[derive(Debug, Clone)]
pub struct ChannelGroup {
    channels: Vec<Channel>,
    input_channels: usize,
    total_channels: usize,
    width: usize,
    ink_limit: u32,
    max_density: u32,
    black_channel: Option<usize>,
    /// Empty when input and output share `data`.
    input: Vec<u16>,
    data: Vec<u16>,
}

impl ChannelGroup {
    /// Row width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of logical (input) channels.
    #[inline]
    pub fn input_channels(&self) -> usize {
        self.input_channels
    }

    /// Number of physical subchannels (output channels).
    #[inline]
    pub fn total_channels(&self) -> usize {
        self.total_channels
    }

    /// Number of physical subchannels of logical `channel`.
    pub fn subchannel_count(&self, channel: usize) -> usize {
        self.channels.get(channel).map_or(0, |c| c.subchannels.len())
    }

    /// Physical index of `subchannel` of logical `channel`.
    pub fn physical_index(&self, channel: usize, subchannel: usize) -> Option<usize> {
        let c = self.channels.get(channel)?;
        (subchannel < c.subchannels.len()).then(|| c.offset + subchannel)
    }

    /// Whether the input buffer is separate from the output buffer.
    #[inline]
    pub fn splits(&self) -> bool {
        !self.input.is_empty()
    }

    /// The configured ink limit (0 when unlimited).
    #[inline]
    pub fn ink_limit(&self) -> u32 {
        self.ink_limit
    }

    /// Mutable input buffer: `width` pixels of `input_channels` samples.
    pub fn input_mut(&mut self) -> &mut [u16] {
        if self.input.is_empty() {
            &mut self.data
        } else {
            &mut self.input
        }
    }

    /// Copy `row` into the input buffer and convert it.
    pub fn convert_row(&mut self, row: &[u16]) -> Result<ZeroMask, ChannelError> {
        let expected = self.width * self.input_channels;
        if row.len() != expected {
            return Err(ChannelError::RowLength {
                expected,
                actual: row.len(),
            });
        }
        self.input_mut().copy_from_slice(row);
        Ok(self.convert())
    }

    /// Convert the current input buffer into physical subchannel
    /// intensities and return the row's zero mask.
    pub fn convert(&mut self) -> ZeroMask {
        if self.splits() {
            self.split_channels();
        }
        self.scale_densities();
        self.limit_ink();
        self.output().zero_mask()
    }

    /// The converted row: `width` pixels of `total_channels` samples.
    pub fn output(&self) -> InkRow<'_> {
        InkRow::from_parts(&self.data, self.width, self.total_channels)
    }

    fn split_channels(&mut self) {
        let ic = self.input_channels;
        let tc = self.total_channels;
        for x in 0..self.width {
            let input = &self.input[x * ic..(x + 1) * ic];
            let out = &mut self.data[x * tc..(x + 1) * tc];

            // Virtual black: when every colored channel agrees on some
            // darkness, a quarter of it is added to black.
            let black = self.black_channel.map(|b| {
                let virtual_black = input
                    .iter()
                    .enumerate()
                    .filter(|&(c, _)| c != b)
                    .map(|(_, &v)| v)
                    .min()
                    .unwrap_or(0)
                    / 4;
                (b, input[b].saturating_add(virtual_black))
            });

            for (c, channel) in self.channels.iter().enumerate() {
                let value = match black {
                    Some((b, boosted)) if b == c => boosted,
                    _ => input[c],
                };
                let dest = &mut out[channel.offset..channel.offset + channel.subchannels.len()];
                match &channel.lut {
                    Some(lut) => dest.copy_from_slice(lut.split(value)),
                    None => {
                        if let Some(slot) = dest.first_mut() {
                            *slot = value;
                        }
                    }
                }
            }
        }
    }

    fn scale_densities(&mut self) {
        let tc = self.total_channels;
        for channel in &self.channels {
            for (s, &density) in channel.densities.iter().enumerate() {
                if density == 65535 {
                    continue;
                }
                let physical = channel.offset + s;
                for value in self.data[physical..].iter_mut().step_by(tc) {
                    if *value != 0 {
                        let scaled = *value as u64 * density as u64 / 65535;
                        *value = scaled.min(65535) as u16;
                    }
                }
            }
        }
    }

    /// Proportionally scale down every column whose total ink exceeds the
    /// limit. All inks shrink by the same ratio regardless of type.
    fn limit_ink(&mut self) {
        if self.ink_limit == 0 || self.ink_limit >= self.max_density {
            return;
        }
        let limit = self.ink_limit;
        for column in self.data.chunks_exact_mut(self.total_channels) {
            let total: u32 = column.iter().map(|&v| v as u32).sum();
            if total > limit {
                let ratio = limit as f64 / total as f64;
                for value in column.iter_mut() {
                    *value = (*value as f64 * ratio) as u16;
                }
            }
        }
    }
}
