//! Dot-size ranges of a dither channel.
//!
//! A channel's dot sizes are laid out on a ladder of inks, from "no dot"
//! up to full coverage. Each adjacent pair of inks forms a [`Segment`];
//! the algorithms locate an input level on the ladder and then choose
//! between the segment's lower and upper ink.

use super::DitherError;

/// One printable dot size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotSize {
    /// Darkness of the dot relative to full coverage (`0.0..=1.0`).
    pub value: f64,
    /// Bit pattern written to the stacked bit planes.
    pub bits: u32,
}

impl DotSize {
    /// Create a dot size.
    pub const fn new(value: f64, bits: u32) -> Self {
        Self { value, bits }
    }
}

impl Default for DotSize {
    fn default() -> Self {
        Self::new(1.0, 1)
    }
}

/// One rung of the ink ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InkDefn {
    /// Density-adjusted input level at which this ink starts to appear.
    pub range: u32,
    /// Darkness of this ink on the 16-bit scale.
    pub value: u32,
    /// Bit pattern, 0 for "no dot".
    pub bits: u32,
}

/// Two adjacent inks on the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Lighter ink.
    pub lower: InkDefn,
    /// Darker ink.
    pub upper: InkDefn,
    /// `upper.range - lower.range`
    pub range_span: u32,
    /// `upper.value - lower.value`
    pub value_span: u32,
    /// Both ends print the same bit pattern.
    pub is_same_ink: bool,
    /// Both ends have the same darkness.
    pub is_equal: bool,
}

impl Segment {
    fn new(lower: InkDefn, upper: InkDefn) -> Self {
        let value_span = upper.value.saturating_sub(lower.value);
        Self {
            lower,
            upper,
            range_span: upper.range.saturating_sub(lower.range),
            value_span,
            is_same_ink: lower.bits == upper.bits,
            is_equal: value_span == 0,
        }
    }
}

#[inline]
fn to_u16_scale(value: f64) -> u32 {
    (value * 65535.0).clamp(0.0, 65535.0) as u32
}

/// The complete ink ladder of one dither channel.
#[derive(Debug, Clone, PartialEq)]
pub struct InkRanges {
    segments: Vec<Segment>,
    density: u32,
    bit_max: u32,
    signif_bits: usize,
    maxdot: u32,
}

impl InkRanges {
    /// Build the ladder for `dot_sizes` (ascending by value) at channel
    /// density `density`.
    ///
    /// `channel` only labels errors.
    pub fn new(channel: usize, dot_sizes: &[DotSize], density: f64) -> Result<Self, DitherError> {
        let last = dot_sizes.last().ok_or(DitherError::NoDotSizes(channel))?;
        if !density.is_finite() || density <= 0.0 {
            return Err(DitherError::InvalidDensity {
                channel,
                value: density,
            });
        }
        let mut previous = 0.0;
        for (index, dot) in dot_sizes.iter().enumerate() {
            if !dot.value.is_finite() || dot.value <= previous || dot.value > 1.0 {
                return Err(DitherError::InvalidDotValue {
                    channel,
                    index,
                    value: dot.value,
                });
            }
            if dot.bits == 0 {
                return Err(DitherError::EmptyDotBits { channel, index });
            }
            previous = dot.value;
        }

        let first = dot_sizes[0];
        let mut inks = Vec::with_capacity(dot_sizes.len() + 2);
        inks.push(InkDefn::default());
        inks.push(InkDefn {
            range: if dot_sizes.len() == 1 {
                65535
            } else {
                to_u16_scale(first.value * density)
            },
            value: to_u16_scale(first.value),
            bits: first.bits,
        });
        for pair in dot_sizes.windows(2) {
            inks.push(InkDefn {
                range: to_u16_scale((pair[0].value + pair[1].value) / 2.0 * density),
                value: to_u16_scale(pair[1].value),
                bits: pair[1].bits,
            });
        }
        if dot_sizes.len() > 1 {
            inks.push(InkDefn {
                range: 65535,
                value: 65535,
                bits: last.bits,
            });
        }

        let segments: Vec<Segment> = inks.windows(2).map(|w| Segment::new(w[0], w[1])).collect();
        let bit_max = dot_sizes.iter().map(|d| d.bits).max().unwrap_or(0);
        let ranges = Self {
            segments,
            density: (density * 65535.0).round().min(u32::MAX as f64) as u32,
            bit_max,
            signif_bits: (u32::BITS - bit_max.leading_zeros()) as usize,
            maxdot: to_u16_scale(last.value),
        };
        tracing::debug!(
            channel,
            segments = ranges.segments.len(),
            bit_max,
            signif_bits = ranges.signif_bits,
            "Configured dither ranges"
        );
        Ok(ranges)
    }

    /// Segments from lightest to darkest.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Channel density on the 16-bit scale (65535 = 1.0).
    #[inline]
    pub fn density(&self) -> u32 {
        self.density
    }

    /// Largest bit pattern of any dot size.
    #[inline]
    pub fn bit_max(&self) -> u32 {
        self.bit_max
    }

    /// Number of bit planes needed to hold every dot pattern.
    #[inline]
    pub fn signif_bits(&self) -> usize {
        self.signif_bits
    }

    /// Darkness of the largest dot on the 16-bit scale.
    #[inline]
    pub fn maxdot(&self) -> u32 {
        self.maxdot
    }

    /// Bit pattern of the smallest dot.
    #[inline]
    pub(crate) fn first_dot_bits(&self) -> u32 {
        self.segments[0].upper.bits
    }

    /// Density-adjusted input level used by the ordered algorithms.
    #[inline]
    pub(crate) fn adjust(&self, raw: u16) -> u32 {
        ((raw as u64 * self.density as u64 / 65535).min(65535)) as u32
    }

    /// Segment whose ink values bracket `raw`.
    #[inline]
    pub(crate) fn segment_for_value(&self, raw: u32) -> &Segment {
        self.segments
            .iter()
            .rev()
            .find(|s| raw >= s.lower.value)
            .unwrap_or(&self.segments[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_dot_ladder() {
        let ranges = InkRanges::new(0, &[DotSize::new(1.0, 1)], 1.0).unwrap();
        assert_eq!(ranges.segments().len(), 1);
        let seg = ranges.segments()[0];
        assert_eq!(seg.lower, InkDefn::default());
        assert_eq!(
            seg.upper,
            InkDefn {
                range: 65535,
                value: 65535,
                bits: 1
            }
        );
        assert!(!seg.is_same_ink);
        assert_eq!(ranges.signif_bits(), 1);
        assert_eq!(ranges.maxdot(), 65535);
    }

    #[test]
    fn test_three_dot_ladder() {
        let dots = [DotSize::new(0.25, 1), DotSize::new(0.5, 2), DotSize::new(1.0, 3)];
        let ranges = InkRanges::new(0, &dots, 1.0).unwrap();
        let segs = ranges.segments();
        assert_eq!(segs.len(), 4);

        assert_eq!(segs[0].upper.range, 16383);
        assert_eq!(segs[1].upper.range, 24575);
        assert_eq!(segs[2].upper.range, 49151);
        assert_eq!(segs[3].upper.range, 65535);

        assert_eq!(segs[1].lower.bits, 1);
        assert_eq!(segs[1].upper.bits, 2);
        assert!(segs[3].is_same_ink);
        assert!(segs[3].is_equal);
        assert_eq!(ranges.bit_max(), 3);
        assert_eq!(ranges.signif_bits(), 2);
    }

    #[test]
    fn test_density_scales_ranges_not_values() {
        let dots = [DotSize::new(0.5, 1), DotSize::new(1.0, 2)];
        let ranges = InkRanges::new(0, &dots, 0.5).unwrap();
        let segs = ranges.segments();
        assert_eq!(segs[0].upper.range, 16383);
        assert_eq!(segs[0].upper.value, 32767);
        assert_eq!(ranges.density(), 32768);
        assert_eq!(ranges.adjust(65535), 32768);
    }

    #[test]
    fn test_rejects_bad_dot_sizes() {
        assert_eq!(InkRanges::new(3, &[], 1.0), Err(DitherError::NoDotSizes(3)));
        assert!(matches!(
            InkRanges::new(0, &[DotSize::new(0.5, 1), DotSize::new(0.5, 2)], 1.0),
            Err(DitherError::InvalidDotValue { index: 1, .. })
        ));
        assert_eq!(
            InkRanges::new(0, &[DotSize::new(1.0, 0)], 1.0),
            Err(DitherError::EmptyDotBits { channel: 0, index: 0 })
        );
        assert!(InkRanges::new(0, &[DotSize::default()], 0.0).is_err());
    }

    #[test]
    fn test_segment_for_value() {
        let dots = [DotSize::new(0.5, 1), DotSize::new(1.0, 2)];
        let ranges = InkRanges::new(0, &dots, 1.0).unwrap();
        assert_eq!(ranges.segment_for_value(0).upper.bits, 1);
        assert_eq!(ranges.segment_for_value(40000).lower.bits, 1);
        assert_eq!(ranges.segment_for_value(40000).upper.bits, 2);
        assert_eq!(ranges.segment_for_value(65535).upper.value, 65535);
    }
}
