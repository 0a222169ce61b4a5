//! Multi-level ordered dither.
//!
//! The density-adjusted sample is located on the channel's ink ladder,
//! searching from the darkest segment down. Within the segment the sample's
//! relative position is compared against a matrix threshold to choose the
//! lighter or the darker ink. The "no dot" to "smallest dot" step uses the
//! channel's dither matrix; steps between two dot sizes use the transition
//! matrix.

use super::ranges::Segment;
use super::shared::{print_ink, DitherChannel, RowInput};
use super::DitherRow;
use crate::matrix::MatrixView;
use crate::output::ChannelOutput;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Fast;

/// Position of `level` inside `segment`, on a 0..=65535 scale.
#[inline]
fn range_point(segment: &Segment, level: u32) -> u32 {
    if segment.range_span == 0 {
        return 65535;
    }
    let offset = (level - segment.lower.range) as u64;
    (offset * 65535 / segment.range_span as u64).min(65535) as u32
}

/// Bits of the ink chosen for a density-adjusted `level`, or `None` when the
/// level is below every segment.
#[inline]
fn choose(
    segments: &[Segment],
    level: u32,
    x: usize,
    dithermat: &mut MatrixView,
    pick: &mut MatrixView,
) -> Option<u32> {
    let segment = segments.iter().rev().find(|s| level > s.lower.range)?;
    if segment.is_same_ink || segment.is_equal {
        return Some(segment.upper.bits);
    }
    let threshold = if segment.lower.bits == 0 {
        dithermat.ditherpoint(x)
    } else {
        pick.ditherpoint(x)
    };
    if range_point(segment, level) >= threshold {
        Some(segment.upper.bits)
    } else {
        Some(segment.lower.bits)
    }
}

impl DitherRow for Fast {
    fn dither_row(&mut self, row: &RowInput<'_>, channels: &mut [DitherChannel], outputs: &mut [ChannelOutput]) {
        if row.is_blank() {
            tracing::trace!(row = row.index, "Skipping blank row");
            return;
        }
        for (x, src_x) in row.columns() {
            let pixel = row.data.pixel(src_x);
            for (c, (channel, output)) in channels.iter_mut().zip(outputs.iter_mut()).enumerate() {
                if row.mask.is_zero(c) || pixel[c] == 0 {
                    continue;
                }
                let level = channel.ranges.adjust(pixel[c]);
                let DitherChannel {
                    ranges,
                    dithermat,
                    pick,
                } = channel;
                if let Some(bits) = choose(ranges.segments(), level, x, dithermat, pick) {
                    print_ink(output, x, bits);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dither::{DotSize, InkRanges};
    use crate::matrix::DitherMatrix;

    fn flat_views(threshold: u32) -> (MatrixView, MatrixView) {
        let m = DitherMatrix::from_array(1, 1, &[threshold], false, true).unwrap();
        let mut a = m.view(0, 0);
        let mut b = m.view(0, 0);
        a.set_row(0);
        b.set_row(0);
        (a, b)
    }

    #[test]
    fn test_range_point_scale() {
        let ranges = InkRanges::new(0, &[DotSize::default()], 1.0).unwrap();
        let seg = &ranges.segments()[0];
        assert_eq!(range_point(seg, 65535), 65535);
        assert_eq!(range_point(seg, 32768), 32768);
    }

    #[test]
    fn test_threshold_picks_between_none_and_dot() {
        let ranges = InkRanges::new(0, &[DotSize::default()], 1.0).unwrap();
        let (mut d, mut p) = flat_views(30000);
        assert_eq!(choose(ranges.segments(), 29999, 0, &mut d, &mut p), Some(0));
        assert_eq!(choose(ranges.segments(), 30000, 0, &mut d, &mut p), Some(1));
        assert_eq!(choose(ranges.segments(), 0, 0, &mut d, &mut p), None);
    }

    #[test]
    fn test_largest_segment_is_solid() {
        let dots = [DotSize::new(0.5, 1), DotSize::new(1.0, 2)];
        let ranges = InkRanges::new(0, &dots, 1.0).unwrap();
        let (mut d, mut p) = flat_views(65535);
        // above the midpoint of the two dots only the big dot prints
        assert_eq!(choose(ranges.segments(), 60000, 0, &mut d, &mut p), Some(2));
        // between the small dot and the midpoint the threshold decides
        assert_eq!(choose(ranges.segments(), 40000, 0, &mut d, &mut p), Some(1));
    }
}
