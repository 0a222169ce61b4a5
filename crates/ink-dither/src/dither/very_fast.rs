//! Single-threshold ordered dither.
//!
//! Each sample is compared directly against its channel's matrix threshold
//! and prints the smallest dot when it reaches it. No state is carried
//! between rows.

use super::shared::{print_ink, DitherChannel, RowInput};
use super::DitherRow;
use crate::output::ChannelOutput;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct VeryFast;

impl DitherRow for VeryFast {
    fn dither_row(&mut self, row: &RowInput<'_>, channels: &mut [DitherChannel], outputs: &mut [ChannelOutput]) {
        if row.is_blank() {
            tracing::trace!(row = row.index, "Skipping blank row");
            return;
        }
        for (x, src_x) in row.columns() {
            let pixel = row.data.pixel(src_x);
            for (c, (channel, output)) in channels.iter_mut().zip(outputs.iter_mut()).enumerate() {
                if row.mask.is_zero(c) {
                    continue;
                }
                let raw = pixel[c] as u32;
                if raw != 0 && raw >= channel.dithermat.ditherpoint(x) {
                    print_ink(output, x, channel.ranges.first_dot_bits());
                }
            }
        }
    }
}
