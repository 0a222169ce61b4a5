//! Eventone: distance-aware error diffusion.
//!
//! Eventone is error diffusion with a spatial bias. Every channel keeps,
//! per column, an estimate of the squared distance to its nearest printed
//! dot. Pixels far from existing dots are pushed towards printing and
//! pixels right next to one are held back, which spreads isolated dots
//! evenly through highlights instead of letting them clump into worms.
//!
//! # Per-column step
//!
//! For each channel, in registration order:
//!
//! 1. Advance the horizontal distance estimate, or fall back to the stored
//!    distance of the previous row (aged by one row) if that is nearer.
//! 2. Locate the raw sample between the two nearest dot sizes and express
//!    it as a `range_point` in `0..=65536`.
//! 3. Fold in diffused error: `v += 2 * range_point + err`, then
//!    `inkspot = v - range_point`.
//! 4. Bias `inkspot` by the distance term and add it to the column's
//!    running `point_error`.
//! 5. If `point_error` reaches the comparison level the larger dot prints,
//!    the channel's distance resets and `v` is debited by a full step.
//! 6. The distance is persisted for the next row and `v` is diffused
//!    3:5:1 into the next row, keeping 7/16 for the next column.
//!
//! `point_error` carries between channels of one column, so a dot printed
//! by an earlier channel makes a later channel less likely to print at the
//! same pixel. Channel order is therefore part of the output.

use super::ranges::Segment;
use super::shared::{print_ink, DitherChannel, Direction, RowInput};
use super::DitherRow;
use crate::output::ChannelOutput;

/// Weight of the inverse-density term.
const EVEN_C1: i64 = 256;
/// `256 * sqrt(3) / 2`, scale of the distance term.
const EVEN_C2: i64 = 221;

/// Largest value a distance component may reach.
const DISTANCE_MAX: i32 = 65535;

/// Consecutive blank rows after which error state is dropped.
const BLANK_ROW_LIMIT: u32 = 4;

/// Squared distance to the nearest printed dot, with the increments that
/// grow it by one more column or row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Distance {
    /// Increment of `r_sq` for the next column.
    pub dx2: i32,
    /// Increment of `r_sq` for the next row.
    pub dy2: i32,
    /// Squared distance, saturating at 65535.
    pub r_sq: i32,
}

impl Distance {
    /// The distance as seen one row further down.
    #[inline]
    fn aged(self, d2y: i32) -> Self {
        Self {
            r_sq: (self.r_sq + self.dy2).min(DISTANCE_MAX),
            dy2: (self.dy2 + d2y).min(DISTANCE_MAX),
            dx2: self.dx2,
        }
    }

    /// A distance with no dot in sight.
    #[inline]
    fn far(reset: Self) -> Self {
        Self {
            r_sq: DISTANCE_MAX,
            ..reset
        }
    }
}

/// Two-row error accumulator: row 0 is read while dithering the current
/// row, row 1 collects error for the row below.
#[derive(Debug, Clone)]
struct ErrorBuffer {
    rows: Vec<Vec<i32>>,
    width: usize,
}

impl ErrorBuffer {
    fn new(width: usize) -> Self {
        Self {
            rows: vec![vec![0; width]; 2],
            width,
        }
    }

    #[inline]
    fn get_accumulated(&self, x: usize) -> i32 {
        self.rows[0][x]
    }

    /// Add error below column `x`; out-of-bounds columns are ignored.
    #[inline]
    fn add_error(&mut self, x: isize, error: i32) {
        if x >= 0 && (x as usize) < self.width {
            self.rows[1][x as usize] += error;
        }
    }

    fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        self.rows[1].fill(0);
    }

    fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(0);
        }
    }
}

/// Per-channel Eventone state.
#[derive(Debug, Clone)]
struct ChannelState {
    /// Working error value, reset every row.
    v: i32,
    errs: ErrorBuffer,
    /// Distance persisted per column for the next row.
    stored: Vec<Distance>,
    /// Running distance along the current row.
    dis: Distance,
}

/// Constants of one Eventone job.
#[derive(Debug, Clone, Copy)]
struct Params {
    hybrid: bool,
    aspect: i64,
    reset: Distance,
    d2x: i32,
    d2y: i32,
}

#[derive(Debug, Clone)]
pub(crate) struct Eventone {
    params: Params,
    blank_rows: u32,
    channels: Vec<ChannelState>,
}

impl Eventone {
    /// Eventone for `channels` channels over `width` output columns at
    /// printer resolution `x_aspect` by `y_aspect`.
    pub(crate) fn new(width: usize, channels: usize, x_aspect: u32, y_aspect: u32, hybrid: bool) -> Self {
        let xa = (x_aspect / y_aspect).max(1) as i32;
        let ya = (y_aspect / x_aspect).max(1) as i32;
        let reset = Distance {
            dx2: xa * xa,
            dy2: ya * ya,
            r_sq: 0,
        };
        let params = Params {
            hybrid,
            aspect: EVEN_C2 / (xa as i64 * ya as i64),
            reset,
            d2x: 2 * reset.dx2,
            d2y: 2 * reset.dy2,
        };
        tracing::debug!(width, channels, xa, ya, aspect = params.aspect, hybrid, "Initialized eventone");
        Self {
            params,
            blank_rows: 0,
            channels: (0..channels)
                .map(|_| ChannelState {
                    v: 0,
                    errs: ErrorBuffer::new(width),
                    stored: vec![Distance::far(reset); width],
                    dis: Distance::far(reset),
                })
                .collect(),
        }
    }

    /// Distance value written at a column where the larger dot printed.
    pub(crate) fn reset_distance(&self) -> Distance {
        self.params.reset
    }

    /// Distance persisted for `channel` at column `x`.
    pub(crate) fn stored_distance(&self, channel: usize, x: usize) -> Option<Distance> {
        self.channels.get(channel)?.stored.get(x).copied()
    }

    /// Track runs of blank rows. Returns `true` when the row can be skipped.
    fn skip_blank(&mut self, row: &RowInput<'_>) -> bool {
        let blank = row.is_blank();
        if !row.duplicate {
            self.blank_rows = if blank { self.blank_rows.saturating_add(1) } else { 0 };
        } else if self.blank_rows > 0 {
            self.blank_rows = self.blank_rows.saturating_add(1);
        }
        if self.blank_rows < BLANK_ROW_LIMIT {
            return false;
        }
        if self.blank_rows == BLANK_ROW_LIMIT {
            tracing::trace!(row = row.index, "Dropping eventone state after blank rows");
            let far = Distance::far(self.params.reset);
            for state in &mut self.channels {
                state.errs.clear();
                state.stored.fill(far);
            }
        }
        true
    }
}

/// Bias `inkspot` by the distance to the nearest dot.
///
/// Far from any dot the distance term dominates and the result saturates
/// towards printing; close to a dot the inverse-density term holds it back.
#[inline]
fn adjust(inkspot: i64, desired: i64, r_sq: i32, aspect: i64) -> i64 {
    if inkspot <= 0 {
        0
    } else if inkspot >= 65535 {
        65535
    } else if desired == 0 {
        0
    } else {
        (inkspot + r_sq as i64 * aspect - EVEN_C1 * 65535 / desired).clamp(0, 65535)
    }
}

/// Position of `raw` between the segment's two dot values, on 0..=65536.
#[inline]
fn range_point(segment: &Segment, raw: u32) -> i64 {
    if segment.value_span == 0 || raw >= segment.upper.value {
        return 65536;
    }
    (raw - segment.lower.value) as i64 * 65536 / segment.value_span as i64
}

/// Dither one channel at column `x` and return the updated `point_error`.
#[allow(clippy::too_many_arguments)]
#[inline]
fn dither_channel(
    params: &Params,
    direction: Direction,
    x: usize,
    raw: u16,
    channel: &mut DitherChannel,
    state: &mut ChannelState,
    output: &mut ChannelOutput,
    mut point_error: i64,
) -> i64 {
    let vertical = state.stored[x].aged(params.d2y);
    let horizontal = state.dis.r_sq + state.dis.dx2;
    if horizontal <= vertical.r_sq {
        state.dis.r_sq = horizontal.min(DISTANCE_MAX);
        state.dis.dx2 = (state.dis.dx2 + params.d2x).min(DISTANCE_MAX);
    } else {
        state.dis = vertical;
    }

    let segment = *channel.ranges.segment_for_value(raw as u32);
    let range_point = range_point(&segment, raw as u32);

    let mut v = state.v as i64 + 2 * range_point + state.errs.get_accumulated(x) as i64;
    let inkspot = v - range_point;
    point_error += adjust(inkspot, range_point, state.dis.r_sq, params.aspect);

    let comparison = if params.hybrid {
        32768 + channel.dithermat.ditherpoint(x) as i64 / 16 - 2048
    } else {
        32768
    };

    // A zero sample never prints, whatever earlier channels left in
    // `point_error`; the hybrid threshold can dip below that carry.
    let ink = if raw != 0 && point_error >= comparison {
        point_error -= 65536;
        v -= 131070;
        state.dis = params.reset;
        segment.upper
    } else {
        segment.lower
    };
    print_ink(output, x, ink.bits);
    state.stored[x] = state.dis;

    let share = (v + 8) >> 4;
    let step = direction.step();
    let col = x as isize;
    state.errs.add_error(col - step, (3 * share) as i32);
    state.errs.add_error(col, (5 * share) as i32);
    state.errs.add_error(col + step, share as i32);
    state.v = (v - 9 * share) as i32;

    point_error
}

impl DitherRow for Eventone {
    fn dither_row(&mut self, row: &RowInput<'_>, channels: &mut [DitherChannel], outputs: &mut [ChannelOutput]) {
        if self.skip_blank(row) {
            return;
        }
        let params = self.params;
        for state in &mut self.channels {
            state.errs.advance_row();
            state.v = 0;
            state.dis = Distance::far(params.reset);
        }

        let direction = row.direction();
        for (x, src_x) in row.columns() {
            let pixel = row.data.pixel(src_x);
            channels
                .iter_mut()
                .zip(self.channels.iter_mut())
                .zip(outputs.iter_mut())
                .enumerate()
                .fold(0i64, |point_error, (c, ((channel, state), output))| {
                    dither_channel(&params, direction, x, pixel[c], channel, state, output, point_error)
                });
        }
    }
}
