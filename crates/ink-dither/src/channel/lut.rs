//! Light/dark ink split tables.

use super::Subchannel;

/// Number of distinct 16-bit input levels.
const LEVELS: usize = 65536;

/// Direct-indexed table distributing every input level across the
/// subchannels of one logical channel.
///
/// Entries for a level are stored in subchannel registration order. With
/// subchannels sorted lightest to darkest (`v0 < v1 < ...`):
///
/// - below `v0 * cutoff0` only the lightest ink prints, at `level / v0`;
/// - between adjacent inks `k` and `k + 1` the hand-off band ends at
///   `v(k+1) * sqrt(cutoff_k * cutoff_(k+1))`; inside it both inks print,
///   the lighter one fading linearly as the darker one takes over;
/// - above the last breakpoint only the darkest ink prints.
///
/// Every entry satisfies `sum(entry_k * v_k) ≈ level`, so the split
/// reproduces the requested darkness.
#[derive(Debug, Clone)]
pub(crate) struct SplitLut {
    subchannels: usize,
    table: Vec<u16>,
    max_total: u32,
}

#[inline]
fn to_level(amount: f64) -> u16 {
    amount.round().clamp(0.0, 65535.0) as u16
}

#[inline]
fn breakpoint(scale: f64) -> usize {
    ((scale * 65535.0) as usize).min(LEVELS - 1)
}

impl SplitLut {
    pub(crate) fn build(subchannels: &[Subchannel]) -> Self {
        let n = subchannels.len();
        debug_assert!(n > 1, "split tables are only built for multi-ink channels");

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| subchannels[a].value.total_cmp(&subchannels[b].value));
        let value = |k: usize| subchannels[order[k]].value;
        let cutoff = |k: usize| subchannels[order[k]].cutoff;

        let mut table = vec![0u16; LEVELS * n];
        let mut level = 0usize;

        let mut start = breakpoint(value(0) * cutoff(0));
        while level <= start {
            table[level * n + order[0]] = to_level(level as f64 / value(0));
            level += 1;
        }

        for k in 0..n - 1 {
            let end = breakpoint(value(k + 1) * (cutoff(k) * cutoff(k + 1)).sqrt());
            if end <= start {
                // band collapses: darker ink starts where the lighter one stopped
                continue;
            }
            let span = (end - start) as f64;
            while level <= end {
                let position = (level - start) as f64 / span;
                let lighter = start as f64 * (1.0 - position);
                let entry = &mut table[level * n..(level + 1) * n];
                entry[order[k]] = to_level(lighter / value(k));
                entry[order[k + 1]] = to_level((level as f64 - lighter) / value(k + 1));
                level += 1;
            }
            start = end;
        }

        while level < LEVELS {
            table[level * n + order[n - 1]] = to_level(level as f64 / value(n - 1));
            level += 1;
        }

        let max_total = table
            .chunks_exact(n)
            .map(|entry| entry.iter().map(|&v| v as u32).sum::<u32>())
            .max()
            .unwrap_or(0);

        tracing::debug!(subchannels = n, max_total, "Built ink split table");
        Self {
            subchannels: n,
            table,
            max_total,
        }
    }

    /// Per-subchannel allocation for an input level, in registration order.
    #[inline]
    pub(crate) fn split(&self, level: u16) -> &[u16] {
        let start = level as usize * self.subchannels;
        &self.table[start..start + self.subchannels]
    }

    /// Largest total ink the table ever allocates for one pixel.
    #[inline]
    pub(crate) fn max_total(&self) -> u32 {
        self.max_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(value: f64) -> Subchannel {
        Subchannel {
            value,
            ..Subchannel::default()
        }
    }

    /// Registration order: dark first, light second.
    fn dark_light() -> SplitLut {
        SplitLut::build(&[sub(1.0), sub(0.3)])
    }

    #[test]
    fn test_light_only_below_first_breakpoint() {
        let lut = dark_light();
        let split = lut.split(10000);
        assert_eq!(split[0], 0, "dark ink must not print in highlights");
        assert_eq!(split[1], 33333);
        assert_eq!(lut.split(0), &[0, 0]);
    }

    #[test]
    fn test_dark_only_above_last_breakpoint() {
        let lut = dark_light();
        assert_eq!(lut.split(60000), &[60000, 0]);
        assert_eq!(lut.split(65535), &[65535, 0]);
    }

    #[test]
    fn test_overlap_band_has_both_inks() {
        let lut = dark_light();
        // band runs from 0.3*0.75 to 1.0*0.75 of full scale
        let split = lut.split(30000);
        assert!(split[0] > 0 && split[1] > 0, "got {:?}", split);
    }

    #[test]
    fn test_round_trip_reconstructs_input() {
        let subs = [sub(1.0), sub(0.3)];
        let lut = SplitLut::build(&subs);
        for level in (0..=65535u32).step_by(7) {
            let split = lut.split(level as u16);
            let rebuilt: f64 = split
                .iter()
                .zip(subs.iter())
                .map(|(&amount, s)| amount as f64 * s.value)
                .sum();
            assert!(
                (rebuilt - level as f64).abs() <= 1.0,
                "level {} rebuilt as {}",
                level,
                rebuilt
            );
        }
    }

    #[test]
    fn test_three_inks_round_trip() {
        let subs = [sub(0.5), sub(1.0), sub(0.15)];
        let lut = SplitLut::build(&subs);
        for level in (0..=65535u32).step_by(13) {
            let split = lut.split(level as u16);
            let active = split.iter().filter(|&&v| v > 0).count();
            assert!(active <= 2, "level {} uses {} inks", level, active);
            let rebuilt: f64 = split
                .iter()
                .zip(subs.iter())
                .map(|(&amount, s)| amount as f64 * s.value)
                .sum();
            assert!((rebuilt - level as f64).abs() <= 1.5);
        }
    }

    #[test]
    fn test_max_total_covers_overlap() {
        let lut = dark_light();
        assert!(lut.max_total() >= 65535);
    }
}
