//! Assertion helpers for tests.

use inkrip::RowOutput;
use pretty_assertions::assert_eq;

/// Assert that no subchannel printed anything and row ends are unset
pub fn assert_blank(output: &RowOutput<'_>) {
    for (c, channel) in output.channels().iter().enumerate() {
        assert!(
            channel.planes().is_blank(),
            "Row {} channel {} should be blank",
            output.row(),
            c
        );
        assert_eq!(channel.row_ends().span(), None, "Row ends of channel {}", c);
    }
}

/// Assert row ends match the bits actually set in the planes
pub fn assert_row_ends_consistent(output: &RowOutput<'_>) {
    for (c, channel) in output.channels().iter().enumerate() {
        let planes = channel.planes();
        let printed: Vec<usize> = (0..planes.width())
            .filter(|&x| planes.bits_at(x) != 0)
            .collect();
        let expected = printed.first().copied().zip(printed.last().copied());
        assert_eq!(
            channel.row_ends().span(),
            expected,
            "Row {} channel {} row ends disagree with planes",
            output.row(),
            c
        );
    }
}

/// Fraction of columns where `channel` printed any dot
pub fn coverage(output: &RowOutput<'_>, channel: usize) -> f64 {
    let planes = output.channels()[channel].planes();
    let printed = (0..planes.width()).filter(|&x| planes.bits_at(x) != 0).count();
    printed as f64 / planes.width() as f64
}
