//! Error type for dither engine setup and row input.

use thiserror::Error;

use crate::matrix::MatrixError;
use crate::row::MAX_CHANNELS;

/// Error returned when building a [`Ditherer`](super::Ditherer) or feeding
/// it a row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DitherError {
    /// Source and destination widths must be non-zero
    #[error("invalid widths: source {src}, destination {dst}")]
    ZeroWidth {
        /// Source (input) width
        src: usize,
        /// Destination (output) width
        dst: usize,
    },
    /// Channel count must be between 1 and the zero mask width
    #[error("invalid channel count {0} (1..={MAX_CHANNELS})")]
    ChannelCount(usize),
    /// Dot sizes configured for a channel that does not exist
    #[error("channel {channel} out of range ({count} channels)")]
    UnknownChannel {
        /// Requested channel
        channel: usize,
        /// Configured channel count
        count: usize,
    },
    /// A channel needs at least one dot size
    #[error("channel {0} has no dot sizes")]
    NoDotSizes(usize),
    /// Dot values must lie in `(0, 1]` and increase strictly
    #[error("channel {channel} dot size {index}: invalid value {value}")]
    InvalidDotValue {
        /// Channel
        channel: usize,
        /// Position in the dot size list
        index: usize,
        /// Offending value
        value: f64,
    },
    /// Dot bit patterns must be non-zero
    #[error("channel {channel} dot size {index} has an empty bit pattern")]
    EmptyDotBits {
        /// Channel
        channel: usize,
        /// Position in the dot size list
        index: usize,
    },
    /// Channel density must be finite and positive
    #[error("channel {channel}: invalid density {value}")]
    InvalidDensity {
        /// Channel
        channel: usize,
        /// Offending value
        value: f64,
    },
    /// Aspect ratio components must be non-zero
    #[error("invalid aspect ratio {x}:{y}")]
    InvalidAspect {
        /// Horizontal resolution
        x: u32,
        /// Vertical resolution
        y: u32,
    },
    /// Matrix construction or transformation failed
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    /// Row does not match the configured geometry
    #[error("row has {width} pixels of {channels} channels, expected {expected_width} of {expected_channels}")]
    RowShape {
        /// Pixels supplied
        width: usize,
        /// Channels supplied
        channels: usize,
        /// Configured source width
        expected_width: usize,
        /// Configured channel count
        expected_channels: usize,
    },
    /// Rows must be dithered in strictly ascending order
    #[error("row {row} submitted after row {last}")]
    RowOrder {
        /// Submitted row
        row: usize,
        /// Last processed row
        last: usize,
    },
}
