//! Error type for channel configuration.

use thiserror::Error;

use crate::row::MAX_CHANNELS;

/// Error returned for invalid channel group configuration or input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChannelError {
    /// Subchannel values must be finite and positive
    #[error("channel {channel} subchannel {subchannel}: invalid ink value {value}")]
    InvalidValue {
        /// Logical channel
        channel: usize,
        /// Subchannel within the channel
        subchannel: usize,
        /// Offending value
        value: f64,
    },
    /// Density and cutoff adjustments must be finite and non-negative
    #[error("channel {channel} subchannel {subchannel}: invalid adjustment {value}")]
    InvalidAdjustment {
        /// Logical channel
        channel: usize,
        /// Subchannel within the channel
        subchannel: usize,
        /// Offending value
        value: f64,
    },
    /// Adjustment targets a subchannel that was never registered
    #[error("channel {channel} subchannel {subchannel} is not registered")]
    UnknownSubchannel {
        /// Logical channel
        channel: usize,
        /// Subchannel within the channel
        subchannel: usize,
    },
    /// A registered subchannel slot was left without an ink value
    #[error("channel {channel} subchannel {subchannel} has no ink value")]
    MissingValue {
        /// Logical channel
        channel: usize,
        /// Subchannel within the channel
        subchannel: usize,
    },
    /// Black channel index is outside the registered channels
    #[error("black channel {channel} out of range ({count} channels)")]
    BlackChannelOutOfRange {
        /// Requested black channel
        channel: usize,
        /// Number of logical channels
        count: usize,
    },
    /// No channels were registered before initialization
    #[error("no channels registered")]
    NoChannels,
    /// More physical subchannels than a zero mask can describe
    #[error("{0} physical channels exceed the maximum of {MAX_CHANNELS}")]
    TooManyChannels(usize),
    /// Image width must be non-zero
    #[error("image width must be non-zero")]
    ZeroWidth,
    /// Input row does not match the initialized geometry
    #[error("input row has {actual} samples, expected {expected}")]
    RowLength {
        /// `width * input_channels`
        expected: usize,
        /// Samples supplied
        actual: usize,
    },
}
