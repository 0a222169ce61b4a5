//! Error type for matrix construction.

use thiserror::Error;

/// Error returned when a dither matrix cannot be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    /// Matrix dimensions must be non-zero
    #[error("matrix dimensions must be non-zero (got {x_size}x{y_size})")]
    EmptyDimensions {
        /// Requested width
        x_size: usize,
        /// Requested height
        y_size: usize,
    },
    /// Iterated matrices need a base of at least 2 and an exponent of at least 1
    #[error("invalid iterated matrix base {base} with exponent {exponent}")]
    InvalidIteration {
        /// Seed edge length
        base: usize,
        /// Number of iterations
        exponent: u32,
    },
    /// `base^exponent` does not fit in memory
    #[error("matrix of base {base} and exponent {exponent} is too large")]
    TooLarge {
        /// Seed edge length
        base: usize,
        /// Number of iterations
        exponent: u32,
    },
    /// Supplied array length does not match the dimensions
    #[error("expected {expected} matrix values, got {actual}")]
    LengthMismatch {
        /// `x_size * y_size`
        expected: usize,
        /// Number of values supplied
        actual: usize,
    },
    /// A seed or rank value is not a valid cell index
    #[error("matrix value {value} at index {index} exceeds maximum {max}")]
    ValueOutOfRange {
        /// Position in the supplied array
        index: usize,
        /// Offending value
        value: u32,
        /// Largest permitted value
        max: u32,
    },
    /// A curve value is not a finite threshold in `0..=65535`
    #[error("curve value {value} at index {index} is outside 0..=65535")]
    InvalidCurveValue {
        /// Position in the supplied array
        index: usize,
        /// Offending value
        value: f64,
    },
    /// The exponent for exponential scaling must be finite and positive
    #[error("invalid scaling exponent {0}")]
    InvalidExponent(f64),
}
