//! Unified error type for the ink-dither public API.
//!
//! [`InkError`] wraps all error types from the crate into a single enum
//! for convenient `?` propagation in application code.

use thiserror::Error;

use crate::channel::ChannelError;
use crate::dither::DitherError;
use crate::matrix::MatrixError;
use crate::row::RowError;

/// Unified error type for the ink-dither public API.
///
/// # Example
///
/// ```
/// use ink_dither::{ChannelGroupBuilder, DitherMatrix, InkError};
///
/// fn setup() -> Result<(), InkError> {
///     let mut builder = ChannelGroupBuilder::new();
///     builder.add(0, 0, 1.0)?;
///     let _group = builder.initialize(100)?;
///     let _matrix = DitherMatrix::bayer(3)?;
///     Ok(())
/// }
///
/// assert!(setup().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InkError {
    /// Channel group configuration or input error
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),
    /// Matrix construction error
    #[error("matrix error: {0}")]
    Matrix(#[from] MatrixError),
    /// Dither engine configuration or input error
    #[error("dither error: {0}")]
    Dither(#[from] DitherError),
    /// Malformed row buffer
    #[error("row error: {0}")]
    Row(#[from] RowError),
}
