//! Dither threshold matrices.
//!
//! A [`DitherMatrix`] owns a flattened table of thresholds in `0..=65535`.
//! Channels never read the matrix directly: each takes a phase-shifted
//! [`MatrixView`] so that channels sharing one base matrix stay
//! decorrelated. Views share the parent buffer through an `Arc`, so a view
//! can never outlive the thresholds it reads.

mod error;
mod matrix;
mod view;

pub use error::MatrixError;
pub use matrix::DitherMatrix;
pub use view::MatrixView;
