//! Public API glue for the ink-dither crate.
//!
//! This module provides [`InkError`], the unified error type over every
//! stage of the pipeline.

mod error;

pub use error::InkError;
