#![allow(clippy::module_inception)]

//! ink-dither: ink channel splitting and halftoning for inkjet print heads
//!
//! This library turns continuous-tone ink intensities into the bit planes
//! an inkjet print head fires. It is driven one scanline at a time by a
//! printer backend.
//!
//! # Pipeline
//!
//! ```text
//! color-managed row ──▶ ChannelGroup ──▶ Ditherer ──▶ BitPlanes + RowEnds
//!  (one sample per       (split, density,   (very fast | fast |
//!   logical channel)      ink limit)          eventone)
//! ```
//!
//! 1. A [`ChannelGroup`] splits every logical channel (cyan, black, ...)
//!    across its physical subchannels (light and dark inks), scales each
//!    subchannel's density and enforces the total ink limit. It also
//!    reports a [`ZeroMask`] of subchannels that are blank for the row.
//! 2. A [`Ditherer`] quantizes each physical subchannel into dot sizes and
//!    writes them into per-subchannel [`BitPlanes`], tracking the first
//!    and last printed column in [`RowEnds`].
//!
//! # Quick Start
//!
//! ```
//! use ink_dither::{ChannelGroupBuilder, DitherAlgorithm, DitherBuilder, DitherMatrix};
//!
//! // Cyan with light and dark ink, plus black
//! let mut builder = ChannelGroupBuilder::new();
//! builder.add(0, 0, 1.0).unwrap();
//! builder.add(0, 1, 0.3).unwrap();
//! builder.add(1, 0, 1.0).unwrap();
//! let mut group = builder.initialize(8).unwrap();
//!
//! let mut ditherer = DitherBuilder::new(8, 8, group.total_channels())
//!     .algorithm(DitherAlgorithm::Eventone)
//!     .matrix(DitherMatrix::bayer(4).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let row: Vec<u16> = (0..8).flat_map(|x| [x * 8000, 0]).collect();
//! let mask = group.convert_row(&row).unwrap();
//! ditherer.dither(0, group.output(), false, mask).unwrap();
//!
//! // black never prints on a row without black
//! assert!(ditherer.outputs()[2].is_blank());
//! ```
//!
//! # Row Order
//!
//! Rows must be processed in strictly ascending order. The channel group
//! reuses its buffers in place and Eventone carries error and dot distance
//! state from one row to the next. Within a pixel, channels are processed
//! in registration order; Eventone's print decision depends on it.
//!
//! # Threshold Matrices
//!
//! Ordered decisions compare against a [`DitherMatrix`]: an iterated
//! (Bayer-like) matrix, or a threshold array supplied by the caller. Each
//! channel reads the matrix through its own phase-shifted [`MatrixView`].

pub mod api;
pub mod channel;
pub mod dither;
pub mod matrix;
pub mod output;
pub mod row;


pub use api::InkError;
pub use channel::{ChannelError, ChannelGroup, ChannelGroupBuilder, Subchannel};
pub use dither::{
    DitherAlgorithm, DitherBuilder, DitherError, Ditherer, Distance, DotSize, InkDefn, InkRanges, Segment,
};
pub use matrix::{DitherMatrix, MatrixError, MatrixView};
pub use output::{BitPlanes, ChannelOutput, RowEnds};
pub use row::{InkRow, RowError, ZeroMask, MAX_CHANNELS};
