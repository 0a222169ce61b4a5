//! Inkrip: scanline rasterization jobs for inkjet printer drivers.
//!
//! A [`RasterJob`] ties the two halves of the [`ink_dither`] engine
//! together for one page: every color-managed row is split into physical
//! inks and ink-limited by a channel group, then halftoned into bit planes
//! by the configured algorithm. Jobs are described by a YAML
//! [`JobConfig`].
//!
//! ```
//! use inkrip::{JobConfig, RasterJob};
//!
//! let config = JobConfig::from_yaml_str(
//!     "src_width: 4\ndst_width: 8\nchannels:\n  - subchannels: [{ value: 1.0 }]\n",
//! )
//! .unwrap();
//! let mut job = RasterJob::new(&config).unwrap();
//!
//! let output = job.process_row(&[65535, 65535, 0, 0]).unwrap();
//! assert_eq!(output.channel(0).unwrap().row_ends().span(), Some((0, 3)));
//! ```

pub mod config;
pub mod error;
pub mod job;
pub mod logging;

pub use config::JobConfig;
pub use error::JobError;
pub use job::{RasterJob, RowOutput};
