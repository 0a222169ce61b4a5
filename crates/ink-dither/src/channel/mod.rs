//! Ink channel management.
//!
//! Upstream color management hands over one 16-bit intensity per logical
//! ink channel (cyan, magenta, ...). Printers often carry several physical
//! inks per logical channel, for example light and dark cyan. The
//! [`ChannelGroup`] splits each logical intensity across its physical
//! subchannels, applies per-subchannel density scaling and enforces the
//! total ink limit, producing one 16-bit intensity per physical subchannel
//! for the dither engine.
//!
//! # Lifecycle
//!
//! ```
//! use ink_dither::ChannelGroupBuilder;
//!
//! let mut builder = ChannelGroupBuilder::new();
//! builder.add(0, 0, 1.0).unwrap();   // dark cyan
//! builder.add(0, 1, 0.3).unwrap();   // light cyan
//! builder.add(1, 0, 1.0).unwrap();   // black
//! builder.set_ink_limit(98304);
//!
//! let mut group = builder.initialize(4).unwrap();
//! let mask = group.convert_row(&[0, 0, 20000, 0, 65535, 0, 0, 0]).unwrap();
//!
//! assert_eq!(group.output().channels(), 3);
//! assert!(mask.is_zero(2));
//! ```

mod error;
mod group;
mod lut;

pub use error::ChannelError;
pub use group::{ChannelGroup, ChannelGroupBuilder, Subchannel};
