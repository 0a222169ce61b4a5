//! Per-job pipeline: channel group followed by the ditherer.

use crate::config::JobConfig;
use crate::error::JobError;
use ink_dither::{
    ChannelGroup, ChannelGroupBuilder, ChannelOutput, DitherBuilder, DotSize, Ditherer,
};

/// One rasterization job.
///
/// Rows are fed in order with [`process_row`](Self::process_row); each call
/// returns the bit planes and row ends of every physical subchannel for that
/// row, borrowed until the next call.
pub struct RasterJob {
    group: ChannelGroup,
    ditherer: Ditherer,
    previous: Vec<u16>,
    rows: usize,
}

/// Dithered output of one row.
#[derive(Debug, Clone, Copy)]
pub struct RowOutput<'a> {
    row: usize,
    duplicate: bool,
    channels: &'a [ChannelOutput],
}

impl<'a> RowOutput<'a> {
    /// Index of the row within the job.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Whether the input was identical to the previous row.
    pub fn duplicate(&self) -> bool {
        self.duplicate
    }

    /// Outputs of all physical subchannels, in registration order.
    pub fn channels(&self) -> &'a [ChannelOutput] {
        self.channels
    }

    /// Output of one physical subchannel.
    pub fn channel(&self, index: usize) -> Option<&'a ChannelOutput> {
        self.channels.get(index)
    }

    /// Whether no subchannel printed anything.
    pub fn is_blank(&self) -> bool {
        self.channels.iter().all(ChannelOutput::is_blank)
    }
}

impl RasterJob {
    /// Set up the channel group and ditherer described by `config`.
    pub fn new(config: &JobConfig) -> Result<Self, JobError> {
        config.validate()?;

        let mut builder = ChannelGroupBuilder::new();
        for (c, channel) in config.channels.iter().enumerate() {
            for (s, sub) in channel.subchannels.iter().enumerate() {
                builder.add(c, s, sub.value)?;
                builder.set_density_adjustment(c, s, sub.density)?;
                builder.set_cutoff_adjustment(c, s, sub.cutoff)?;
            }
            tracing::debug!(
                channel = c,
                name = channel.name.as_deref().unwrap_or("unnamed"),
                subchannels = channel.subchannels.len(),
                dot_sizes = channel.dot_sizes.len(),
                "Registered channel"
            );
        }
        builder.set_ink_limit(config.ink_limit);
        if let Some(black) = config.black_channel {
            builder.set_black_channel(black);
        }
        let group = builder.initialize(config.src_width)?;

        let mut matrix = config.matrix.build()?;
        if config.shear.x != 0 || config.shear.y != 0 {
            matrix = matrix.shear(config.shear.x, config.shear.y);
        }

        let mut dither = DitherBuilder::new(config.src_width, config.dst_width, group.total_channels())
            .algorithm(config.algorithm.into())
            .matrix(matrix)
            .transition(config.transition)
            .aspect(config.aspect.x, config.aspect.y);
        for (c, channel) in config.channels.iter().enumerate() {
            let dots: Vec<DotSize> = channel.dot_sizes.iter().copied().map(DotSize::from).collect();
            for s in 0..channel.subchannels.len() {
                if let Some(physical) = group.physical_index(c, s) {
                    dither = dither.inks(physical, &dots, channel.density);
                }
            }
        }
        let ditherer = dither.build()?;

        tracing::info!(
            src_width = config.src_width,
            dst_width = config.dst_width,
            channels = group.input_channels(),
            subchannels = group.total_channels(),
            algorithm = ?config.algorithm,
            ink_limit = config.ink_limit,
            "Created raster job"
        );

        Ok(Self {
            group,
            ditherer,
            previous: Vec::new(),
            rows: 0,
        })
    }

    /// Separate and dither the next row.
    ///
    /// `row` holds `src_width` pixels of one sample per logical channel.
    pub fn process_row(&mut self, row: &[u16]) -> Result<RowOutput<'_>, JobError> {
        let index = self.rows;
        let _span = tracing::debug_span!("row", index).entered();

        let duplicate = index > 0 && self.previous == row;
        let mask = self.group.convert_row(row)?;
        self.ditherer.dither(index, self.group.output(), duplicate, mask)?;

        if !duplicate {
            self.previous.clear();
            self.previous.extend_from_slice(row);
        }
        self.rows += 1;
        tracing::trace!(duplicate, blank_mask = mask.bits(), "Row processed");

        Ok(RowOutput {
            row: index,
            duplicate,
            channels: self.ditherer.outputs(),
        })
    }

    /// Number of rows processed so far.
    pub fn rows_processed(&self) -> usize {
        self.rows
    }

    /// Number of logical input channels.
    pub fn input_channels(&self) -> usize {
        self.group.input_channels()
    }

    /// Number of physical subchannels (one output per subchannel).
    pub fn total_channels(&self) -> usize {
        self.group.total_channels()
    }

    /// Output index of `subchannel` of logical `channel`.
    pub fn physical_index(&self, channel: usize, subchannel: usize) -> Option<usize> {
        self.group.physical_index(channel, subchannel)
    }

    /// Width of the dithered rows.
    pub fn dst_width(&self) -> usize {
        self.ditherer.dst_width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn two_channel_config() -> JobConfig {
        JobConfig::from_yaml_str(
            r#"
src_width: 8
dst_width: 8
channels:
  - subchannels: [{ value: 1.0 }, { value: 0.3 }]
  - subchannels: [{ value: 1.0 }]
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_geometry() {
        let job = RasterJob::new(&two_channel_config()).unwrap();
        assert_eq!(job.input_channels(), 2);
        assert_eq!(job.total_channels(), 3);
        assert_eq!(job.physical_index(1, 0), Some(2));
        assert_eq!(job.rows_processed(), 0);
    }

    #[test]
    fn test_duplicate_detection() {
        let mut job = RasterJob::new(&two_channel_config()).unwrap();
        let row = vec![20000u16; 16];
        assert!(!job.process_row(&row).unwrap().duplicate());
        assert!(job.process_row(&row).unwrap().duplicate());
        let other = vec![0u16; 16];
        let output = job.process_row(&other).unwrap();
        assert!(!output.duplicate());
        assert!(output.is_blank());
        assert_eq!(output.row(), 2);
        assert_eq!(job.rows_processed(), 3);
    }

    #[test]
    fn test_row_length_error() {
        let mut job = RasterJob::new(&two_channel_config()).unwrap();
        let err = job.process_row(&[0u16; 3]).err().unwrap();
        assert!(matches!(err, JobError::Ink(_)));
        assert_eq!(job.rows_processed(), 0);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_channel_names_logged() {
        let config = JobConfig::from_yaml_str(
            r#"
src_width: 4
dst_width: 4
channels:
  - name: cyan
    subchannels: [{ value: 1.0 }]
  - subchannels: [{ value: 1.0 }]
"#,
        )
        .unwrap();

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || RasterJob::new(&config).unwrap());

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let registered: Vec<&str> = output.lines().filter(|l| l.contains("Registered channel")).collect();
        assert_eq!(registered.len(), 2);
        assert!(registered[0].contains("cyan"), "{}", registered[0]);
        assert!(registered[1].contains("unnamed"), "{}", registered[1]);
    }
}
