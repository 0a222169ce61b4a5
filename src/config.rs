use crate::error::JobError;
use ink_dither::{DitherAlgorithm, DitherMatrix, DotSize, MatrixError};
use serde::Deserialize;
use std::path::Path;

/// Rasterization job configuration loaded from YAML
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct JobConfig {
    /// Width of the color-managed input rows, in pixels
    pub src_width: usize,

    /// Width of the dithered output rows, in print-head columns
    pub dst_width: usize,

    /// Halftoning algorithm
    #[serde(default)]
    pub algorithm: AlgorithmConfig,

    /// Total ink cap per pixel on the 16-bit scale (0 disables)
    #[serde(default)]
    pub ink_limit: i64,

    /// Logical channel that receives virtual black
    #[serde(default)]
    pub black_channel: Option<usize>,

    /// Base dither matrix
    #[serde(default)]
    pub matrix: MatrixConfig,

    /// Skew applied to the base matrix
    #[serde(default)]
    pub shear: ShearConfig,

    /// Exponent of the transition matrix between dot sizes
    #[serde(default = "default_transition")]
    pub transition: f64,

    /// Printer resolution, horizontal by vertical
    #[serde(default)]
    pub aspect: AspectConfig,

    /// Logical ink channels in registration order
    pub channels: Vec<ChannelConfig>,
}

fn default_transition() -> f64 {
    1.0
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmConfig {
    VeryFast,
    Fast,
    #[default]
    Eventone,
    HybridEventone,
}

impl From<AlgorithmConfig> for DitherAlgorithm {
    fn from(algorithm: AlgorithmConfig) -> Self {
        match algorithm {
            AlgorithmConfig::VeryFast => DitherAlgorithm::VeryFast,
            AlgorithmConfig::Fast => DitherAlgorithm::Fast,
            AlgorithmConfig::Eventone => DitherAlgorithm::Eventone,
            AlgorithmConfig::HybridEventone => DitherAlgorithm::HybridEventone,
        }
    }
}

/// Source of the base dither matrix
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatrixConfig {
    /// Self-similar matrix grown from a seed pattern
    Iterated {
        base: usize,
        exponent: u32,
        seed: Vec<u32>,
    },
    /// Recursive Bayer matrix of edge 2^exponent
    Bayer {
        #[serde(default = "default_bayer_exponent")]
        exponent: u32,
    },
    /// Threshold (or rank) array
    Array {
        x_size: usize,
        y_size: usize,
        values: Vec<u32>,
        #[serde(default)]
        transpose: bool,
        #[serde(default = "default_prescaled")]
        prescaled: bool,
    },
    /// Floating-point threshold curve
    Curve {
        x_size: usize,
        y_size: usize,
        values: Vec<f64>,
        #[serde(default)]
        transpose: bool,
    },
}

fn default_bayer_exponent() -> u32 {
    4 // 16x16
}

fn default_prescaled() -> bool {
    true
}

impl Default for MatrixConfig {
    fn default() -> Self {
        MatrixConfig::Bayer {
            exponent: default_bayer_exponent(),
        }
    }
}

impl MatrixConfig {
    /// Construct the matrix this configuration describes
    pub fn build(&self) -> Result<DitherMatrix, MatrixError> {
        match self {
            MatrixConfig::Iterated {
                base,
                exponent,
                seed,
            } => DitherMatrix::iterated(*base, *exponent, seed),
            MatrixConfig::Bayer { exponent } => DitherMatrix::bayer(*exponent),
            MatrixConfig::Array {
                x_size,
                y_size,
                values,
                transpose,
                prescaled,
            } => DitherMatrix::from_array(*x_size, *y_size, values, *transpose, *prescaled),
            MatrixConfig::Curve {
                x_size,
                y_size,
                values,
                transpose,
            } => DitherMatrix::from_curve(*x_size, *y_size, values, *transpose),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShearConfig {
    #[serde(default)]
    pub x: usize,
    #[serde(default)]
    pub y: usize,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct AspectConfig {
    pub x: u32,
    pub y: u32,
}

impl Default for AspectConfig {
    fn default() -> Self {
        Self { x: 1, y: 1 }
    }
}

/// One logical ink channel
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChannelConfig {
    /// Optional label, only used in log output
    #[serde(default)]
    pub name: Option<String>,

    /// Physical inks, darkest first by convention
    pub subchannels: Vec<SubchannelConfig>,

    /// Dot sizes shared by every subchannel of this channel
    #[serde(default = "default_dot_sizes")]
    pub dot_sizes: Vec<DotSizeConfig>,

    /// Density applied when choosing between dot sizes
    #[serde(default = "default_density")]
    pub density: f64,
}

fn default_dot_sizes() -> Vec<DotSizeConfig> {
    vec![DotSizeConfig {
        value: 1.0,
        bits: 1,
    }]
}

fn default_density() -> f64 {
    1.0
}

fn default_cutoff() -> f64 {
    0.75
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct SubchannelConfig {
    /// Darkness of this ink relative to the full-strength ink
    pub value: f64,

    #[serde(default = "default_density")]
    pub density: f64,

    #[serde(default = "default_cutoff")]
    pub cutoff: f64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct DotSizeConfig {
    pub value: f64,
    pub bits: u32,
}

impl From<DotSizeConfig> for DotSize {
    fn from(dot: DotSizeConfig) -> Self {
        DotSize::new(dot.value, dot.bits)
    }
}

impl JobConfig {
    /// Parse and validate a configuration from a YAML string
    pub fn from_yaml_str(content: &str) -> Result<Self, JobError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, JobError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            channels = config.channels.len(),
            algorithm = ?config.algorithm,
            "Loaded job configuration"
        );
        Ok(config)
    }

    /// Structural checks that serde cannot express; value ranges are left
    /// to the engine builders
    pub fn validate(&self) -> Result<(), JobError> {
        if self.src_width == 0 || self.dst_width == 0 {
            return Err(JobError::Config(format!(
                "widths must be non-zero (src_width {}, dst_width {})",
                self.src_width, self.dst_width
            )));
        }
        if self.channels.is_empty() {
            return Err(JobError::Config("at least one channel is required".into()));
        }
        if let Some(index) = self.channels.iter().position(|c| c.subchannels.is_empty()) {
            return Err(JobError::Config(format!(
                "channel {} has no subchannels",
                index
            )));
        }
        if let Some(black) = self.black_channel {
            if black >= self.channels.len() {
                return Err(JobError::Config(format!(
                    "black_channel {} out of range ({} channels)",
                    black,
                    self.channels.len()
                )));
            }
        }
        Ok(())
    }

    /// Number of physical subchannels across all channels
    pub fn total_subchannels(&self) -> usize {
        self.channels.iter().map(|c| c.subchannels.len()).sum()
    }
}
