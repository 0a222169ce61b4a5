use ink_dither::{ChannelError, DitherError, InkError, MatrixError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Invalid job configuration: {0}")]
    Config(String),

    #[error("Engine error: {0}")]
    Ink(#[from] InkError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<ChannelError> for JobError {
    fn from(e: ChannelError) -> Self {
        JobError::Ink(e.into())
    }
}

impl From<MatrixError> for JobError {
    fn from(e: MatrixError) -> Self {
        JobError::Ink(e.into())
    }
}

impl From<DitherError> for JobError {
    fn from(e: DitherError) -> Self {
        JobError::Ink(e.into())
    }
}
