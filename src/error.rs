use thiserror::Error;

use crate::common::error::QRError;
use crate::common::metadata::ECLevel;

/// Pipeline-stage failures. These abort generation and produce no image;
/// recoverable conditions (a missing logo) are reported out of band instead.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("input of {len} bytes exceeds the QR capacity at level {level}")]
    CapacityExceeded { len: usize, level: ECLevel },

    #[error("encoding failed: {0}")]
    Encode(QRError),

    #[error("failed to write image: {0}")]
    Export(#[from] image::ImageError),
}

impl From<QRError> for GenerationError {
    fn from(e: QRError) -> Self {
        match e {
            QRError::EmptyData => Self::InvalidInput("text must not be empty".into()),
            QRError::InvalidDimensions => {
                Self::InvalidInput("module size must be at least 1".into())
            }
            other => Self::Encode(other),
        }
    }
}
