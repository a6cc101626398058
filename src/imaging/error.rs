//! Error taxonomy shared by every imaging operation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    /// The input bytes are not a decodable image.
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A font file or model weights file could not be loaded.
    #[error("Missing {resource} at {}", path.display())]
    MissingResource { resource: &'static str, path: PathBuf },

    #[error("Failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Style model inference failed: {0}")]
    Inference(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImagingError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
