use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the upload pipeline.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The declared content type is not an image type.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// The upload exceeds the configured size ceiling.
    #[error("payload exceeds size limit ({actual} > {limit} bytes)")]
    PayloadTooLarge { actual: u64, limit: u64 },

    /// The bytes could not be decoded as an image.
    #[error("failed to decode image {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// The resized image could not be encoded.
    #[error("failed to encode image {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// A filesystem operation failed.
    #[error("storage IO error during {op} on {path}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MediaError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }
}
