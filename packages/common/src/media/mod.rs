//! Image upload pipeline building blocks: declared-type/size validation,
//! staging of the original bytes, and transcoding to the fixed output format.

mod error;

pub mod staging;
pub mod transcoder;
pub mod validator;

pub use error::MediaError;
pub use staging::{StagedFile, StagingStore};
pub use transcoder::{ResizedAsset, Transcoder};
pub use validator::{UploadDescriptor, validate_upload};

/// Delete a file if it still exists, synchronously.
///
/// Used from `Drop` impls where no runtime is guaranteed to be available.
pub(crate) fn remove_quietly(path: &std::path::Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed uncommitted file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), "failed to remove file: {e}"),
    }
}
