use super::error::MediaError;

/// What the client told us about an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDescriptor {
    /// Declared MIME type, e.g. `image/png`.
    pub content_type: Option<String>,
    /// Number of bytes received.
    pub size: u64,
}

/// Reject uploads that are not declared as images or exceed `max_size`.
///
/// The declared type is trusted as-is; the transcoder re-verifies by decoding.
pub fn validate_upload(upload: &UploadDescriptor, max_size: u64) -> Result<(), MediaError> {
    let declared = upload.content_type.as_deref().unwrap_or("").trim();
    let is_image = declared
        .split('/')
        .next()
        .is_some_and(|top| top.eq_ignore_ascii_case("image"))
        && declared.len() > "image/".len();
    if !is_image {
        let shown = if declared.is_empty() { "<none>" } else { declared };
        return Err(MediaError::UnsupportedMediaType(format!(
            "{shown}; only images are allowed"
        )));
    }

    if upload.size > max_size {
        return Err(MediaError::PayloadTooLarge {
            actual: upload.size,
            limit: max_size,
        });
    }

    Ok(())
}
