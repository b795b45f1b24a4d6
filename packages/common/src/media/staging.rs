use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::error::MediaError;
use super::remove_quietly;

/// Durable staging area for uploaded originals.
///
/// Files are named `{unix millis}-{uuid}{.ext}`, so concurrent uploads never
/// share a name even within the same millisecond.
#[derive(Debug, Clone)]
pub struct StagingStore {
    dir: PathBuf,
}

impl StagingStore {
    /// Create the store, making sure the staging directory exists.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, MediaError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| MediaError::io("create staging dir", &dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the original bytes under a fresh unique name.
    ///
    /// The returned guard deletes the file when dropped unless it was
    /// already removed through [`StagedFile::discard`].
    pub async fn stage(
        &self,
        original_name: Option<&str>,
        content_type: Option<&str>,
        data: &[u8],
    ) -> Result<StagedFile, MediaError> {
        let path = self.dir.join(unique_name(original_name, content_type));
        let staged = StagedFile { path: Some(path) };
        let target = staged.path();

        let result = async {
            let mut file = fs::File::create_new(target).await?;
            file.write_all(data).await?;
            file.flush().await?;
            file.sync_all().await
        }
        .await;

        match result {
            Ok(()) => {
                tracing::debug!(path = %target.display(), bytes = data.len(), "staged upload");
                Ok(staged)
            }
            // `staged` drops here and removes the partial write.
            Err(e) => Err(MediaError::io("write staged file", target, e)),
        }
    }
}

/// Scoped handle to a staged original. Removes the file on drop.
#[derive(Debug)]
pub struct StagedFile {
    path: Option<PathBuf>,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or(Path::new(""))
    }

    /// Remove the staged file now.
    ///
    /// A file that is already gone counts as removed.
    pub async fn discard(mut self) -> Result<(), MediaError> {
        let Some(path) = self.path.take() else {
            return Ok(());
        };
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                // Let Drop take one more attempt.
                let err = MediaError::io("delete staged file", &path, e);
                self.path = Some(path);
                Err(err)
            }
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            remove_quietly(&path);
        }
    }
}

fn unique_name(original_name: Option<&str>, content_type: Option<&str>) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix = uuid::Uuid::new_v4().simple();
    match extension_for(original_name, content_type) {
        Some(ext) => format!("{millis}-{suffix}.{ext}"),
        None => format!("{millis}-{suffix}"),
    }
}

/// Pick a safe extension from the original file name, or from the declared type.
fn extension_for(original_name: Option<&str>, content_type: Option<&str>) -> Option<String> {
    let from_name = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|ext| is_safe_extension(ext));

    from_name.or_else(|| {
        let ct = content_type?;
        mime_guess::get_mime_extensions_str(ct)?
            .first()
            .map(|ext| ext.to_string())
            .filter(|ext| is_safe_extension(ext))
    })
}

fn is_safe_extension(ext: &str) -> bool {
    !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric())
}
