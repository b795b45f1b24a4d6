use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ColorType, RgbImage};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::error::MediaError;
use super::remove_quietly;

/// Extension of every asset the transcoder writes.
pub const OUTPUT_EXTENSION: &str = "jpg";

/// Decodes staged uploads and writes fixed-size JPEG assets.
#[derive(Debug, Clone)]
pub struct Transcoder {
    output_dir: PathBuf,
    quality: u8,
}

impl Transcoder {
    /// Create the transcoder, making sure the output directory exists.
    pub async fn new(output_dir: impl Into<PathBuf>, quality: u8) -> Result<Self, MediaError> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)
            .await
            .map_err(|e| MediaError::io("create resized dir", &output_dir, e))?;
        Ok(Self {
            output_dir,
            quality: quality.clamp(1, 100),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Decode `staged`, resize it to exactly `width` x `height` and write it as JPEG.
    ///
    /// The output is named after the staged file's stem. The returned guard
    /// deletes the asset on drop until [`ResizedAsset::commit`] is called.
    pub async fn transcode(
        &self,
        staged: &Path,
        width: u32,
        height: u32,
    ) -> Result<ResizedAsset, MediaError> {
        if width == 0 || height == 0 {
            return Err(MediaError::Encode {
                path: staged.to_path_buf(),
                message: "target dimensions must be non-zero".into(),
            });
        }

        // Read up front so the staged file is not held open while we work.
        let data = fs::read(staged)
            .await
            .map_err(|e| MediaError::io("read staged file", staged, e))?;

        let stem = staged
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("upload");
        let output_path = self
            .output_dir
            .join(format!("{stem}.{OUTPUT_EXTENSION}"));

        let quality = self.quality;
        let source = staged.to_path_buf();
        let encoded = tokio::task::spawn_blocking(move || {
            encode_resized_jpeg(&source, &data, width, height, quality)
        })
        .await
        .map_err(|e| MediaError::Encode {
            path: staged.to_path_buf(),
            message: format!("transcode task failed: {e}"),
        })??;

        let asset = ResizedAsset {
            path: Some(output_path),
        };
        write_atomically(asset.path(), &encoded).await?;

        tracing::debug!(
            source = %staged.display(),
            output = %asset.path().display(),
            bytes = encoded.len(),
            "transcoded upload"
        );
        Ok(asset)
    }
}

/// Scoped handle to a freshly written asset. Removes the file on drop
/// unless committed.
#[derive(Debug)]
pub struct ResizedAsset {
    path: Option<PathBuf>,
}

impl ResizedAsset {
    pub fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or(Path::new(""))
    }

    /// Keep the file and hand back its path.
    pub fn commit(mut self) -> PathBuf {
        self.path.take().unwrap_or_default()
    }
}

impl Drop for ResizedAsset {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            remove_quietly(&path);
        }
    }
}

/// Center-crop to the target aspect ratio, resize, and encode as RGB JPEG.
fn encode_resized_jpeg(
    source: &Path,
    data: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, MediaError> {
    let decoded = image::load_from_memory(data).map_err(|e| MediaError::Decode {
        path: source.to_path_buf(),
        message: e.to_string(),
    })?;
    let resized = crop_and_resize(decoded.to_rgb8(), width, height);

    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode(resized.as_raw(), width, height, ColorType::Rgb8.into())
        .map_err(|e| MediaError::Encode {
            path: source.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(out.into_inner())
}

fn crop_and_resize(src: RgbImage, width: u32, height: u32) -> RgbImage {
    let (src_w, src_h) = src.dimensions();
    let dst_aspect = width as f64 / height as f64;
    let src_aspect = src_w as f64 / src_h as f64;

    let (crop_x, crop_y, crop_w, crop_h) = if src_aspect > dst_aspect {
        let crop_w = ((src_h as f64) * dst_aspect).round().max(1.0) as u32;
        let crop_w = crop_w.min(src_w);
        ((src_w - crop_w) / 2, 0, crop_w, src_h)
    } else {
        let crop_h = ((src_w as f64) / dst_aspect).round().max(1.0) as u32;
        let crop_h = crop_h.min(src_h);
        (0, (src_h - crop_h) / 2, src_w, crop_h)
    };

    let cropped = image::imageops::crop_imm(&src, crop_x, crop_y, crop_w, crop_h).to_image();
    image::imageops::resize(&cropped, width, height, FilterType::Lanczos3)
}

/// Write through a sibling temp file and rename it into place.
async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), MediaError> {
    let tmp = TempFile(path.with_extension(format!("tmp.{}", uuid::Uuid::new_v4().simple())));

    let mut file = fs::File::create(&tmp.0)
        .await
        .map_err(|e| MediaError::io("create resized file", &tmp.0, e))?;
    file.write_all(bytes)
        .await
        .map_err(|e| MediaError::io("write resized file", &tmp.0, e))?;
    file.sync_all()
        .await
        .map_err(|e| MediaError::io("sync resized file", &tmp.0, e))?;
    drop(file);

    fs::rename(&tmp.0, path)
        .await
        .map_err(|e| MediaError::io("rename resized file", path, e))
}

/// Removes a temp file on drop; a no-op once it was renamed away.
struct TempFile(PathBuf);

impl Drop for TempFile {
    fn drop(&mut self) {
        if self.0.exists() {
            remove_quietly(&self.0);
        }
    }
}
