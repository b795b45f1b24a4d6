use std::path::PathBuf;

use serde::Deserialize;

/// Upload pipeline configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct MediaConfig {
    /// Directory for staged originals. Default: "uploads".
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,
    /// Directory for transcoded assets. Default: "uploads/resized".
    #[serde(default = "default_resized_dir")]
    pub resized_dir: PathBuf,
    /// Largest accepted upload in bytes. Default: 5 MiB.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
    /// Output width in pixels. Default: 800.
    #[serde(default = "default_target_width")]
    pub target_width: u32,
    /// Output height in pixels. Default: 600.
    #[serde(default = "default_target_height")]
    pub target_height: u32,
    /// JPEG quality (1-100). Default: 85.
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_staging_dir() -> PathBuf {
    "uploads".into()
}
fn default_resized_dir() -> PathBuf {
    "uploads/resized".into()
}
fn default_max_upload_bytes() -> u64 {
    5 * 1024 * 1024
}
fn default_target_width() -> u32 {
    800
}
fn default_target_height() -> u32 {
    600
}
fn default_jpeg_quality() -> u8 {
    85
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            staging_dir: default_staging_dir(),
            resized_dir: default_resized_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            target_width: default_target_width(),
            target_height: default_target_height(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

impl MediaConfig {
    /// Place both directories under `root`, keeping the default layout.
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            staging_dir: root.join("uploads"),
            resized_dir: root.join("uploads").join("resized"),
            ..Self::default()
        }
    }
}
