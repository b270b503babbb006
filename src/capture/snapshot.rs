// src/capture/snapshot.rs
use anyhow::{anyhow, Result};
use image::{DynamicImage, ImageOutputFormat};
use log::{info, warn};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use super::camera::Camera;
use super::still::StillImage;

pub const JPEG_QUALITY: u8 = 85;

/// Camera backed by an image file that another process keeps refreshing
/// (a webcam snapshot daemon, a test fixture, a photo dropped by hand).
///
/// Every capture re-reads the file, so the frame is always the latest one.
pub struct FileCamera {
    path: PathBuf,
    quality: u8,
}

impl FileCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            quality: JPEG_QUALITY,
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current frame and return it as JPEG bytes.
    pub fn current_frame_jpeg(&self) -> Result<Vec<u8>> {
        if !self.path.exists() {
            return Err(anyhow!("No frame at {}", self.path.display()));
        }

        let image = image::open(&self.path)?;
        info!(
            "Frame loaded from {}: {}x{}",
            self.path.display(),
            image.width(),
            image.height()
        );

        // JPEG has no alpha channel
        let rgb = DynamicImage::ImageRgb8(image.to_rgb8());

        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        rgb.write_to(&mut cursor, ImageOutputFormat::Jpeg(self.quality))?;
        Ok(buffer)
    }
}

impl Camera for FileCamera {
    fn capture_frame(&self) -> Option<StillImage> {
        match self.current_frame_jpeg() {
            Ok(bytes) => Some(StillImage::from_bytes("image/jpeg", &bytes)),
            Err(e) => {
                warn!("Failed to capture frame: {}", e);
                None
            }
        }
    }
}
