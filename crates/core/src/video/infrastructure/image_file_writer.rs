use std::path::Path;

use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Writes a single frame to an image file using the `image` crate.
///
/// Missing parent directories are created. If encoding fails midway the
/// partial file is removed so a failed frame leaves nothing behind.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;

        if let Err(e) = img.save(path) {
            if path.exists() {
                if let Err(rm) = std::fs::remove_file(path) {
                    log::warn!("Could not remove partial file {}: {rm}", path.display());
                }
            }
            return Err(e.into());
        }
        Ok(())
    }
}
