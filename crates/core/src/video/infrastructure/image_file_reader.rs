use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::mask::Mask;
use crate::video::domain::image_reader::ImageReader;

/// Reads frames and masks with the `image` crate.
///
/// Whatever the stored color type, frames come back as RGB8 and masks as
/// Luma8 (alpha dropped, color converted to luminance).
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read_frame(&self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
        let img = image::open(path)?.to_rgb8();
        let (width, height) = img.dimensions();
        Ok(Frame::new(img.into_raw(), width, height))
    }

    fn read_mask(&self, path: &Path) -> Result<Mask, Box<dyn std::error::Error>> {
        let img = image::open(path)?.to_luma8();
        let (width, height) = img.dimensions();
        Ok(Mask::new(img.into_raw(), width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_rgb(dir: &Path, name: &str, width: u32, height: u32, rgb: [u8; 3]) -> PathBuf {
        let path = dir.join(name);
        image::RgbImage::from_pixel(width, height, image::Rgb(rgb))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_read_frame_is_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_rgb(dir.path(), "f.png", 7, 5, [50, 100, 200]);

        let frame = ImageFileReader::new().read_frame(&path).unwrap();

        assert_eq!(frame.dimensions(), (7, 5));
        assert_eq!(frame.pixel(0, 0), [50, 100, 200]);
        assert_eq!(frame.pixel(6, 4), [50, 100, 200]);
    }

    #[test]
    fn test_read_frame_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        image::RgbaImage::from_pixel(3, 3, image::Rgba([1, 2, 3, 0]))
            .save(&path)
            .unwrap();

        let frame = ImageFileReader::new().read_frame(&path).unwrap();
        assert_eq!(frame.pixel(1, 1), [1, 2, 3]);
    }

    #[test]
    fn test_read_mask_is_single_channel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.png");
        let mut img = image::GrayImage::new(4, 3);
        img.put_pixel(2, 1, image::Luma([255]));
        img.save(&path).unwrap();

        let mask = ImageFileReader::new().read_mask(&path).unwrap();

        assert_eq!(mask.dimensions(), (4, 3));
        assert_eq!(mask.get(2, 1), 255);
        assert_eq!(mask.get(0, 0), 0);
    }

    #[test]
    fn test_read_mask_from_color_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_rgb(dir.path(), "m.png", 2, 2, [255, 255, 255]);
        let mask = ImageFileReader::new().read_mask(&path).unwrap();
        assert!(mask.as_array().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_missing_file_is_error() {
        let reader = ImageFileReader::new();
        assert!(reader.read_frame(Path::new("/nonexistent/f.png")).is_err());
        assert!(reader.read_mask(Path::new("/nonexistent/m.png")).is_err());
    }

    #[test]
    fn test_garbage_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(ImageFileReader::new().read_frame(&path).is_err());
    }
}
