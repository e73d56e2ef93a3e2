use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;

use crate::imaging::resample::resize_frame_area;
use crate::pipeline::pipeline_logger::{elapsed_ms, PipelineLogger};
use crate::pipeline::workspace::{file_name_of, list_image_files};
use crate::shared::constants::RESCALE_EXTENSIONS;
use crate::video::domain::image_reader::ImageReader;
use crate::video::domain::image_writer::ImageWriter;

#[derive(Error, Debug)]
pub enum RescaleError {
    #[error("input directory not found: {0}")]
    MissingInput(PathBuf),
    #[error("scale must be positive, got {0}")]
    InvalidScale(f64),
    #[error("cannot list {path}: {source}")]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot create output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RescaleSummary {
    pub output_dir: PathBuf,
    pub written: usize,
    /// File name and reason for every image left out.
    pub skipped: Vec<(String, String)>,
}

/// `(⌊w·scale⌋, ⌊h·scale⌋)`; either side may come out zero.
pub fn scaled_size(width: u32, height: u32, scale: f64) -> (u32, u32) {
    (
        (width as f64 * scale).floor() as u32,
        (height as f64 * scale).floor() as u32,
    )
}

/// `<parent of input>/resized_<scale>x_<stamp>`, scale with one decimal.
pub fn default_output_dir(input_dir: &Path, scale: f64, stamp: &str) -> PathBuf {
    let parent = input_dir.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!("resized_{scale:.1}x_{stamp}"))
}

/// Scales every image in a directory by one factor with area averaging.
pub struct RescaleImagesUseCase {
    reader: Box<dyn ImageReader>,
    writer: Box<dyn ImageWriter>,
    logger: Box<dyn PipelineLogger>,
}

impl RescaleImagesUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        writer: Box<dyn ImageWriter>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            reader,
            writer,
            logger,
        }
    }

    pub fn execute(
        &mut self,
        input_dir: &Path,
        output_dir: &Path,
        scale: f64,
    ) -> Result<RescaleSummary, RescaleError> {
        if !input_dir.is_dir() {
            return Err(RescaleError::MissingInput(input_dir.to_path_buf()));
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(RescaleError::InvalidScale(scale));
        }
        let files = list_image_files(input_dir, RESCALE_EXTENSIONS).map_err(|source| {
            RescaleError::ListDirectory {
                path: input_dir.to_path_buf(),
                source,
            }
        })?;
        std::fs::create_dir_all(output_dir).map_err(|source| RescaleError::OutputDirectory {
            path: output_dir.to_path_buf(),
            source,
        })?;

        self.logger.info(&format!(
            "Rescaling {} images by {scale} into {}",
            files.len(),
            output_dir.display()
        ));

        let total = files.len();
        let mut summary = RescaleSummary {
            output_dir: output_dir.to_path_buf(),
            written: 0,
            skipped: Vec::new(),
        };

        for (i, path) in files.iter().enumerate() {
            let name = file_name_of(path);
            match self.rescale_one(path, &output_dir.join(&name), scale) {
                Ok(()) => summary.written += 1,
                Err(reason) => {
                    self.logger.skipped(&name, &reason);
                    summary.skipped.push((name, reason));
                }
            }
            self.logger.progress(i + 1, total);
        }

        self.logger.summary();
        Ok(summary)
    }

    fn rescale_one(&mut self, input: &Path, output: &Path, scale: f64) -> Result<(), String> {
        let t = Instant::now();
        let frame = self.reader.read_frame(input).map_err(|e| e.to_string())?;
        let (w, h) = scaled_size(frame.width(), frame.height(), scale);
        if w == 0 || h == 0 {
            return Err(format!(
                "{}x{} scaled by {scale} is empty",
                frame.width(),
                frame.height()
            ));
        }
        let resized = resize_frame_area(&frame, w, h);
        self.writer
            .write(output, &resized)
            .map_err(|e| e.to_string())?;
        self.logger.timing("rescale", elapsed_ms(t));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::video::infrastructure::image_file_reader::ImageFileReader;
    use crate::video::infrastructure::image_file_writer::ImageFileWriter;
    use rstest::rstest;
    use std::fs;

    fn use_case() -> RescaleImagesUseCase {
        RescaleImagesUseCase::new(
            Box::new(ImageFileReader::new()),
            Box::new(ImageFileWriter::new()),
            Box::new(NullPipelineLogger),
        )
    }

    fn save(dir: &Path, name: &str, w: u32, h: u32) {
        image::RgbImage::from_pixel(w, h, image::Rgb([100, 150, 200]))
            .save(dir.join(name))
            .unwrap();
    }

    #[rstest]
    #[case(100, 80, 0.5, (50, 40))]
    #[case(101, 81, 0.5, (50, 40))]
    #[case(10, 10, 2.0, (20, 20))]
    #[case(1, 1, 0.5, (0, 0))]
    fn test_scaled_size(
        #[case] w: u32,
        #[case] h: u32,
        #[case] scale: f64,
        #[case] expected: (u32, u32),
    ) {
        assert_eq!(scaled_size(w, h, scale), expected);
    }

    #[test]
    fn test_default_output_dir_next_to_input() {
        let dir = default_output_dir(Path::new("/data/frames"), 0.5, "20240101_000000");
        assert_eq!(dir, PathBuf::from("/data/resized_0.5x_20240101_000000"));
    }

    #[test]
    fn test_rescales_every_supported_image() {
        let input = tempfile::tempdir().unwrap();
        save(input.path(), "a.png", 40, 20);
        save(input.path(), "b.bmp", 10, 10);
        fs::write(input.path().join("notes.txt"), b"x").unwrap();
        let output = input.path().join("out");

        let summary = use_case().execute(input.path(), &output, 0.5).unwrap();

        assert_eq!(summary.written, 2);
        assert!(summary.skipped.is_empty());
        let a = image::open(output.join("a.png")).unwrap();
        assert_eq!((a.width(), a.height()), (20, 10));
        let b = image::open(output.join("b.bmp")).unwrap().to_rgb8();
        assert_eq!(b.dimensions(), (5, 5));
        assert_eq!(b.get_pixel(2, 2).0, [100, 150, 200]);
        assert!(!output.join("notes.txt").exists());
    }

    #[test]
    fn test_skips_unreadable_and_too_small() {
        let input = tempfile::tempdir().unwrap();
        save(input.path(), "tiny.png", 1, 1);
        save(input.path(), "ok.png", 8, 8);
        fs::write(input.path().join("broken.jpg"), b"not a jpeg").unwrap();
        let output = input.path().join("out");

        let summary = use_case().execute(input.path(), &output, 0.5).unwrap();

        assert_eq!(summary.written, 1);
        let skipped: Vec<_> = summary.skipped.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(skipped, vec!["broken.jpg", "tiny.png"]);
        assert!(output.join("ok.png").exists());
    }

    #[test]
    fn test_missing_input_is_error() {
        let out = tempfile::tempdir().unwrap();
        let err = use_case()
            .execute(Path::new("/nonexistent/in"), out.path(), 0.5)
            .unwrap_err();
        assert!(matches!(err, RescaleError::MissingInput(_)));
    }

    #[test]
    fn test_non_positive_scale_is_error() {
        let input = tempfile::tempdir().unwrap();
        let err = use_case()
            .execute(input.path(), &input.path().join("out"), 0.0)
            .unwrap_err();
        assert!(matches!(err, RescaleError::InvalidScale(_)));
    }
}
