use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;

use crate::imaging::resample::resize_frame_bilinear;
use crate::pipeline::pipeline_logger::{elapsed_ms, PipelineLogger};
use crate::pipeline::workspace::list_image_files;
use crate::shared::constants::SEQUENCE_EXTENSIONS;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::image_reader::ImageReader;
use crate::video::domain::video_writer::VideoWriter;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("input directory not found: {0}")]
    MissingInput(PathBuf),
    #[error("cannot list {path}: {source}")]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no frames to export")]
    NoFrames,
    #[error("cannot read first frame {path}: {reason}")]
    FirstFrameUnreadable { path: PathBuf, reason: String },
    #[error("cannot create {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("encoding failed: {0}")]
    Encoder(String),
}

/// Outcome of one export.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportSummary {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub frames_written: usize,
    pub skipped: Vec<PathBuf>,
}

/// PNG files of `dir`, sorted by file name. Missing directory or no PNGs
/// is an error.
pub fn sequence_frames(dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    if !dir.is_dir() {
        return Err(ExportError::MissingInput(dir.to_path_buf()));
    }
    let frames =
        list_image_files(dir, SEQUENCE_EXTENSIONS).map_err(|source| ExportError::ListDirectory {
            path: dir.to_path_buf(),
            source,
        })?;
    if frames.is_empty() {
        return Err(ExportError::NoFrames);
    }
    Ok(frames)
}

/// `<directory name>.mp4`, relative to the working directory.
pub fn default_sequence_output(dir: &Path) -> PathBuf {
    let name = dir
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_os_string()))
        .or_else(|| dir.file_name().map(|n| n.to_os_string()))
        .unwrap_or_else(|| "output".into());
    let mut file = name;
    file.push(".mp4");
    PathBuf::from(file)
}

/// Encodes an ordered image sequence into one video.
///
/// The first image fixes the video size. Later images that fail to load
/// are skipped; images of another size are resized to fit.
pub struct ExportVideoUseCase {
    reader: Box<dyn ImageReader>,
    writer: Box<dyn VideoWriter>,
    logger: Box<dyn PipelineLogger>,
}

impl ExportVideoUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        writer: Box<dyn VideoWriter>,
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
        frames: &[PathBuf],
        fps: f64,
        output: &Path,
    ) -> Result<ExportSummary, ExportError> {
        let first_path = frames.first().ok_or(ExportError::NoFrames)?;
        let first = self
            .reader
            .read_frame(first_path)
            .map_err(|e| ExportError::FirstFrameUnreadable {
                path: first_path.clone(),
                reason: e.to_string(),
            })?;
        let (width, height) = first.dimensions();

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ExportError::OutputDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let metadata = VideoMetadata {
            width,
            height,
            fps,
            total_frames: frames.len(),
        };
        self.writer
            .open(output, &metadata)
            .map_err(|e| ExportError::Encoder(e.to_string()))?;
        self.logger.info(&format!(
            "Encoding {} frames ({width}x{height} @ {fps} fps) to {}",
            frames.len(),
            output.display()
        ));

        let total = frames.len();
        let mut summary = ExportSummary {
            output: output.to_path_buf(),
            width,
            height,
            fps,
            frames_written: 0,
            skipped: Vec::new(),
        };

        let t = Instant::now();
        self.writer
            .write(&first)
            .map_err(|e| ExportError::Encoder(e.to_string()))?;
        self.logger.timing("encode", elapsed_ms(t));
        summary.frames_written += 1;
        self.logger.progress(1, total);

        for (i, path) in frames.iter().enumerate().skip(1) {
            let t = Instant::now();
            let frame = match self.reader.read_frame(path) {
                Ok(frame) => frame,
                Err(e) => {
                    self.logger
                        .skipped(&path.display().to_string(), &e.to_string());
                    summary.skipped.push(path.clone());
                    self.logger.progress(i + 1, total);
                    continue;
                }
            };
            let frame = if frame.dimensions() != (width, height) {
                log::debug!(
                    "Resizing {} from {}x{} to {width}x{height}",
                    path.display(),
                    frame.width(),
                    frame.height()
                );
                resize_frame_bilinear(&frame, width, height)
            } else {
                frame
            };
            self.logger.timing("load", elapsed_ms(t));

            let t = Instant::now();
            self.writer
                .write(&frame)
                .map_err(|e| ExportError::Encoder(e.to_string()))?;
            self.logger.timing("encode", elapsed_ms(t));
            summary.frames_written += 1;
            self.logger.progress(i + 1, total);
        }

        self.writer
            .close()
            .map_err(|e| ExportError::Encoder(e.to_string()))?;
        self.logger.info(&format!(
            "Video saved: {} ({} frames)",
            output.display(),
            summary.frames_written
        ));
        self.logger.summary();
        Ok(summary)
    }
}
