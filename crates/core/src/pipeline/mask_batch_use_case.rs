use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::compositing::domain::frame_compositor::FrameCompositor;
use crate::correspondence::domain::frame_resolver::FrameResolver;
use crate::correspondence::infrastructure::image_index::ImageIndex;
use crate::correspondence::infrastructure::indexed_frame_resolver::IndexedFrameResolver;
use crate::masking::domain::mask_normalizer::MaskNormalizer;
use crate::pipeline::errors::{BatchError, FrameError};
use crate::pipeline::pipeline_logger::{elapsed_ms, PipelineLogger};
use crate::pipeline::workspace::{file_name_of, list_image_files, WorkspaceLayout};
use crate::shared::constants::FRAME_EXTENSIONS;
use crate::video::domain::image_reader::ImageReader;
use crate::video::domain::image_writer::ImageWriter;

/// A mask that produced no output, and why.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedFrame {
    pub mask_name: String,
    pub reason: FrameError,
}

/// Outcome of one batch run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchSummary {
    pub output_dir: PathBuf,
    pub processed: usize,
    pub skipped: Vec<SkippedFrame>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.processed + self.skipped.len()
    }
}

/// Per-frame batch: for every mask, find its frame, normalize the mask,
/// composite, and write `output_dir/<mask file name>`.
///
/// A failure on one frame is logged and recorded; the rest still run.
pub struct MaskBatchUseCase {
    reader: Box<dyn ImageReader>,
    writer: Box<dyn ImageWriter>,
    normalizer: MaskNormalizer,
    compositor: Box<dyn FrameCompositor>,
    logger: Box<dyn PipelineLogger>,
}

impl MaskBatchUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        writer: Box<dyn ImageWriter>,
        normalizer: MaskNormalizer,
        compositor: Box<dyn FrameCompositor>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            reader,
            writer,
            normalizer,
            compositor,
            logger,
        }
    }

    /// Lists the workspace, pairs masks to frames by frame number, and
    /// processes every mask in file-name order.
    pub fn execute(
        &mut self,
        layout: &WorkspaceLayout,
        output_dir: &Path,
    ) -> Result<BatchSummary, BatchError> {
        let masks = list_or_fail(layout.masks_dir())?;
        if masks.is_empty() {
            return Err(BatchError::NoMasks(layout.masks_dir().to_path_buf()));
        }
        let images = list_or_fail(layout.images_dir())?;
        if images.is_empty() {
            return Err(BatchError::NoImages(layout.images_dir().to_path_buf()));
        }

        let index = ImageIndex::build(images.iter().map(|p| file_name_of(p)));
        self.logger.info(&format!(
            "Found {} masks and {} images ({} indexed by frame number)",
            masks.len(),
            images.len(),
            index.len()
        ));
        let resolver = IndexedFrameResolver::new(layout.images_dir(), index);

        self.run(&masks, &resolver, output_dir)
    }

    /// Processes `masks` in the order given, pairing through `resolver`.
    pub fn run(
        &mut self,
        masks: &[PathBuf],
        resolver: &dyn FrameResolver,
        output_dir: &Path,
    ) -> Result<BatchSummary, BatchError> {
        std::fs::create_dir_all(output_dir).map_err(|source| BatchError::OutputDirectory {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let total = masks.len();
        let mut summary = BatchSummary {
            output_dir: output_dir.to_path_buf(),
            processed: 0,
            skipped: Vec::new(),
        };

        for (i, mask_path) in masks.iter().enumerate() {
            let mask_name = file_name_of(mask_path);
            match self.process_frame(mask_path, &mask_name, resolver, output_dir) {
                Ok(()) => summary.processed += 1,
                Err(reason) => {
                    self.logger.skipped(&mask_name, &reason.to_string());
                    summary.skipped.push(SkippedFrame { mask_name, reason });
                }
            }
            self.logger.progress(i + 1, total);
        }

        self.logger.info(&format!(
            "Wrote {} of {} frames to {}",
            summary.processed,
            total,
            output_dir.display()
        ));
        self.logger.summary();
        Ok(summary)
    }

    fn process_frame(
        &mut self,
        mask_path: &Path,
        mask_name: &str,
        resolver: &dyn FrameResolver,
        output_dir: &Path,
    ) -> Result<(), FrameError> {
        let t = Instant::now();
        let resolution = resolver.resolve(mask_name).ok_or(FrameError::Unresolved)?;
        if !resolution.path.is_file() {
            return Err(FrameError::SourceMissing(resolution.path));
        }
        log::debug!(
            "{mask_name} -> {} ({:?})",
            resolution.path.display(),
            resolution.strategy
        );
        self.logger.timing("resolve", elapsed_ms(t));

        let t = Instant::now();
        let raw = self
            .reader
            .read_mask(mask_path)
            .map_err(|e| FrameError::MaskUnreadable(e.to_string()))?;
        let mut load_ms = elapsed_ms(t);

        let t = Instant::now();
        let mask = self.normalizer.normalize(&raw);
        self.logger.timing("normalize", elapsed_ms(t));
        self.logger.metric("masked_pixels", mask.masked_count() as f64);

        let t = Instant::now();
        let mut frame = self
            .reader
            .read_frame(&resolution.path)
            .map_err(|e| FrameError::SourceUnreadable {
                path: resolution.path.clone(),
                reason: e.to_string(),
            })?;
        load_ms += elapsed_ms(t);
        self.logger.timing("load", load_ms);

        if frame.dimensions() != mask.dimensions() {
            return Err(FrameError::DimensionMismatch {
                frame_width: frame.width(),
                frame_height: frame.height(),
                mask_width: mask.width(),
                mask_height: mask.height(),
            });
        }

        let t = Instant::now();
        self.compositor
            .composite(&mut frame, &mask)
            .map_err(|e| FrameError::CompositeFailed(e.to_string()))?;
        self.logger.timing("composite", elapsed_ms(t));

        let t = Instant::now();
        let out_path = output_dir.join(mask_name);
        self.writer
            .write(&out_path, &frame)
            .map_err(|e| FrameError::WriteFailed {
                path: out_path.clone(),
                reason: e.to_string(),
            })?;
        self.logger.timing("write", elapsed_ms(t));

        Ok(())
    }
}

fn list_or_fail(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    list_image_files(dir, FRAME_EXTENSIONS).map_err(|source| BatchError::ListDirectory {
        path: dir.to_path_buf(),
        source,
    })
}
