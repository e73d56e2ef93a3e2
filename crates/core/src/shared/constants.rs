use super::fill_color::Rgb;

pub const MASK_OFF: u8 = 0;
pub const MASK_ON: u8 = u8::MAX;

/// Raw mask intensities at or above this value count as masked.
pub const MASK_BINARIZE_MIN: u8 = 1;
/// After smoothing, intensities strictly above this value stay masked.
pub const MASK_SMOOTH_THRESHOLD: u8 = 127;

/// Frame and mask files taking part in a batch (matched case-insensitively).
pub const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
/// Extensions probed, in order, when a mask cannot be paired by frame index.
pub const SOURCE_PROBE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
/// Files picked up by the standalone rescaler.
pub const RESCALE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];
/// Files picked up by the standalone sequence-to-video composer.
pub const SEQUENCE_EXTENSIONS: &[&str] = &["png"];

pub const DEFAULT_WORKSPACE_ROOT: &str = "workspace";
pub const IMAGES_DIR: &str = "images";
pub const MASKS_DIR: &str = "masks";
pub const MOSAIC_OUTPUT_KIND: &str = "mosaic";
pub const GREENBACK_OUTPUT_KIND: &str = "greenback";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub const DEFAULT_MOSAIC_SIZE: u32 = 20;
pub const DEFAULT_BLUR_STRENGTH: u32 = 21;
pub const DEFAULT_FILL_COLOR: Rgb = [0, 0, 0];
pub const DEFAULT_GREEN: Rgb = [0, 255, 0];

/// Frame rate of the optional video exported after a mosaic batch.
pub const DEFAULT_EXPORT_FPS: f64 = 16.0;
/// Frame rate of the standalone sequence-to-video composer.
pub const DEFAULT_COMPOSE_FPS: f64 = 30.0;
/// Used by the encoder when a non-positive frame rate slips through.
pub const FALLBACK_FPS: f64 = 30.0;

pub const DEFAULT_RESCALE_FACTOR: f64 = 0.5;

pub const BATCH_PROGRESS_EVERY: usize = 10;
pub const EXPORT_PROGRESS_EVERY: usize = 30;
pub const COMPOSE_PROGRESS_EVERY: usize = 50;
