use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::mask::Mask;

/// Decodes still images into the pipeline's pixel types.
///
/// Implementations handle file formats; callers only see RGB frames and
/// single-channel masks.
pub trait ImageReader: Send {
    /// Reads any supported image as 3-channel RGB.
    fn read_frame(&self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>>;

    /// Reads any supported image as a single grayscale channel.
    fn read_mask(&self, path: &Path) -> Result<Mask, Box<dyn std::error::Error>>;
}
