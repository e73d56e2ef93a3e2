use crate::shared::frame::Frame;
use crate::shared::mask::Mask;

/// Domain interface for rewriting the pixels of a frame selected by a
/// binary mask.
///
/// Implementations modify the frame in-place (`&mut Frame`). The mask must
/// already be normalized and share the frame's dimensions.
pub trait FrameCompositor: Send {
    fn composite(&self, frame: &mut Frame, mask: &Mask) -> Result<(), Box<dyn std::error::Error>>;
}
