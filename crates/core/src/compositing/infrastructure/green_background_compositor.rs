use crate::compositing::domain::compose::{compose_by_mask, MaskSide, Replacement};
use crate::compositing::domain::frame_compositor::FrameCompositor;
use crate::shared::fill_color::Rgb;
use crate::shared::frame::Frame;
use crate::shared::mask::Mask;

/// Keeps the masked subject and paints everything else a flat key color.
pub struct GreenBackgroundCompositor {
    background: Rgb,
}

impl GreenBackgroundCompositor {
    pub fn new(background: Rgb) -> Self {
        Self { background }
    }

    pub fn background(&self) -> Rgb {
        self.background
    }
}

impl FrameCompositor for GreenBackgroundCompositor {
    fn composite(&self, frame: &mut Frame, mask: &Mask) -> Result<(), Box<dyn std::error::Error>> {
        compose_by_mask(
            frame,
            mask,
            MaskSide::Unmasked,
            Replacement::Fill(self.background),
        )?;
        Ok(())
    }
}
