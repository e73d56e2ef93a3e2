use crate::compositing::domain::frame_compositor::FrameCompositor;
use crate::shared::constants::{GREENBACK_OUTPUT_KIND, MOSAIC_OUTPUT_KIND};
use crate::shared::effect_params::EffectParams;
use crate::shared::fill_color::Rgb;

use super::green_background_compositor::GreenBackgroundCompositor;
use super::mosaic_compositor::MosaicCompositor;

/// What a batch does to each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeMode {
    /// Obscure the masked region.
    Mosaic(EffectParams),
    /// Keep the masked region, flood the rest with a key color.
    GreenBackground(Rgb),
}

impl CompositeMode {
    /// Directory name under the workspace that collects this mode's output.
    pub fn output_kind(&self) -> &'static str {
        match self {
            CompositeMode::Mosaic(_) => MOSAIC_OUTPUT_KIND,
            CompositeMode::GreenBackground(_) => GREENBACK_OUTPUT_KIND,
        }
    }
}

/// Builds the compositor for `mode` and logs which one was chosen.
pub fn create_compositor(mode: CompositeMode) -> Box<dyn FrameCompositor> {
    match mode {
        CompositeMode::Mosaic(params) => {
            log::info!(
                "Using {} mosaic (block_size={}, blur_strength={}, color={:?})",
                params.effect,
                params.block_size,
                params.blur_strength,
                params.fill_color
            );
            Box::new(MosaicCompositor::new(params))
        }
        CompositeMode::GreenBackground(color) => {
            log::info!("Using green background (color={color:?})");
            Box::new(GreenBackgroundCompositor::new(color))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::{DEFAULT_GREEN, MASK_ON};
    use crate::shared::effect_params::MosaicEffect;
    use crate::shared::frame::Frame;
    use crate::shared::mask::Mask;

    fn centre_mask() -> Mask {
        let mut mask = Mask::zeros(5, 5);
        mask.set(2, 2, MASK_ON);
        mask
    }

    #[test]
    fn test_output_kind_per_mode() {
        assert_eq!(CompositeMode::Mosaic(EffectParams::default()).output_kind(), "mosaic");
        assert_eq!(CompositeMode::GreenBackground(DEFAULT_GREEN).output_kind(), "greenback");
    }

    #[test]
    fn test_mosaic_mode_touches_masked_pixel() {
        let compositor = create_compositor(CompositeMode::Mosaic(EffectParams::new(
            MosaicEffect::SolidBlack,
        )));
        let mut frame = Frame::filled(5, 5, [50, 50, 50]);
        compositor.composite(&mut frame, &centre_mask()).unwrap();
        assert_eq!(frame.pixel(2, 2), [0, 0, 0]);
        assert_eq!(frame.pixel(0, 0), [50, 50, 50]);
    }

    #[test]
    fn test_green_mode_touches_background() {
        let compositor = create_compositor(CompositeMode::GreenBackground(DEFAULT_GREEN));
        let mut frame = Frame::filled(5, 5, [50, 50, 50]);
        compositor.composite(&mut frame, &centre_mask()).unwrap();
        assert_eq!(frame.pixel(2, 2), [50, 50, 50]);
        assert_eq!(frame.pixel(0, 0), [0, 255, 0]);
    }
}
