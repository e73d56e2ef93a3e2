use std::cell::RefCell;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::compositing::domain::frame_compositor::FrameCompositor;
use crate::compositing::domain::region_transform::apply_effect;
use crate::shared::effect_params::EffectParams;
use crate::shared::frame::Frame;
use crate::shared::mask::Mask;

/// Obscures the masked region with one of the mosaic effects.
///
/// Keeps its own generator so `RandomNoise` output differs frame to frame
/// while tests can pin it with [`MosaicCompositor::with_seed`].
pub struct MosaicCompositor {
    params: EffectParams,
    rng: RefCell<StdRng>,
}

impl MosaicCompositor {
    pub fn new(params: EffectParams) -> Self {
        Self {
            params,
            rng: RefCell::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(params: EffectParams, seed: u64) -> Self {
        Self {
            params,
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn params(&self) -> &EffectParams {
        &self.params
    }
}

impl FrameCompositor for MosaicCompositor {
    fn composite(&self, frame: &mut Frame, mask: &Mask) -> Result<(), Box<dyn std::error::Error>> {
        let mut rng = self.rng.borrow_mut();
        apply_effect(frame, mask, &self.params, &mut *rng)?;
        Ok(())
    }
}
