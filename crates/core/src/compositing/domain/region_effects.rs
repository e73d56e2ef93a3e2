use rand::Rng;

use crate::imaging::{gaussian, resample};
use crate::shared::effect_params::{EffectParams, MosaicEffect};
use crate::shared::fill_color::Rgb;
use crate::shared::frame::CHANNELS;

use super::compose::RegionPixels;

/// What an effect produces for a region of interest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EffectOutput {
    /// Every masked pixel gets the same color.
    Fill(Rgb),
    /// Per-pixel replacement covering the whole region.
    Pixels(RegionPixels),
}

/// Renders `params.effect` for the region held in `roi`.
///
/// Only `RandomNoise` draws from `rng`.
pub fn render_effect<R: Rng>(
    roi: RegionPixels,
    params: &EffectParams,
    rng: &mut R,
) -> EffectOutput {
    match params.effect {
        MosaicEffect::PixelBlock => EffectOutput::Pixels(pixel_block(roi, params.block_size)),
        MosaicEffect::Blur => EffectOutput::Pixels(blur(roi, params.odd_blur_strength())),
        MosaicEffect::SolidBlack => EffectOutput::Fill([0, 0, 0]),
        MosaicEffect::FlatColor => EffectOutput::Fill(params.fill_color),
        MosaicEffect::RandomNoise => EffectOutput::Pixels(noise(roi, rng)),
    }
}

/// Shrinks the region to `max(1, w / block) x max(1, h / block)` cells by
/// area averaging, then blows it back up with nearest-neighbor so each
/// cell becomes a flat block.
pub fn pixel_block(roi: RegionPixels, block_size: u32) -> RegionPixels {
    let block = (block_size as usize).max(1);
    let (w, h) = (roi.width(), roi.height());
    let small_w = (w / block).max(1);
    let small_h = (h / block).max(1);

    let small = resample::resize_area(roi.data(), w, h, CHANNELS, small_w, small_h);
    let blocky = resample::resize_nearest(&small, small_w, small_h, CHANNELS, w, h);
    RegionPixels::new(roi.rect(), blocky)
}

/// Gaussian-smooths the whole region with an odd `kernel_size`.
pub fn blur(mut roi: RegionPixels, kernel_size: usize) -> RegionPixels {
    let (w, h) = (roi.width(), roi.height());
    gaussian::gaussian_blur(roi.data_mut(), w, h, CHANNELS, kernel_size);
    roi
}

/// One uniformly random byte triplet per region position.
pub fn noise<R: Rng>(roi: RegionPixels, rng: &mut R) -> RegionPixels {
    let mut data = vec![0u8; roi.data().len()];
    rng.fill(data.as_mut_slice());
    RegionPixels::new(roi.rect(), data)
}
