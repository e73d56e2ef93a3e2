use rand::Rng;

use crate::shared::effect_params::EffectParams;
use crate::shared::frame::Frame;
use crate::shared::mask::Mask;

use super::compose::{compose_by_mask, ensure_same_dimensions, ComposeError, MaskSide, RegionPixels, Replacement};
use super::region_effects::{render_effect, EffectOutput};

/// Applies `params.effect` to the masked pixels of `frame`, in place.
///
/// Work is confined to the mask's bounding box: pixels outside it are
/// never read for the effect nor written. An all-zero mask leaves the
/// frame untouched.
pub fn apply_effect<R: Rng>(
    frame: &mut Frame,
    mask: &Mask,
    params: &EffectParams,
    rng: &mut R,
) -> Result<(), ComposeError> {
    ensure_same_dimensions(frame, mask)?;

    let Some(bbox) = mask.bounding_box() else {
        return Ok(());
    };
    if bbox.width() < 1 || bbox.height() < 1 {
        return Ok(());
    }

    let roi = RegionPixels::extract(frame, bbox);
    match render_effect(roi, params, rng) {
        EffectOutput::Fill(color) => {
            compose_by_mask(frame, mask, MaskSide::Masked, Replacement::Fill(color))
        }
        EffectOutput::Pixels(pixels) => {
            compose_by_mask(frame, mask, MaskSide::Masked, Replacement::Pixels(&pixels))
        }
    }
}

/// Like [`apply_effect`] but leaves `source` alone and returns a new frame.
pub fn apply_effect_copy<R: Rng>(
    source: &Frame,
    mask: &Mask,
    params: &EffectParams,
    rng: &mut R,
) -> Result<Frame, ComposeError> {
    let mut out = source.clone();
    apply_effect(&mut out, mask, params, rng)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::MASK_ON;
    use crate::shared::effect_params::MosaicEffect;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    fn textured_frame(width: u32, height: u32) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[
                    (x * 13 % 256) as u8,
                    (y * 29 % 256) as u8,
                    ((x * y) % 256) as u8,
                ]);
            }
        }
        Frame::new(data, width, height)
    }

    /// Irregular blob: a diagonal band plus a stray pixel.
    fn blob_mask(width: u32, height: u32) -> Mask {
        let mut mask = Mask::zeros(width, height);
        for i in 10..30 {
            mask.set(i, i, MASK_ON);
            mask.set(i + 1, i, MASK_ON);
        }
        mask.set(35, 12, MASK_ON);
        mask
    }

    fn params(effect: MosaicEffect) -> EffectParams {
        EffectParams {
            block_size: 4,
            blur_strength: 7,
            fill_color: [250, 10, 120],
            ..EffectParams::new(effect)
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[rstest]
    fn test_pixels_outside_bounding_box_unchanged(
        #[values(
            MosaicEffect::PixelBlock,
            MosaicEffect::Blur,
            MosaicEffect::SolidBlack,
            MosaicEffect::FlatColor,
            MosaicEffect::RandomNoise
        )]
        effect: MosaicEffect,
    ) {
        let source = textured_frame(50, 40);
        let mask = blob_mask(50, 40);
        let bbox = mask.bounding_box().unwrap();

        let out = apply_effect_copy(&source, &mask, &params(effect), &mut rng()).unwrap();

        for y in 0..40u32 {
            for x in 0..50u32 {
                let inside = bbox.contains(x as usize, y as usize);
                let masked = mask.is_set(x as usize, y as usize);
                if !inside || !masked {
                    assert_eq!(out.pixel(x, y), source.pixel(x, y), "{effect} at ({x}, {y})");
                }
            }
        }
    }

    #[rstest]
    fn test_empty_mask_returns_original(
        #[values(
            MosaicEffect::PixelBlock,
            MosaicEffect::Blur,
            MosaicEffect::SolidBlack,
            MosaicEffect::FlatColor,
            MosaicEffect::RandomNoise
        )]
        effect: MosaicEffect,
    ) {
        let source = textured_frame(20, 20);
        let out =
            apply_effect_copy(&source, &Mask::zeros(20, 20), &params(effect), &mut rng()).unwrap();
        assert_eq!(out.data(), source.data());
    }

    #[rstest]
    #[case(MosaicEffect::PixelBlock)]
    #[case(MosaicEffect::Blur)]
    fn test_uniform_region_is_idempotent(#[case] effect: MosaicEffect) {
        let source = Frame::filled(30, 30, [33, 66, 99]);
        let mut mask = Mask::zeros(30, 30);
        for y in 5..25 {
            for x in 3..27 {
                mask.set(x, y, MASK_ON);
            }
        }
        let out = apply_effect_copy(&source, &mask, &params(effect), &mut rng()).unwrap();
        assert_eq!(out, source);
    }

    #[rstest]
    #[case(MosaicEffect::SolidBlack, [0, 0, 0])]
    #[case(MosaicEffect::FlatColor, [250, 10, 120])]
    fn test_fill_effects_are_deterministic(#[case] effect: MosaicEffect, #[case] color: [u8; 3]) {
        let source = textured_frame(50, 40);
        let mask = blob_mask(50, 40);
        let a = apply_effect_copy(&source, &mask, &params(effect), &mut StdRng::seed_from_u64(1))
            .unwrap();
        let b = apply_effect_copy(&source, &mask, &params(effect), &mut StdRng::seed_from_u64(2))
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.pixel(35, 12), color);
        assert_eq!(a.pixel(10, 10), color);
    }

    #[test]
    fn test_pixel_block_small_region_single_block() {
        // 5x5 masked square, block size 20 → one averaged block
        let mut source = Frame::filled(12, 12, [0, 0, 0]);
        for y in 2..7u32 {
            for x in 2..7u32 {
                let v = if (x + y) % 2 == 0 { 200 } else { 100 };
                let o = ((y * 12 + x) * 3) as usize;
                source.data_mut()[o..o + 3].copy_from_slice(&[v, v, v]);
            }
        }
        let mut mask = Mask::zeros(12, 12);
        for y in 2..7 {
            for x in 2..7 {
                mask.set(x, y, MASK_ON);
            }
        }
        let params = EffectParams {
            block_size: 20,
            ..EffectParams::new(MosaicEffect::PixelBlock)
        };

        let out = apply_effect_copy(&source, &mask, &params, &mut rng()).unwrap();

        // 13 cells of 200 and 12 of 100 → 3800 / 25 = 152
        for y in 2..7 {
            for x in 2..7 {
                assert_eq!(out.pixel(x, y), [152, 152, 152]);
            }
        }
        assert_eq!(out.pixel(0, 0), [0, 0, 0]);
    }

    #[test]
    fn test_noise_changes_masked_pixels_only() {
        let source = Frame::filled(16, 16, [0, 0, 0]);
        let mut mask = Mask::zeros(16, 16);
        for y in 4..12 {
            for x in 4..12 {
                mask.set(x, y, MASK_ON);
            }
        }
        let out = apply_effect_copy(
            &source,
            &mask,
            &params(MosaicEffect::RandomNoise),
            &mut rng(),
        )
        .unwrap();
        let changed = (4..12u32)
            .flat_map(|y| (4..12u32).map(move |x| (x, y)))
            .filter(|&(x, y)| out.pixel(x, y) != [0, 0, 0])
            .count();
        assert!(changed > 50);
        assert_eq!(out.pixel(0, 0), [0, 0, 0]);
    }

    #[test]
    fn test_dimension_mismatch_is_error() {
        let mut frame = textured_frame(10, 10);
        let err = apply_effect(
            &mut frame,
            &Mask::zeros(10, 11),
            &params(MosaicEffect::Blur),
            &mut rng(),
        )
        .unwrap_err();
        assert!(matches!(err, ComposeError::DimensionMismatch { .. }));
    }
}
