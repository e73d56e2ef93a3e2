use ndarray::Array2;

use crate::imaging::gaussian;
use crate::shared::constants::{MASK_BINARIZE_MIN, MASK_OFF, MASK_ON, MASK_SMOOTH_THRESHOLD};
use crate::shared::effect_params::MaskParams;
use crate::shared::mask::Mask;

/// Turns arbitrary grayscale masks into strict 0/255 masks.
///
/// Steps, in order: binarize (any nonzero intensity is masked), dilate
/// with a square element, smooth with a Gaussian and re-threshold. The
/// last two are skipped when disabled; an even smoothing kernel is
/// ignored rather than rejected.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaskNormalizer {
    params: MaskParams,
}

impl MaskNormalizer {
    pub fn new(params: MaskParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> MaskParams {
        self.params
    }

    pub fn normalize(&self, raw: &Mask) -> Mask {
        let mut mask = binarize(raw, MASK_BINARIZE_MIN);
        if self.params.dilate > 0 {
            mask = dilate_square(&mask, self.params.dilate as usize);
        }
        let k = self.params.blur_kernel as usize;
        if k > 0 && k % 2 == 1 {
            mask = smooth(&mask, k);
        }
        mask
    }
}

/// Pixels `>= min` become [`MASK_ON`], everything else [`MASK_OFF`].
pub fn binarize(mask: &Mask, min: u8) -> Mask {
    Mask::from_array(
        mask.as_array()
            .mapv(|v| if v >= min { MASK_ON } else { MASK_OFF }),
    )
}

/// Morphological dilation by a `size` x `size` square anchored at
/// `size / 2`, one iteration.
///
/// Output pixel `(x, y)` is the maximum over source offsets
/// `-(size / 2) ..= size - 1 - size / 2` on both axes; neighbors outside the
/// grid are ignored. The square element is separable, so rows and columns
/// are processed in two passes.
pub fn dilate_square(mask: &Mask, size: usize) -> Mask {
    if size <= 1 {
        return mask.clone();
    }
    let src = mask.as_array();
    let (h, w) = src.dim();
    let before = (size / 2) as isize;
    let after = (size - 1 - size / 2) as isize;

    let mut rows = Array2::<u8>::zeros((h, w));
    for y in 0..h {
        for x in 0..w {
            rows[[y, x]] = window(x, w, before, after)
                .map(|sx| src[[y, sx]])
                .max()
                .unwrap_or(MASK_OFF);
        }
    }

    let mut out = Array2::<u8>::zeros((h, w));
    for y in 0..h {
        for x in 0..w {
            out[[y, x]] = window(y, h, before, after)
                .map(|sy| rows[[sy, x]])
                .max()
                .unwrap_or(MASK_OFF);
        }
    }

    Mask::from_array(out)
}

/// Gaussian-smooth a binary mask and threshold it back to 0/255.
pub fn smooth(mask: &Mask, kernel_size: usize) -> Mask {
    let (w, h) = mask.dimensions();
    let mut data: Vec<u8> = mask.as_array().iter().copied().collect();
    gaussian::gaussian_blur(&mut data, w as usize, h as usize, 1, kernel_size);
    let blurred = Mask::new(data, w, h);
    binarize(&blurred, MASK_SMOOTH_THRESHOLD + 1)
}

/// Source indices within `[i - before, i + after]` clipped to `0..len`.
fn window(i: usize, len: usize, before: isize, after: isize) -> impl Iterator<Item = usize> {
    let lo = (i as isize - before).max(0) as usize;
    let hi = (i as isize + after).min(len as isize - 1) as usize;
    lo..=hi
}
