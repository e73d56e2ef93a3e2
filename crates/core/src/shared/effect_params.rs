use std::fmt;
use std::str::FromStr;

use super::constants::{DEFAULT_BLUR_STRENGTH, DEFAULT_FILL_COLOR, DEFAULT_MOSAIC_SIZE};
use super::fill_color::Rgb;

/// The closed set of redaction effects applied inside a mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MosaicEffect {
    /// Area-averaged downscale followed by a nearest-neighbor upscale.
    #[default]
    PixelBlock,
    Blur,
    SolidBlack,
    FlatColor,
    RandomNoise,
}

impl MosaicEffect {
    pub const ALL: &'static [MosaicEffect] = &[
        MosaicEffect::PixelBlock,
        MosaicEffect::Blur,
        MosaicEffect::SolidBlack,
        MosaicEffect::FlatColor,
        MosaicEffect::RandomNoise,
    ];

    /// Short name accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            MosaicEffect::PixelBlock => "pixel",
            MosaicEffect::Blur => "blur",
            MosaicEffect::SolidBlack => "black",
            MosaicEffect::FlatColor => "color",
            MosaicEffect::RandomNoise => "noise",
        }
    }
}

impl fmt::Display for MosaicEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MosaicEffect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MosaicEffect::ALL
            .iter()
            .copied()
            .find(|e| e.name() == s)
            .ok_or_else(|| {
                format!("unknown mosaic type '{s}' (expected one of: pixel, blur, black, color, noise)")
            })
    }
}

/// How raw masks are cleaned up before compositing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct MaskParams {
    /// Side of the square dilation element; 0 disables dilation.
    pub dilate: u32,
    /// Gaussian kernel size for edge smoothing; 0 or even disables it.
    pub blur_kernel: u32,
}

/// Immutable per-run settings of the region transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectParams {
    pub effect: MosaicEffect,
    /// Source pixels per mosaic block along each axis.
    pub block_size: u32,
    /// Gaussian kernel size of the blur effect; even values are bumped to odd.
    pub blur_strength: u32,
    pub fill_color: Rgb,
}

impl EffectParams {
    pub fn new(effect: MosaicEffect) -> Self {
        Self {
            effect,
            ..Self::default()
        }
    }

    /// Blur kernel actually used: `blur_strength` forced odd.
    pub fn odd_blur_strength(&self) -> usize {
        let k = self.blur_strength as usize;
        if k % 2 == 0 {
            k + 1
        } else {
            k
        }
    }
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            effect: MosaicEffect::default(),
            block_size: DEFAULT_MOSAIC_SIZE,
            blur_strength: DEFAULT_BLUR_STRENGTH,
            fill_color: DEFAULT_FILL_COLOR,
        }
    }
}
