use ndarray::{s, ArrayView1, ArrayView3, Axis, Zip};
use thiserror::Error;

use crate::shared::bounding_box::BoundingBox;
use crate::shared::constants::{MASK_OFF, MASK_ON};
use crate::shared::fill_color::Rgb;
use crate::shared::frame::{Frame, CHANNELS};
use crate::shared::mask::Mask;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ComposeError {
    #[error("mask is {mask_width}x{mask_height} but frame is {frame_width}x{frame_height}")]
    DimensionMismatch {
        frame_width: u32,
        frame_height: u32,
        mask_width: u32,
        mask_height: u32,
    },
    #[error("replacement pixels cover {replacement:?} but the composed region is {region:?}")]
    ReplacementMismatch {
        replacement: BoundingBox,
        region: BoundingBox,
    },
}

/// Which side of a binary mask receives the replacement content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaskSide {
    /// Pixels equal to 255, restricted to the mask's bounding box.
    Masked,
    /// Pixels equal to 0, anywhere in the frame.
    Unmasked,
}

/// RGB pixels for a rectangle of a frame, row-major within the rectangle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionPixels {
    rect: BoundingBox,
    data: Vec<u8>,
}

impl RegionPixels {
    pub fn new(rect: BoundingBox, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), rect.width() * rect.height() * CHANNELS);
        Self { rect, data }
    }

    /// Copies `rect` out of `frame`.
    pub fn extract(frame: &Frame, rect: BoundingBox) -> Self {
        let view = frame.as_ndarray();
        let roi = view.slice(s![rect.y_min..=rect.y_max, rect.x_min..=rect.x_max, ..]);
        Self {
            rect,
            data: roi.iter().copied().collect(),
        }
    }

    pub fn rect(&self) -> BoundingBox {
        self.rect
    }

    pub fn width(&self) -> usize {
        self.rect.width()
    }

    pub fn height(&self) -> usize {
        self.rect.height()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape((self.height(), self.width(), CHANNELS), &self.data)
            .expect("RegionPixels data length must match its rectangle")
    }
}

/// Content written into the selected side of the mask.
#[derive(Clone, Copy, Debug)]
pub enum Replacement<'a> {
    Fill(Rgb),
    Pixels(&'a RegionPixels),
}

/// Overwrites every pixel on `side` of `mask` with `replacement`.
///
/// All three channels of a selected pixel are written together; pixels on
/// the other side are left untouched. For [`MaskSide::Masked`] nothing
/// outside the bounding box is visited, and an all-zero mask is a no-op.
/// [`Replacement::Pixels`] must cover exactly the composed region.
pub fn compose_by_mask(
    frame: &mut Frame,
    mask: &Mask,
    side: MaskSide,
    replacement: Replacement<'_>,
) -> Result<(), ComposeError> {
    ensure_same_dimensions(frame, mask)?;

    let region = match side {
        MaskSide::Masked => mask.bounding_box(),
        MaskSide::Unmasked => BoundingBox::full(mask.width() as usize, mask.height() as usize),
    };
    let Some(region) = region else {
        return Ok(());
    };
    let selected = match side {
        MaskSide::Masked => MASK_ON,
        MaskSide::Unmasked => MASK_OFF,
    };

    let rows = region.y_min..=region.y_max;
    let cols = region.x_min..=region.x_max;
    let mask_roi = mask.as_array().slice(s![rows.clone(), cols.clone()]);
    let mut view = frame.as_ndarray_mut();
    let mut frame_roi = view.slice_mut(s![rows, cols, ..]);

    match replacement {
        Replacement::Fill(color) => {
            let color = ArrayView1::from(&color);
            Zip::from(frame_roi.lanes_mut(Axis(2)))
                .and(&mask_roi)
                .for_each(|mut px, &m| {
                    if m == selected {
                        px.assign(&color);
                    }
                });
        }
        Replacement::Pixels(pixels) => {
            if pixels.rect() != region {
                return Err(ComposeError::ReplacementMismatch {
                    replacement: pixels.rect(),
                    region,
                });
            }
            let source = pixels.as_ndarray();
            Zip::from(frame_roi.lanes_mut(Axis(2)))
                .and(&mask_roi)
                .and(source.lanes(Axis(2)))
                .for_each(|mut px, &m, src| {
                    if m == selected {
                        px.assign(&src);
                    }
                });
        }
    }

    Ok(())
}

pub fn ensure_same_dimensions(frame: &Frame, mask: &Mask) -> Result<(), ComposeError> {
    if frame.dimensions() != mask.dimensions() {
        return Err(ComposeError::DimensionMismatch {
            frame_width: frame.width(),
            frame_height: frame.height(),
            mask_width: mask.width(),
            mask_height: mask.height(),
        });
    }
    Ok(())
}
