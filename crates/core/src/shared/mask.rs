use ndarray::Array2;

use super::bounding_box::BoundingBox;
use super::constants::{MASK_OFF, MASK_ON};

/// Single-channel intensity grid, indexed `[[row, col]]`.
///
/// Raw masks may hold any intensity; after normalization only
/// [`MASK_OFF`] and [`MASK_ON`] remain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    data: Array2<u8>,
}

impl Mask {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize),
            "data length must equal width * height"
        );
        let data = Array2::from_shape_vec((height as usize, width as usize), data)
            .expect("Mask data length must match dimensions");
        Self { data }
    }

    pub fn from_array(data: Array2<u8>) -> Self {
        Self { data }
    }

    pub fn zeros(width: u32, height: u32) -> Self {
        Self {
            data: Array2::zeros((height as usize, width as usize)),
        }
    }

    pub fn width(&self) -> u32 {
        self.data.ncols() as u32
    }

    pub fn height(&self) -> u32 {
        self.data.nrows() as u32
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[[y, x]]
    }

    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.data[[y, x]] = value;
    }

    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.get(x, y) == MASK_ON
    }

    pub fn as_array(&self) -> &Array2<u8> {
        &self.data
    }

    pub fn as_array_mut(&mut self) -> &mut Array2<u8> {
        &mut self.data
    }

    /// Number of pixels equal to [`MASK_ON`].
    pub fn masked_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == MASK_ON).count()
    }

    pub fn is_binary(&self) -> bool {
        self.data.iter().all(|&v| v == MASK_OFF || v == MASK_ON)
    }

    /// Bounding box of every pixel equal to [`MASK_ON`]; `None` when no
    /// pixel is set.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut bbox: Option<BoundingBox> = None;
        for ((y, x), &v) in self.data.indexed_iter() {
            if v != MASK_ON {
                continue;
            }
            match bbox.as_mut() {
                Some(b) => b.include(x, y),
                None => {
                    bbox = Some(BoundingBox {
                        x_min: x,
                        y_min: y,
                        x_max: x,
                        y_max: y,
                    })
                }
            }
        }
        bbox
    }
}
