/// Minimal axis-aligned rectangle enclosing every set pixel of a mask.
///
/// Both bounds are inclusive, so a single pixel has width and height 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x_min: usize,
    pub y_min: usize,
    pub x_max: usize,
    pub y_max: usize,
}

impl BoundingBox {
    /// The rectangle covering a whole `width` x `height` grid, or `None`
    /// when the grid has no pixels.
    pub fn full(width: usize, height: usize) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            x_min: 0,
            y_min: 0,
            x_max: width - 1,
            y_max: height - 1,
        })
    }

    pub fn width(&self) -> usize {
        self.x_max + 1 - self.x_min
    }

    pub fn height(&self) -> usize {
        self.y_max + 1 - self.y_min
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        (self.x_min..=self.x_max).contains(&x) && (self.y_min..=self.y_max).contains(&y)
    }

    /// Grows the box so that it also covers `(x, y)`.
    pub fn include(&mut self, x: usize, y: usize) {
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
    }
}
