// THEORY:
// The `PixelBuffer` is the most fundamental unit of the motion engine. It is a
// "dumb" data container for one grayscale frame: a fixed width and height and a
// row-major grid of one-byte intensities with no padding between rows.
//
// Key architectural principles:
// 1.  **Fixed Shape**: Dimensions are set at construction and never change. A frame
//     of a different size is a different buffer, never a resized one.
// 2.  **Exclusive Ownership**: A buffer is owned by exactly one holder. `Clone` is a
//     deep copy, and `clone_from` reuses the destination's storage when the shapes
//     agree, reallocating only when they do not.
// 3.  **Unchecked Hot Path**: `at`, `assign_at` and `row` are called per pixel or per
//     row by the block matcher. Coordinates are a caller-enforced precondition,
//     checked with `debug_assert!` only.

use crate::error::{MotionError, MotionResult};

/// A single grayscale frame, one byte per pixel, row-major.
#[derive(Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    /// The width of the frame in pixels.
    width: usize,
    /// The height of the frame in pixels.
    height: usize,
    /// `width * height` intensities, row after row.
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocates a zeroed `width` x `height` buffer.
    pub fn new(width: usize, height: usize) -> MotionResult<Self> {
        if width == 0 || height == 0 {
            return Err(MotionError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            data: vec![0; width * height],
        })
    }

    /// Wraps raw row-major intensities produced by an image converter.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> MotionResult<Self> {
        if width == 0 || height == 0 {
            return Err(MotionError::InvalidDimensions { width, height });
        }
        let expected = width * height;
        if data.len() != expected {
            return Err(MotionError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Builds a buffer whose intensity at `(y, x)` is `f(y, x)`.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> u8,
    ) -> MotionResult<Self> {
        let mut buffer = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                buffer.data[y * width + x] = f(y, x);
            }
        }
        Ok(buffer)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn same_dimensions(&self, other: &PixelBuffer) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Intensity at row `y`, column `x`.
    #[inline]
    pub fn at(&self, y: usize, x: usize) -> u8 {
        debug_assert!(y < self.height && x < self.width, "pixel ({y}, {x}) out of range");
        self.data[y * self.width + x]
    }

    /// Mutable intensity at row `y`, column `x`.
    #[inline]
    pub fn assign_at(&mut self, y: usize, x: usize) -> &mut u8 {
        debug_assert!(y < self.height && x < self.width, "pixel ({y}, {x}) out of range");
        &mut self.data[y * self.width + x]
    }

    /// One full row.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        debug_assert!(y < self.height, "row {y} out of range");
        &self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Overwrites the contents with `data` in place. The length must match.
    pub fn copy_from_bytes(&mut self, data: &[u8]) -> MotionResult<()> {
        if data.len() != self.data.len() {
            return Err(MotionError::BufferSize {
                expected: self.data.len(),
                actual: data.len(),
            });
        }
        self.data.copy_from_slice(data);
        Ok(())
    }

    /// Keeps every `factor`-th pixel along both axes, starting at `(0, 0)`.
    pub fn downsample(&self, factor: usize) -> MotionResult<PixelBuffer> {
        if factor == 0 {
            return Err(MotionError::config("downsample factor must be positive"));
        }
        if factor == 1 {
            return Ok(self.clone());
        }
        let width = self.width.div_ceil(factor);
        let height = self.height.div_ceil(factor);
        Self::from_fn(width, height, |y, x| self.at(y * factor, x * factor))
    }

    /// Mean intensity of the whole frame.
    pub fn mean_intensity(&self) -> f64 {
        let sum: u64 = self.data.iter().map(|&v| v as u64).sum();
        sum as f64 / self.data.len() as f64
    }
}

impl Clone for PixelBuffer {
    fn clone(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            data: self.data.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        if self.same_dimensions(source) {
            self.data.copy_from_slice(&source.data);
        } else {
            self.width = source.width;
            self.height = source.height;
            self.data = source.data.clone();
        }
    }
}
