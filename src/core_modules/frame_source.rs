// THEORY:
// The `frame_source` module is the bridge between captured images and the engine.
// Cameras and decoders hand over color images in whatever layout they like; the
// engine only understands `PixelBuffer`s. Everything here converts through the
// `image` crate's `Luma<u8>` buffers, which already match the engine's layout:
// one byte per pixel, row-major, no padding.
//
// `fill_from_luma` exists for the capture hot path: the orchestrator recycles the
// frame it is about to discard instead of allocating a new one every callback.

use crate::core_modules::pixel_buffer::PixelBuffer;
use crate::error::{MotionError, MotionResult};
use image::{DynamicImage, GrayImage, Luma};
use std::path::{Path, PathBuf};

const FRAME_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "pgm"];

impl PixelBuffer {
    /// Copies an 8-bit grayscale image.
    pub fn from_luma(image: &GrayImage) -> MotionResult<Self> {
        let (width, height) = image.dimensions();
        PixelBuffer::from_raw(width as usize, height as usize, luma_pixels(image).to_vec())
    }

    /// Converts any decoded image to grayscale intensities.
    pub fn from_image(image: &DynamicImage) -> MotionResult<Self> {
        Self::from_luma(&image.to_luma8())
    }

    /// Overwrites this buffer with `image`, reusing its storage.
    pub fn fill_from_luma(&mut self, image: &GrayImage) -> MotionResult<()> {
        let (width, height) = image.dimensions();
        let incoming = (width as usize, height as usize);
        if incoming != self.dimensions() {
            return Err(MotionError::DimensionMismatch {
                previous: self.dimensions(),
                current: incoming,
            });
        }
        self.copy_from_bytes(luma_pixels(image))
    }

    pub fn to_luma(&self) -> GrayImage {
        GrayImage::from_fn(self.width() as u32, self.height() as u32, |x, y| {
            Luma([self.at(y as usize, x as usize)])
        })
    }
}

/// The image's pixels without any trailing container capacity.
fn luma_pixels(image: &GrayImage) -> &[u8] {
    let (width, height) = image.dimensions();
    &image.as_raw()[..width as usize * height as usize]
}

/// Decodes an image file into a grayscale frame, downsampled by `factor`.
pub fn load_frame(path: impl AsRef<Path>, factor: usize) -> MotionResult<PixelBuffer> {
    let image = image::open(path.as_ref())?;
    let frame = PixelBuffer::from_image(&image)?;
    if factor > 1 {
        frame.downsample(factor)
    } else {
        Ok(frame)
    }
}

/// Writes a frame as an 8-bit grayscale image; the format follows the extension.
pub fn save_frame(path: impl AsRef<Path>, frame: &PixelBuffer) -> MotionResult<()> {
    frame.to_luma().save(path.as_ref())?;
    Ok(())
}

/// Image files in `dir`, sorted by file name so numbered frames replay in order.
pub fn list_frames(dir: impl AsRef<Path>) -> MotionResult<Vec<PathBuf>> {
    let mut frames = Vec::new();
    for entry in std::fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        let is_frame = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if path.is_file() && is_frame {
            frames.push(path);
        }
    }
    frames.sort();
    Ok(frames)
}
