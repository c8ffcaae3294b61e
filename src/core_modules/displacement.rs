// THEORY:
// The `displacement` module turns a pair of consecutive frames into a single global
// movement vector. It is the sensory layer of the engine: everything above it only
// ever sees `(dx, dy)` pairs, never pixels.
//
// The estimator is deliberately simple block matching, not optical flow:
// 1.  **Fixed Sampling Region**: A centered square of the previous frame is the
//     template. It is sized so that every candidate offset stays inside the frame.
// 2.  **Exhaustive Bounded Search**: Every integer offset within the search radius is
//     scored by the sum of absolute differences (SAD) between the template and the
//     shifted region of the current frame.
// 3.  **Deterministic Choice**: Candidates are visited row-major (dy outer, dx inner,
//     both ascending from -R). The winner is the lowest SAD; ties go to the smaller
//     offset magnitude, then to the candidate visited first. The same frame pair
//     always produces the same vector.
//
// A positive `dx` means the content moved right, a positive `dy` that it moved down
// (image rows grow downward).

use crate::config::EstimatorConfig;
use crate::core_modules::pixel_buffer::PixelBuffer;
use crate::error::{MotionError, MotionResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div};

/// Displacement between two frames, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementVector {
    pub dx: f64,
    pub dy: f64,
}

impl MovementVector {
    pub const ZERO: MovementVector = MovementVector { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

impl Add for MovementVector {
    type Output = MovementVector;

    fn add(self, rhs: Self) -> Self::Output {
        MovementVector::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}

impl AddAssign for MovementVector {
    fn add_assign(&mut self, rhs: Self) {
        self.dx += rhs.dx;
        self.dy += rhs.dy;
    }
}

impl Div<f64> for MovementVector {
    type Output = MovementVector;

    fn div(self, rhs: f64) -> Self::Output {
        MovementVector::new(self.dx / rhs, self.dy / rhs)
    }
}

impl fmt::Display for MovementVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:+.2}, {:+.2})", self.dx, self.dy)
    }
}

/// The template placement chosen for a given frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingRegion {
    /// Left column of the template in the previous frame.
    pub x: usize,
    /// Top row of the template in the previous frame.
    pub y: usize,
    /// Side length of the square template.
    pub size: usize,
}

/// SAD block matcher producing one global translation per frame pair.
#[derive(Debug, Clone)]
pub struct DisplacementEstimator {
    search_radius: usize,
    window_size: usize,
    sample_step: usize,
}

impl DisplacementEstimator {
    pub fn new(config: &EstimatorConfig) -> Self {
        Self {
            search_radius: config.search_radius,
            window_size: config.window_size.max(1),
            sample_step: config.sample_step.max(1),
        }
    }

    /// Places the centered template, shrinking it if the frame is too small to hold
    /// it plus the search margin on every side.
    pub fn sampling_region(&self, width: usize, height: usize) -> MotionResult<SamplingRegion> {
        let margin = 2 * self.search_radius;
        let too_small = MotionError::FrameTooSmall {
            width,
            height,
            search_radius: self.search_radius,
        };
        if width <= margin || height <= margin {
            return Err(too_small);
        }
        let size = self.window_size.min(width - margin).min(height - margin);
        Ok(SamplingRegion {
            x: (width - size) / 2,
            y: (height - size) / 2,
            size,
        })
    }

    /// Estimates how far the content of `previous` moved to produce `current`.
    pub fn estimate(
        &self,
        previous: &PixelBuffer,
        current: &PixelBuffer,
    ) -> MotionResult<MovementVector> {
        if !previous.same_dimensions(current) {
            return Err(MotionError::DimensionMismatch {
                previous: previous.dimensions(),
                current: current.dimensions(),
            });
        }

        let region = self.sampling_region(previous.width(), previous.height())?;
        let radius = self.search_radius as isize;

        // (sad, squared magnitude, dx, dy)
        let mut best: Option<(u64, isize, isize, isize)> = None;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let sad = self.score(previous, current, region, dx, dy);
                let magnitude = dx * dx + dy * dy;
                let better = match best {
                    None => true,
                    Some((best_sad, best_magnitude, _, _)) => {
                        (sad, magnitude) < (best_sad, best_magnitude)
                    }
                };
                if better {
                    best = Some((sad, magnitude, dx, dy));
                }
            }
        }

        let (_, _, dx, dy) = best.unwrap_or((0, 0, 0, 0));
        Ok(MovementVector::new(dx as f64, dy as f64))
    }

    /// Sum of absolute differences between the template and the region of `current`
    /// shifted by `(dx, dy)`.
    fn score(
        &self,
        previous: &PixelBuffer,
        current: &PixelBuffer,
        region: SamplingRegion,
        dx: isize,
        dy: isize,
    ) -> u64 {
        let mut sad = 0u64;
        for j in (0..region.size).step_by(self.sample_step) {
            let py = region.y + j;
            let cy = (py as isize + dy) as usize;
            let prev_row = previous.row(py);
            let curr_row = current.row(cy);
            for i in (0..region.size).step_by(self.sample_step) {
                let px = region.x + i;
                let cx = (px as isize + dx) as usize;
                sad += prev_row[px].abs_diff(curr_row[cx]) as u64;
            }
        }
        sad
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::synthetic::{self, texture};

    /// A frame showing the synthetic texture with its content shifted by `(dx, dy)`.
    pub(crate) fn shifted_frame(width: usize, height: usize, dx: isize, dy: isize) -> PixelBuffer {
        synthetic::shifted_frame(width, height, dx, dy).unwrap()
    }

    fn estimator(radius: usize, window: usize) -> DisplacementEstimator {
        DisplacementEstimator::new(&EstimatorConfig {
            search_radius: radius,
            window_size: window,
            sample_step: 1,
        })
    }

    #[test]
    fn identical_frames_have_no_movement() {
        let frame = shifted_frame(64, 64, 0, 0);
        let movement = estimator(6, 32).estimate(&frame, &frame).unwrap();
        assert_eq!(movement, MovementVector::ZERO);
    }

    #[test]
    fn recovers_integer_translation() {
        let previous = shifted_frame(80, 60, 0, 0);
        for &(dx, dy) in &[(3, 0), (-4, 2), (0, -5), (6, 6), (-6, -1)] {
            let current = shifted_frame(80, 60, dx, dy);
            let movement = estimator(6, 32).estimate(&previous, &current).unwrap();
            assert_eq!(movement, MovementVector::new(dx as f64, dy as f64), "shift ({dx}, {dy})");
        }
    }

    #[test]
    fn translation_is_relative_to_previous_frame() {
        let previous = shifted_frame(64, 64, 2, 2);
        let current = shifted_frame(64, 64, 5, 1);
        let movement = estimator(6, 24).estimate(&previous, &current).unwrap();
        assert_eq!(movement, MovementVector::new(3.0, -1.0));
    }

    #[test]
    fn sample_step_still_finds_shift() {
        let estimator = DisplacementEstimator::new(&EstimatorConfig {
            search_radius: 5,
            window_size: 40,
            sample_step: 2,
        });
        let previous = shifted_frame(64, 64, 0, 0);
        let current = shifted_frame(64, 64, -3, 4);
        let movement = estimator.estimate(&previous, &current).unwrap();
        assert_eq!(movement, MovementVector::new(-3.0, 4.0));
    }

    #[test]
    fn flat_frames_tie_break_to_zero_offset() {
        let flat = PixelBuffer::from_fn(40, 40, |_, _| 128).unwrap();
        let movement = estimator(4, 16).estimate(&flat, &flat).unwrap();
        assert_eq!(movement, MovementVector::ZERO);
    }

    #[test]
    fn equal_sad_prefers_smaller_offset() {
        // Vertical stripes: every dy scores the same, so the smallest |dy| must win.
        let stripes = |shift: isize| {
            PixelBuffer::from_fn(40, 40, move |_, x| texture(x as isize - shift, 0)).unwrap()
        };
        let movement = estimator(3, 16).estimate(&stripes(0), &stripes(1)).unwrap();
        assert_eq!(movement, MovementVector::new(1.0, 0.0));
    }

    #[test]
    fn equal_sad_and_magnitude_keep_first_scanned() {
        // Alternating columns against their inverse: dx = -1 and dx = +1 both match
        // exactly at every dy. The row-major scan meets (-1, 0) before (1, 0).
        let previous =
            PixelBuffer::from_fn(40, 40, |_, x| if x % 2 == 0 { 255 } else { 0 }).unwrap();
        let current =
            PixelBuffer::from_fn(40, 40, |_, x| if x % 2 == 0 { 0 } else { 255 }).unwrap();
        let movement = estimator(2, 16).estimate(&previous, &current).unwrap();
        assert_eq!(movement, MovementVector::new(-1.0, 0.0));
    }

    #[test]
    fn mismatched_dimensions_fail() {
        let previous = PixelBuffer::new(100, 100).unwrap();
        let current = PixelBuffer::new(50, 50).unwrap();
        let err = estimator(6, 48).estimate(&previous, &current).unwrap_err();
        assert!(matches!(
            err,
            MotionError::DimensionMismatch {
                previous: (100, 100),
                current: (50, 50)
            }
        ));
    }

    #[test]
    fn window_shrinks_to_fit_small_frames() {
        let region = estimator(6, 48).sampling_region(40, 30).unwrap();
        assert_eq!(region.size, 18);
        assert_eq!((region.x, region.y), (11, 6));
    }

    #[test]
    fn frame_smaller_than_search_margin_fails() {
        assert!(matches!(
            estimator(6, 48).sampling_region(12, 100),
            Err(MotionError::FrameTooSmall { .. })
        ));
    }
}
