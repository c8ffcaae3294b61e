// THEORY:
// The `synthetic` module fabricates camera input with a known answer. A fixed,
// non-repeating texture is translated by exact integer offsets, so the "true"
// movement between any two generated frames is known in advance. The demo binary
// uses it when no recorded frames are supplied, and the tests use it to drive the
// whole pipeline end to end.

use crate::core_modules::pattern::PatternType;
use crate::core_modules::pixel_buffer::PixelBuffer;
use crate::error::MotionResult;

/// Deterministic hash texture with no periodic structure within any search radius.
pub fn texture(x: isize, y: isize) -> u8 {
    let mut h = (x as u32).wrapping_mul(374_761_393) ^ (y as u32).wrapping_mul(668_265_263);
    h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
    (h >> 24) as u8
}

/// A frame showing the texture with its content moved by `(dx, dy)`.
pub fn shifted_frame(width: usize, height: usize, dx: isize, dy: isize) -> MotionResult<PixelBuffer> {
    PixelBuffer::from_fn(width, height, |y, x| texture(x as isize - dx, y as isize - dy))
}

/// Content offsets, one per frame after the starting frame, that trace `gesture`.
///
/// Each leg moves `step` pixels per frame for `frames_per_leg` frames. Paired
/// gestures return to the origin; `Nod` is traced as up-then-down and `Shake` as
/// left-then-right.
pub fn gesture_offsets(gesture: PatternType, step: isize, frames_per_leg: usize) -> Vec<(isize, isize)> {
    let legs: &[(isize, isize)] = match gesture {
        PatternType::Up => &[(0, -1)],
        PatternType::Down => &[(0, 1)],
        PatternType::Left => &[(-1, 0)],
        PatternType::Right => &[(1, 0)],
        PatternType::UpAndDown | PatternType::Nod => &[(0, -1), (0, 1)],
        PatternType::DownAndUp => &[(0, 1), (0, -1)],
        PatternType::LeftAndRight | PatternType::Shake => &[(-1, 0), (1, 0)],
        PatternType::RightAndLeft => &[(1, 0), (-1, 0)],
        PatternType::None => &[],
    };

    let mut offsets = Vec::with_capacity(legs.len() * frames_per_leg);
    let (mut x, mut y) = (0, 0);
    for &(ux, uy) in legs {
        for _ in 0..frames_per_leg {
            x += ux * step;
            y += uy * step;
            offsets.push((x, y));
        }
    }
    offsets
}

/// Renders the starting frame followed by one frame per offset.
pub fn render(width: usize, height: usize, offsets: &[(isize, isize)]) -> MotionResult<Vec<PixelBuffer>> {
    std::iter::once(&(0, 0))
        .chain(offsets)
        .map(|&(dx, dy)| shifted_frame(width, height, dx, dy))
        .collect()
}

/// A scripted session: each gesture followed by `pause` still frames.
pub fn session(
    width: usize,
    height: usize,
    gestures: &[PatternType],
    step: isize,
    frames_per_leg: usize,
    pause: usize,
) -> MotionResult<Vec<PixelBuffer>> {
    let mut offsets = Vec::new();
    let mut origin = (0, 0);
    for &gesture in gestures {
        for (dx, dy) in gesture_offsets(gesture, step, frames_per_leg) {
            offsets.push((origin.0 + dx, origin.1 + dy));
        }
        if let Some(&last) = offsets.last() {
            origin = last;
        }
        offsets.extend(std::iter::repeat_n(origin, pause));
    }
    render(width, height, &offsets)
}
