// THEORY:
// The `FourDirectionClassifier` recognises a single swipe along one axis. It keeps a
// signed running sum per axis. A sum only grows while consecutive moves agree in sign;
// the moment an axis reverses, its sum restarts from the reversing move, so a jitter
// back and forth never adds up to a swipe.
//
// A swipe completes when either sum reaches the threshold inside the time window.
// The axis with the larger magnitude wins; on an exact tie the horizontal axis wins.
// The threshold is checked before the window, so a run that reaches it on the last
// move of the window still completes.

use super::{ClassifierState, PatternClassifier, PatternDelegate, PatternType};
use crate::config::ClassifierConfig;
use crate::core_modules::displacement::MovementVector;
use tracing::trace;

/// Detects Up/Down/Left/Right swipes.
#[derive(Debug, Clone)]
pub struct FourDirectionClassifier {
    /// Accumulated magnitude that completes a swipe (T).
    threshold: f64,
    /// Moves allowed before an unfinished swipe is abandoned (W).
    window: u32,
    state: ClassifierState,
    /// Moves processed since leaving `Idle`.
    time: u32,
    /// Signed same-direction run along x.
    acc_x: f64,
    /// Signed same-direction run along y.
    acc_y: f64,
}

impl FourDirectionClassifier {
    pub fn new(threshold: f64, window: u32) -> Self {
        Self {
            threshold,
            window: window.max(1),
            state: ClassifierState::Idle,
            time: 0,
            acc_x: 0.0,
            acc_y: 0.0,
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(config.threshold, config.window)
    }

    /// Current per-axis runs as a vector.
    pub fn accumulated(&self) -> MovementVector {
        MovementVector::new(self.acc_x, self.acc_y)
    }

    fn accumulate(acc: f64, delta: f64) -> f64 {
        if delta == 0.0 {
            acc
        } else if acc == 0.0 || acc.signum() == delta.signum() {
            acc + delta
        } else {
            delta
        }
    }

    /// The swipe the current runs represent, if either reached the threshold.
    fn classify(&self) -> Option<PatternType> {
        let (ax, ay) = (self.acc_x.abs(), self.acc_y.abs());
        if ax < self.threshold && ay < self.threshold {
            return None;
        }
        let pattern = if ax >= ay {
            if self.acc_x > 0.0 {
                PatternType::Right
            } else {
                PatternType::Left
            }
        } else if self.acc_y > 0.0 {
            PatternType::Down
        } else {
            PatternType::Up
        };
        Some(pattern)
    }
}

impl PatternClassifier for FourDirectionClassifier {
    fn process_new_move(&mut self, movement: MovementVector, delegate: &mut dyn PatternDelegate) {
        if self.state == ClassifierState::Idle {
            // A still frame does not open a window.
            if movement.is_zero() {
                return;
            }
            self.state = ClassifierState::Accumulating;
        }

        self.time += 1;
        self.acc_x = Self::accumulate(self.acc_x, movement.dx);
        self.acc_y = Self::accumulate(self.acc_y, movement.dy);

        if let Some(pattern) = self.classify() {
            trace!(%pattern, time = self.time, acc_x = self.acc_x, acc_y = self.acc_y, "swipe completed");
            self.reset();
            delegate.pattern_detected(pattern);
            return;
        }

        if self.time >= self.window {
            trace!(acc_x = self.acc_x, acc_y = self.acc_y, "swipe window expired");
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.state = ClassifierState::Idle;
        self.time = 0;
        self.acc_x = 0.0;
        self.acc_y = 0.0;
    }

    fn state(&self) -> ClassifierState {
        self.state
    }

    fn elapsed(&self) -> u32 {
        self.time
    }
}
