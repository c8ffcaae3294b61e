// THEORY:
// The `MovementFilter` is the noise-suppression layer between the estimator and the
// classifiers. A single frame pair can produce a spurious jump when the scene
// flickers; averaging the last few vectors keeps one bad estimate from completing
// or breaking a gesture.
//
// The history is a bounded FIFO: pushing past capacity evicts the oldest vector, so
// memory stays constant no matter how long the session runs.

use crate::config::FilterConfig;
use crate::core_modules::displacement::MovementVector;
use std::collections::VecDeque;

/// Bounded history of recent movement vectors.
#[derive(Debug, Clone)]
pub struct MovementFilter {
    /// Most recent vector at the back.
    history: VecDeque<MovementVector>,
    /// Maximum number of retained vectors (C).
    capacity: usize,
}

impl MovementFilter {
    /// Creates an empty filter. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(config.capacity)
    }

    /// Pushes a vector, evicting the oldest one when full.
    pub fn add_movement(&mut self, movement: MovementVector) {
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(movement);
    }

    /// Component-wise mean of the most recent `min(frames, len)` vectors.
    /// Zero when the history is empty or `frames` is zero.
    pub fn average_movement(&self, frames: usize) -> MovementVector {
        let count = frames.min(self.history.len());
        if count == 0 {
            return MovementVector::ZERO;
        }
        let sum = self
            .history
            .iter()
            .rev()
            .take(count)
            .fold(MovementVector::ZERO, |acc, &v| acc + v);
        sum / count as f64
    }

    /// The most recently added vector.
    pub fn latest(&self) -> Option<MovementVector> {
        self.history.back().copied()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Retained vectors, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &MovementVector> {
        self.history.iter()
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}
