// THEORY:
// The `pipeline` module is the top-level API for the whole engine. `MotionDetector`
// owns every stage and drives them in order for each accepted frame:
//
//   frame -> swap into current slot -> DisplacementEstimator -> MovementFilter
//         -> NodShakeClassifier -> delegate
//
// Rules the detector enforces:
// 1.  **Two Slots Only**: it keeps the previous and the current frame and nothing
//     else. Accepting a frame discards the old previous frame (or recycles its
//     storage when fed through `process_luma`).
// 2.  **No Phantom Time**: filter and classifier only advance when a valid pair was
//     estimated. The first frame, a dimension change or a capture gap never count as
//     "no movement", so they cannot age a pattern window.
// 3.  **Borrowed Observer**: the delegate is lent for the duration of one call. The
//     detector never stores it and it is invoked synchronously on the caller's thread.
// 4.  **Explicit Reset**: stopping capture does not clear state. Callers reuse a
//     detector after a pause by calling `reset` first.

use crate::config::{FilterConfig, MotionConfig};
use crate::core_modules::displacement::{DisplacementEstimator, MovementVector};
use crate::core_modules::movement_filter::MovementFilter;
use crate::core_modules::pattern::{ClassifierState, NodShakeClassifier, PatternClassifier};
use crate::core_modules::pixel_buffer::PixelBuffer;
use crate::error::{MotionError, MotionResult};
use image::GrayImage;
use serde::Serialize;
use tracing::{debug, info, warn};

pub use crate::core_modules::pattern::{PatternDelegate, PatternType};

/// What one estimated frame pair produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameAnalysis {
    /// Raw displacement between the previous and the current frame.
    pub movement: MovementVector,
    /// Filtered displacement fed to the classifier.
    pub smoothed: MovementVector,
    /// `Nod` or `Shake` if this frame completed one, otherwise `None`.
    pub pattern: PatternType,
}

/// The main, top-level struct for the motion engine.
pub struct MotionDetector {
    estimator: DisplacementEstimator,
    filter: MovementFilter,
    filter_config: FilterConfig,
    classifier: NodShakeClassifier,
    previous: Option<PixelBuffer>,
    current: Option<PixelBuffer>,
    last_pattern: PatternType,
    frames_estimated: u64,
}

impl MotionDetector {
    pub fn new(config: &MotionConfig) -> MotionResult<Self> {
        config.validate()?;
        Ok(Self {
            estimator: DisplacementEstimator::new(&config.estimator),
            filter: MovementFilter::from_config(&config.filter),
            filter_config: config.filter.clone(),
            classifier: NodShakeClassifier::from_config(&config.classifier),
            previous: None,
            current: None,
            last_pattern: PatternType::None,
            frames_estimated: 0,
        })
    }

    /// Accepts the next frame and runs the full pipeline on it.
    ///
    /// Returns `Ok(None)` for the first frame after construction, `reset` or
    /// `capture_gap`, since there is nothing to compare it with yet. A frame whose
    /// dimensions differ from its predecessor fails with `DimensionMismatch`; it
    /// still replaces the previous frame so the next frame of the new size pairs
    /// with it.
    pub fn process_frame(
        &mut self,
        frame: PixelBuffer,
        delegate: &mut dyn PatternDelegate,
    ) -> MotionResult<Option<FrameAnalysis>> {
        self.previous = self.current.replace(frame);
        self.analyze(delegate)
    }

    /// Like `process_frame`, but copies `image` into the storage of the frame that
    /// is about to be discarded whenever the dimensions allow it.
    pub fn process_luma(
        &mut self,
        image: &GrayImage,
        delegate: &mut dyn PatternDelegate,
    ) -> MotionResult<Option<FrameAnalysis>> {
        let frame = match self.previous.take() {
            Some(mut recycled) => match recycled.fill_from_luma(image) {
                Ok(()) => recycled,
                Err(_) => PixelBuffer::from_luma(image)?,
            },
            None => PixelBuffer::from_luma(image)?,
        };
        self.process_frame(frame, delegate)
    }

    fn analyze(
        &mut self,
        delegate: &mut dyn PatternDelegate,
    ) -> MotionResult<Option<FrameAnalysis>> {
        let (Some(previous), Some(current)) = (&self.previous, &self.current) else {
            debug!("first frame buffered, waiting for a pair");
            return Ok(None);
        };

        let movement = match self.estimator.estimate(previous, current) {
            Ok(movement) => movement,
            Err(err) => {
                if let MotionError::DimensionMismatch { .. } = err {
                    // Keep only the newest frame; the stale one can never pair again.
                    self.previous = None;
                }
                warn!(error = %err, "dropping frame pair");
                return Err(err);
            }
        };

        self.frames_estimated += 1;
        self.filter.add_movement(movement);
        let smoothed = self.filter.average_movement(self.filter_config.average_frames);

        let mut detected = PatternType::None;
        self.classifier
            .process_new_move(smoothed, &mut |pattern: PatternType| {
                detected = pattern;
                delegate.pattern_detected(pattern);
            });

        debug!(
            frame = self.frames_estimated,
            %movement,
            %smoothed,
            state = ?self.classifier.state(),
            "frame estimated"
        );
        if detected != PatternType::None {
            info!(pattern = %detected, frame = self.frames_estimated, "motion pattern detected");
            self.last_pattern = detected;
        }

        Ok(Some(FrameAnalysis {
            movement,
            smoothed,
            pattern: detected,
        }))
    }

    /// Drops buffered frames after an interruption in delivery. The next frame
    /// primes the detector again; filter and classifier are left as they are.
    pub fn capture_gap(&mut self) {
        debug!("capture gap, discarding buffered frames");
        self.previous = None;
        self.current = None;
    }

    /// Returns every stage to its initial state.
    pub fn reset(&mut self) {
        self.previous = None;
        self.current = None;
        self.filter.clear();
        self.classifier.reset();
        self.last_pattern = PatternType::None;
        self.frames_estimated = 0;
    }

    /// The most recent gesture, `None` until one is detected.
    pub fn last_pattern(&self) -> PatternType {
        self.last_pattern
    }

    pub fn classifier_state(&self) -> ClassifierState {
        self.classifier.state()
    }

    pub fn classifier_elapsed(&self) -> u32 {
        self.classifier.elapsed()
    }

    pub fn movement_history(&self) -> &MovementFilter {
        &self.filter
    }

    /// Frame pairs successfully estimated since construction or `reset`.
    pub fn frames_estimated(&self) -> u64 {
        self.frames_estimated
    }

    /// The frame the next one will be compared against.
    pub fn current_frame(&self) -> Option<&PixelBuffer> {
        self.current.as_ref()
    }
}
