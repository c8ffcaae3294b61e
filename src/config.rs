//! Tunable configuration for the detector.
//!
//! Every section has documented defaults so a bare `MotionConfig::default()`
//! produces a working nod/shake detector for ~30 fps input downsampled by 4.

use crate::error::{MotionError, MotionResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Full detector configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub estimator: EstimatorConfig,
    pub filter: FilterConfig,
    pub classifier: ClassifierConfig,
    pub capture: CaptureConfig,
    pub logging: LoggingConfig,
}

/// Block-matching parameters for the displacement estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Largest offset searched along each axis, in pixels.
    pub search_radius: usize,
    /// Side length of the centered square scoring window, in pixels.
    /// Shrunk automatically when the frame cannot fit it plus the search radius.
    pub window_size: usize,
    /// Stride between sampled pixels inside the scoring window.
    pub sample_step: usize,
}

/// Movement history smoothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Number of movement vectors retained (C).
    pub capacity: usize,
    /// How many of the most recent vectors are averaged before classification.
    pub average_frames: usize,
}

/// Pattern classifier thresholds and windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Accumulated displacement along one axis that completes a swipe (T).
    pub threshold: f64,
    /// Moves within which a swipe must reach the threshold (W).
    pub window: u32,
    /// Moves within which the opposite leg of a nod or shake must arrive (W2).
    pub pairing_window: u32,
}

/// Frame ingestion parameters used by the image conversion helpers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Integer downsample factor applied when converting captured images.
    pub downsample: usize,
    /// Capacity of the frame channel feeding the detector worker.
    pub queue_depth: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "motion_pattern=debug,warn").
    pub level: String,
    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            search_radius: 6,
            window_size: 48,
            sample_step: 1,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            average_frames: 3,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threshold: 20.0,
            window: 15,
            pairing_window: 15,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            downsample: 4,
            queue_depth: 4,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl MotionConfig {
    /// Load and validate a JSON config file. Missing fields take their defaults.
    pub fn load_from(path: impl AsRef<Path>) -> MotionResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty JSON.
    pub fn save_to(&self, path: impl AsRef<Path>) -> MotionResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Reject values that would leave a stage unable to make progress.
    pub fn validate(&self) -> MotionResult<()> {
        if self.estimator.window_size == 0 {
            return Err(MotionError::config("estimator.window_size must be positive"));
        }
        if self.estimator.sample_step == 0 {
            return Err(MotionError::config("estimator.sample_step must be positive"));
        }
        if self.filter.capacity == 0 {
            return Err(MotionError::config("filter.capacity must be positive"));
        }
        if self.filter.average_frames == 0 {
            return Err(MotionError::config("filter.average_frames must be positive"));
        }
        if !(self.classifier.threshold > 0.0) {
            return Err(MotionError::config("classifier.threshold must be positive"));
        }
        if self.classifier.window == 0 || self.classifier.pairing_window == 0 {
            return Err(MotionError::config("classifier windows must be positive"));
        }
        if self.capture.downsample == 0 {
            return Err(MotionError::config("capture.downsample must be positive"));
        }
        if self.capture.queue_depth == 0 {
            return Err(MotionError::config("capture.queue_depth must be positive"));
        }
        Ok(())
    }
}
