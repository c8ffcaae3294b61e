// THEORY:
// This file is the main entry point for the `motion_pattern` library crate.
// The public face of the engine is `MotionDetector` (in `pipeline`) together with
// its configuration, the `PatternType` it reports and the `PatternDelegate` it
// reports to. The analysis layers live in `core_modules`:
//
//   pixel_buffer -> displacement -> movement_filter -> pattern
//
// `worker` wraps a detector in an actor for asynchronous frame delivery, and
// `synthetic` fabricates frames with a known motion for demos and tests.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod synthetic;
pub mod worker;

pub use config::MotionConfig;
pub use core_modules::displacement::MovementVector;
pub use core_modules::pattern::{ClassifierState, PatternClassifier, PatternDelegate, PatternType};
pub use core_modules::pixel_buffer::PixelBuffer;
pub use error::{MotionError, MotionResult};
pub use pipeline::{FrameAnalysis, MotionDetector};
pub use worker::{DetectorWorker, PatternEvent, WorkerSummary};
