// THEORY:
// The `worker` module models the capture callback thread. A camera delivers frames
// asynchronously; the engine must process them one at a time, in order, without
// locks. The answer is a single actor task that exclusively owns a `MotionDetector`
// and drains a bounded channel of `FrameMessage`s. Estimation, filtering and
// classification for one frame all run synchronously inside that task, so there is
// never more than one classifier invocation in flight.
//
// Patterns leave the actor on an unbounded channel. Whoever listens there (a UI
// loop, a logger) is responsible for moving them onto its own execution context.

use crate::config::MotionConfig;
use crate::core_modules::pattern::PatternType;
use crate::core_modules::pixel_buffer::PixelBuffer;
use crate::error::{MotionError, MotionResult};
use crate::pipeline::MotionDetector;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Message type for the detector actor.
#[derive(Debug)]
pub enum FrameMessage {
    Frame(PixelBuffer),
    /// Frames were lost upstream; the next frame must not pair with a stale one.
    Gap,
    Reset,
    Shutdown,
}

/// A gesture and the 1-based index of the frame that completed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatternEvent {
    pub frame_index: u64,
    pub pattern: PatternType,
}

/// Counters reported when the worker stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkerSummary {
    pub frames_received: u64,
    pub frames_estimated: u64,
    pub pairs_dropped: u64,
    pub patterns_detected: u64,
}

/// Handle to a running detector actor.
pub struct DetectorWorker {
    frames: mpsc::Sender<FrameMessage>,
    handle: JoinHandle<WorkerSummary>,
}

impl DetectorWorker {
    /// Spawns the actor on the current tokio runtime.
    pub fn spawn(config: &MotionConfig) -> MotionResult<(Self, mpsc::UnboundedReceiver<PatternEvent>)> {
        let detector = MotionDetector::new(config)?;
        let (frame_tx, frame_rx) = mpsc::channel(config.capture.queue_depth);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(Self::run(detector, frame_rx, event_tx));
        Ok((
            Self {
                frames: frame_tx,
                handle,
            },
            event_rx,
        ))
    }

    async fn run(
        mut detector: MotionDetector,
        mut frames: mpsc::Receiver<FrameMessage>,
        events: mpsc::UnboundedSender<PatternEvent>,
    ) -> WorkerSummary {
        let mut summary = WorkerSummary::default();

        while let Some(message) = frames.recv().await {
            match message {
                FrameMessage::Frame(frame) => {
                    summary.frames_received += 1;
                    let frame_index = summary.frames_received;
                    let mut forward = |pattern: PatternType| {
                        summary.patterns_detected += 1;
                        if events.send(PatternEvent { frame_index, pattern }).is_err() {
                            debug!(%pattern, "no pattern listener");
                        }
                    };
                    match detector.process_frame(frame, &mut forward) {
                        Ok(Some(_)) => summary.frames_estimated += 1,
                        Ok(None) => {}
                        Err(err) if err.is_recoverable() => summary.pairs_dropped += 1,
                        Err(err) => {
                            summary.pairs_dropped += 1;
                            error!(error = %err, frame_index, "frame processing failed");
                        }
                    }
                }
                FrameMessage::Gap => detector.capture_gap(),
                FrameMessage::Reset => detector.reset(),
                FrameMessage::Shutdown => break,
            }
        }

        debug!(?summary, "detector worker stopped");
        summary
    }

    /// Queues a frame, waiting while the queue is full.
    pub async fn submit(&self, frame: PixelBuffer) -> MotionResult<()> {
        self.send(FrameMessage::Frame(frame)).await
    }

    /// Queues a frame without waiting. Returns `Ok(false)` and drops the frame when
    /// the detector is behind; the next accepted frame then spans the skipped one.
    pub fn try_submit(&self, frame: PixelBuffer) -> MotionResult<bool> {
        match self.frames.try_send(FrameMessage::Frame(frame)) {
            Ok(()) => Ok(true),
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("detector queue full, dropping frame");
                Ok(false)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(MotionError::WorkerClosed),
        }
    }

    pub async fn capture_gap(&self) -> MotionResult<()> {
        self.send(FrameMessage::Gap).await
    }

    pub async fn reset(&self) -> MotionResult<()> {
        self.send(FrameMessage::Reset).await
    }

    /// Processes everything already queued, stops the actor and returns its counters.
    pub async fn shutdown(self) -> MotionResult<WorkerSummary> {
        self.send(FrameMessage::Shutdown).await?;
        self.handle.await.map_err(|_| MotionError::WorkerClosed)
    }

    async fn send(&self, message: FrameMessage) -> MotionResult<()> {
        self.frames
            .send(message)
            .await
            .map_err(|_| MotionError::WorkerClosed)
    }
}
