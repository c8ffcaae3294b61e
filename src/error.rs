//! Error types for the motion pattern engine.

/// Top-level error type for frame ingestion, estimation and configuration.
#[derive(Debug, thiserror::Error)]
pub enum MotionError {
    /// The current frame does not have the previous frame's dimensions.
    /// The pair is dropped; filter and classifier state are left untouched.
    #[error(
        "Frame dimensions changed from {}x{} to {}x{}",
        .previous.0, .previous.1, .current.0, .current.1
    )]
    DimensionMismatch {
        previous: (usize, usize),
        current: (usize, usize),
    },

    #[error("Invalid frame dimensions {width}x{height}: both must be non-zero")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Pixel data holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Frame {width}x{height} is too small for search radius {search_radius}")]
    FrameTooSmall {
        width: usize,
        height: usize,
        search_radius: usize,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Detector worker is no longer running")]
    WorkerClosed,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Result type alias using MotionError.
pub type MotionResult<T> = Result<T, MotionError>;

impl MotionError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether the error only invalidates the current frame pair.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DimensionMismatch { .. } | Self::FrameTooSmall { .. }
        )
    }
}
