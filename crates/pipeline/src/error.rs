use std::{fmt, time::Duration};

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The capture device is unavailable or failed for good.
    Capture(String),
    /// The inference call failed for one frame.
    Inference(String),
    /// The inference call did not finish in time.
    Timeout(Duration),
    /// A user supplied value was rejected.
    Config(String),
    Image(String),
    Io(String),
}

impl PipelineError {
    /// Whether the tick loop can carry on after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, PipelineError::Capture(_))
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Capture(msg) => write!(f, "capture error: {msg}"),
            PipelineError::Inference(msg) => write!(f, "inference error: {msg}"),
            PipelineError::Timeout(after) => write!(f, "inference timed out after {:?}", after),
            PipelineError::Config(msg) => write!(f, "config error: {msg}"),
            PipelineError::Image(msg) => write!(f, "image error: {msg}"),
            PipelineError::Io(msg) => write!(f, "io error: {msg}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<image::ImageError> for PipelineError {
    fn from(err: image::ImageError) -> Self {
        PipelineError::Image(err.to_string())
    }
}

impl From<video::VideoError> for PipelineError {
    fn from(err: video::VideoError) -> Self {
        PipelineError::Capture(err.to_string())
    }
}

impl From<inference::InferError> for PipelineError {
    fn from(err: inference::InferError) -> Self {
        PipelineError::Inference(err.to_string())
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Io(err.to_string())
    }
}
