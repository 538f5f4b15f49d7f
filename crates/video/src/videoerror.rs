use std::fmt;

/// Capture failures. `Device` covers opening and negotiating, `Stream`
/// covers frames that could not be read.
#[derive(Debug)]
pub enum VideoError {
    Device(String),
    Stream(String),
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::Device(msg) => write!(f, "camera device error: {msg}"),
            VideoError::Stream(msg) => write!(f, "camera stream error: {msg}"),
        }
    }
}

impl std::error::Error for VideoError {}

impl From<std::io::Error> for VideoError {
    fn from(err: std::io::Error) -> Self {
        VideoError::Device(err.to_string())
    }
}
