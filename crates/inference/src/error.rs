use std::fmt;

#[derive(Debug)]
pub enum InferError {
    Onnx(String),
    Tokenizer(String),
    Shape(String),
    Io(String),
    Config(String),
    Runtime(String),
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferError::Onnx(msg) => write!(f, "onnx error: {msg}"),
            InferError::Tokenizer(msg) => write!(f, "tokenizer error: {msg}"),
            InferError::Shape(msg) => write!(f, "shape error: {msg}"),
            InferError::Io(msg) => write!(f, "io error: {msg}"),
            InferError::Config(msg) => write!(f, "config error: {msg}"),
            InferError::Runtime(msg) => write!(f, "runtime error: {msg}"),
        }
    }
}

impl std::error::Error for InferError {}

impl From<ort::Error> for InferError {
    fn from(err: ort::Error) -> Self {
        InferError::Onnx(err.to_string())
    }
}

impl From<std::io::Error> for InferError {
    fn from(err: std::io::Error) -> Self {
        InferError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for InferError {
    fn from(err: serde_json::Error) -> Self {
        InferError::Config(err.to_string())
    }
}

impl From<ndarray::ShapeError> for InferError {
    fn from(err: ndarray::ShapeError) -> Self {
        InferError::Shape(err.to_string())
    }
}

impl From<base::TensorError> for InferError {
    fn from(err: base::TensorError) -> Self {
        InferError::Shape(err.to_string())
    }
}

impl From<image::ImageError> for InferError {
    fn from(err: image::ImageError) -> Self {
        InferError::Shape(err.to_string())
    }
}

impl From<tokio::task::JoinError> for InferError {
    fn from(err: tokio::task::JoinError) -> Self {
        InferError::Runtime(format!("inference task failed: {err}"))
    }
}
