pub mod depth;
pub mod embed;
mod error;
pub use error::*;
mod inference;
pub use inference::*;
pub mod pose;
mod preprocessor;
pub use preprocessor::*;

pub use depth::DepthEstimator;
pub use embed::{TextEmbedder, cosine_similarity};
pub use pose::PoseEstimator;
