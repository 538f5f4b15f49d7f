mod embedder;
pub use embedder::*;
mod pooling;
pub use pooling::*;
mod similarity;
pub use similarity::*;
