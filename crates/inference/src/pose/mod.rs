mod estimator;
pub use estimator::*;
mod postprocess;
pub use postprocess::*;
mod preprocess;
pub use preprocess::*;
mod types;
pub use types::*;
