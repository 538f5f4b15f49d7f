mod estimator;
pub use estimator::*;
mod postprocess;
pub use postprocess::*;
