//! Video capture for the depth and pose demos.
//!
//! `VideoIn` runs a capture device on a blocking worker and hands frames to
//! async code through a bounded channel.

mod videoerror;
pub use videoerror::*;

mod videoframe;
pub use videoframe::*;

pub mod videoin;
pub use videoin::*;
