mod epoch;
pub use epoch::*;

pub mod logging;
pub use logging::*;

mod tensor;
pub use tensor::*;

mod vec2;
pub use vec2::*;

// re-export so downstream crates can use base::log::*
pub use log;
