mod compositor;
pub use compositor::*;
mod config;
pub use config::*;
mod error;
pub use error::*;
mod infer;
pub use infer::*;
mod rate;
pub use rate::*;
mod scheduler;
pub use scheduler::*;
mod source;
pub use source::*;
mod still;
pub use still::*;
