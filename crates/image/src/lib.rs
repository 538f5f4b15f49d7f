//! Image buffers and pixel utilities.
//!
//! An `Image` is a packed pixel buffer (`size`, `data`, `format`). Packed
//! formats are row-major with no padding between rows.

mod display;
pub use display::*;

mod draw;
pub use draw::*;

mod error;
pub use error::*;

mod image;
pub use image::*;

mod pixelformat;
pub use pixelformat::*;

mod png;
pub use png::*;

mod resize;
pub use resize::*;

mod rgb;
pub use rgb::*;

