//! Contrast enhancement for 8-bit images: global histogram equalization and
//! contrast limited adaptive histogram equalization (CLAHE).

pub mod buffer;
pub mod color;
pub mod engine;
pub mod enhancement;
pub mod error;
pub mod histogram;
pub mod preprocessing;

pub use buffer::PixelBuffer;
pub use engine::{enhance_adaptive, enhance_global, Enhancer};
pub use enhancement::{ClaheConfig, ClipLimit, RemapTable, TileGrid};
pub use error::EnhanceError;
pub use histogram::{analyze, Cdf, Histogram};
