//! Histogram-based contrast enhancement passes
//!
//! Both passes remap intensities through lookup tables derived from
//! histograms: one table for the whole image (global equalization) or one
//! table per tile blended across tiles (CLAHE).

pub mod clahe;
pub mod global;
pub mod remap;

pub use clahe::{ClaheConfig, ClipLimit, TileGrid};
pub use remap::RemapTable;
