//! Contrast Limited Adaptive Histogram Equalization
//!
//! - Divide the image into a `tile_rows x tile_cols` grid
//! - Per-tile histogram with clip limit and single-pass redistribution
//! - Bilinear interpolation between tile remap tables

pub mod interpolate;
pub mod tiles;

pub use interpolate::apply;
pub use tiles::{build_tiles, clip_histogram, Tile, TileGrid};

use crate::error::EnhanceError;
use crate::histogram::HISTOGRAM_BINS;

/// Per-bin ceiling applied to tile histograms
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClipLimit {
    /// Fixed maximum count per bin
    Absolute(u32),
    /// Multiple of the mean bin height of each tile (`tile_pixels / 256`)
    Relative(f64),
}

impl ClipLimit {
    pub fn validate(&self) -> Result<(), EnhanceError> {
        match *self {
            ClipLimit::Absolute(0) => Err(EnhanceError::invalid_config(
                "clip_limit",
                0,
                "must be at least 1",
            )),
            ClipLimit::Relative(limit) if !limit.is_finite() || limit <= 0.0 => Err(
                EnhanceError::invalid_config("clip_limit", limit, "must be a positive number"),
            ),
            _ => Ok(()),
        }
    }

    /// Bin ceiling for a tile holding `tile_pixels` pixels
    pub fn resolve(&self, tile_pixels: usize) -> u64 {
        match *self {
            ClipLimit::Absolute(limit) => limit as u64,
            ClipLimit::Relative(limit) => {
                ((limit * tile_pixels as f64 / HISTOGRAM_BINS as f64) as u64).max(1)
            }
        }
    }
}

impl Default for ClipLimit {
    fn default() -> Self {
        ClipLimit::Relative(2.0)
    }
}

/// Tile grid geometry and clip limit for one CLAHE pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClaheConfig {
    pub tile_rows: u32,
    pub tile_cols: u32,
    pub clip_limit: ClipLimit,
}

impl ClaheConfig {
    pub fn new(tile_rows: u32, tile_cols: u32, clip_limit: ClipLimit) -> Self {
        Self {
            tile_rows,
            tile_cols,
            clip_limit,
        }
    }

    pub fn validate(&self) -> Result<(), EnhanceError> {
        if self.tile_rows == 0 {
            return Err(EnhanceError::invalid_config(
                "tile_rows",
                self.tile_rows,
                "must be at least 1",
            ));
        }
        if self.tile_cols == 0 {
            return Err(EnhanceError::invalid_config(
                "tile_cols",
                self.tile_cols,
                "must be at least 1",
            ));
        }
        self.clip_limit.validate()
    }
}

impl Default for ClaheConfig {
    fn default() -> Self {
        Self::new(8, 8, ClipLimit::default())
    }
}
