use super::ClipLimit;
use crate::buffer::PixelBuffer;
use crate::enhancement::remap::RemapTable;
use crate::error::EnhanceError;
use crate::histogram::{Histogram, HISTOGRAM_BINS};
use rayon::prelude::*;

/// One rectangular region of the grid with its clipped histogram and table.
#[derive(Debug, Clone)]
pub struct Tile {
    pub row: u32,
    pub col: u32,
    /// Pixel bounds, half-open: `x0..x1`, `y0..y1`
    pub x0: u32,
    pub x1: u32,
    pub y0: u32,
    pub y1: u32,
    pub clip_limit: u64,
    /// Counts removed by clipping before redistribution
    pub clipped: u64,
    pub histogram: Histogram,
    pub table: RemapTable,
}

impl Tile {
    pub fn pixel_count(&self) -> usize {
        (self.x1 - self.x0) as usize * (self.y1 - self.y0) as usize
    }

    /// Geometric centroid in pixel coordinates
    pub fn center(&self) -> (f64, f64) {
        (
            (self.x0 + self.x1 - 1) as f64 / 2.0,
            (self.y0 + self.y1 - 1) as f64 / 2.0,
        )
    }
}

/// All tiles of one CLAHE pass, row-major.
#[derive(Debug, Clone)]
pub struct TileGrid {
    rows: u32,
    cols: u32,
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Dimensions of the buffer the grid was built from
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn tile(&self, row: u32, col: u32) -> &Tile {
        &self.tiles[(row * self.cols + col) as usize]
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile centre x coordinates, one per column
    pub fn column_centers(&self) -> Vec<f64> {
        (0..self.cols).map(|c| self.tile(0, c).center().0).collect()
    }

    /// Tile centre y coordinates, one per row
    pub fn row_centers(&self) -> Vec<f64> {
        (0..self.rows).map(|r| self.tile(r, 0).center().1).collect()
    }
}

/// Split `len` into `count` spans of `len / count`; the last span takes the
/// remainder.
fn axis_bounds(len: u32, count: u32) -> Vec<(u32, u32)> {
    let base = len / count;
    (0..count)
        .map(|i| {
            let start = i * base;
            let end = if i + 1 == count { len } else { start + base };
            (start, end)
        })
        .collect()
}

/// Shrink the grid so no tile is narrower or shorter than one pixel.
fn fit_grid(tile_rows: u32, tile_cols: u32, width: u32, height: u32) -> (u32, u32) {
    let rows = tile_rows.min(height);
    let cols = tile_cols.min(width);
    if (rows, cols) != (tile_rows, tile_cols) {
        tracing::warn!(
            "{}x{} tile grid does not fit a {}x{} buffer, using {}x{}",
            tile_rows,
            tile_cols,
            width,
            height,
            rows,
            cols
        );
    }
    (rows, cols)
}

/// Partition `buffer` into `tile_rows x tile_cols` tiles and compute each
/// tile's clipped histogram and remap table.
pub fn build_tiles(
    buffer: &PixelBuffer,
    tile_rows: u32,
    tile_cols: u32,
    clip_limit: ClipLimit,
) -> Result<TileGrid, EnhanceError> {
    super::ClaheConfig::new(tile_rows, tile_cols, clip_limit).validate()?;

    let (width, height) = buffer.dimensions();
    let (tile_rows, tile_cols) = fit_grid(tile_rows, tile_cols, width, height);

    let col_bounds = axis_bounds(width, tile_cols);
    let row_bounds = axis_bounds(height, tile_rows);

    tracing::debug!(
        "Building {}x{} tile grid over {}x{} buffer (base tile {}x{})",
        tile_rows,
        tile_cols,
        width,
        height,
        col_bounds[0].1,
        row_bounds[0].1
    );

    let tiles: Vec<Tile> = (0..tile_rows * tile_cols)
        .into_par_iter()
        .map(|index| {
            let row = index / tile_cols;
            let col = index % tile_cols;
            let (x0, x1) = col_bounds[col as usize];
            let (y0, y1) = row_bounds[row as usize];
            build_tile(buffer, row, col, (x0, x1, y0, y1), clip_limit)
        })
        .collect();

    if tiles.iter().all(|t| t.clipped == 0) {
        tracing::warn!(
            "Clip limit {:?} is never reached; tiles are equalized without contrast limiting",
            clip_limit
        );
    }

    Ok(TileGrid {
        rows: tile_rows,
        cols: tile_cols,
        width,
        height,
        tiles,
    })
}

fn build_tile(
    buffer: &PixelBuffer,
    row: u32,
    col: u32,
    (x0, x1, y0, y1): (u32, u32, u32, u32),
    clip_limit: ClipLimit,
) -> Tile {
    let mut bins = [0u64; HISTOGRAM_BINS];
    for y in y0..y1 {
        for &v in &buffer.row(y)[x0 as usize..x1 as usize] {
            bins[v as usize] += 1;
        }
    }
    let mut histogram = Histogram::from_bins(bins);

    let tile_pixels = (x1 - x0) as usize * (y1 - y0) as usize;
    let limit = clip_limit.resolve(tile_pixels);
    let clipped = clip_histogram(&mut histogram, limit);

    // A single occupied level after clipping has nothing to spread; the tile
    // keeps that level for every input so neighbours blend between levels.
    let cdf = histogram.cdf();
    let table = RemapTable::equalizing(&cdf).unwrap_or_else(|| {
        let level = histogram.bins().iter().position(|&c| c > 0).unwrap_or(0);
        RemapTable::constant(level as u8)
    });

    Tile {
        row,
        col,
        x0,
        x1,
        y0,
        y1,
        clip_limit: limit,
        clipped,
        histogram,
        table,
    }
}

/// Clip bins at `limit` and redistribute the excess in one pass.
///
/// The excess is spread evenly over all bins, with the leftover units added
/// one each to the lowest bins. The histogram total is unchanged. Returns the
/// redistributed excess.
pub fn clip_histogram(histogram: &mut Histogram, limit: u64) -> u64 {
    let bins = histogram.bins_mut();

    let mut excess = 0u64;
    for h in bins.iter_mut() {
        if *h > limit {
            excess += *h - limit;
            *h = limit;
        }
    }

    if excess == 0 {
        return 0;
    }

    let avg_inc = excess / HISTOGRAM_BINS as u64;
    let remainder = (excess % HISTOGRAM_BINS as u64) as usize;

    for (i, h) in bins.iter_mut().enumerate() {
        *h += avg_inc;
        if i < remainder {
            *h += 1;
        }
    }

    excess
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_histogram_basic() {
        let mut bins = [0u64; HISTOGRAM_BINS];
        bins[0] = 1000;
        bins[1] = 500;
        let mut hist = Histogram::from_bins(bins);
        let excess = clip_histogram(&mut hist, 100);
        assert_eq!(excess, 1300);
        // excess 1300 = 5 per bin + 20 remainder
        assert_eq!(hist.total(), 1500);
        assert_eq!(hist.count(0), 106);
        assert_eq!(hist.count(19), 6);
        assert_eq!(hist.count(20), 5);
        assert_eq!(hist.count(255), 5);
    }

    #[test]
    fn test_clip_limit_one_conserves_mass() {
        let mut bins = [0u64; HISTOGRAM_BINS];
        bins[100] = 50;
        let mut hist = Histogram::from_bins(bins);
        clip_histogram(&mut hist, 1);

        // 49 units of excess: nothing per bin, remainder to the first 49 bins
        assert_eq!(hist.total(), 50);
        for i in 0..49u8 {
            assert_eq!(hist.count(i), 1);
        }
        for i in 49..=255u8 {
            let expected = if i == 100 { 1 } else { 0 };
            assert_eq!(hist.count(i), expected, "bin {}", i);
        }
        assert!(hist.peak() <= 1);
    }

    #[test]
    fn test_clip_histogram_below_limit_untouched() {
        let mut bins = [0u64; HISTOGRAM_BINS];
        bins[3] = 7;
        bins[9] = 4;
        let mut hist = Histogram::from_bins(bins);
        let before = hist.clone();
        assert_eq!(clip_histogram(&mut hist, 7), 0);
        assert_eq!(hist, before);
    }

    #[test]
    fn test_tiles_cover_buffer_with_remainder_at_edges() {
        let buffer = PixelBuffer::from_fn(10, 7, |x, y| (x * 20 + y) as u8).unwrap();
        let grid = build_tiles(&buffer, 2, 3, ClipLimit::Absolute(1000)).unwrap();

        assert_eq!(grid.tiles().len(), 6);
        assert_eq!(grid.tile(0, 0).x1, 3);
        assert_eq!(grid.tile(0, 2).x0, 6);
        assert_eq!(grid.tile(0, 2).x1, 10);
        assert_eq!(grid.tile(1, 0).y0, 3);
        assert_eq!(grid.tile(1, 0).y1, 7);

        let covered: usize = grid.tiles().iter().map(Tile::pixel_count).sum();
        assert_eq!(covered, 70);
        for tile in grid.tiles() {
            assert_eq!(tile.histogram.total(), tile.pixel_count() as u64);
        }
    }

    #[test]
    fn test_tile_mass_conserved_after_clipping() {
        let buffer = PixelBuffer::from_fn(64, 64, |x, y| if (x / 4 + y / 4) % 5 == 0 { 10 } else { 12 }).unwrap();
        let grid = build_tiles(&buffer, 4, 4, ClipLimit::Relative(1.5)).unwrap();
        for tile in grid.tiles() {
            assert_eq!(tile.histogram.total(), tile.pixel_count() as u64);
        }
    }

    #[test]
    fn test_tile_centers() {
        let buffer = PixelBuffer::filled(32, 8, 0).unwrap();
        let grid = build_tiles(&buffer, 1, 2, ClipLimit::Absolute(1000)).unwrap();
        assert_eq!(grid.column_centers(), vec![7.5, 23.5]);
        assert_eq!(grid.row_centers(), vec![3.5]);
    }

    #[test]
    fn test_rejects_invalid_configuration() {
        let buffer = PixelBuffer::filled(8, 8, 0).unwrap();
        let err = build_tiles(&buffer, 0, 2, ClipLimit::Absolute(4)).unwrap_err();
        assert!(err.to_string().contains("tile_rows"));
        assert!(build_tiles(&buffer, 2, 0, ClipLimit::Absolute(4)).is_err());
        assert!(build_tiles(&buffer, 2, 2, ClipLimit::Absolute(0)).is_err());
        assert!(build_tiles(&buffer, 2, 2, ClipLimit::Relative(-2.0)).is_err());
    }

    #[test]
    fn test_grid_larger_than_buffer_is_shrunk() {
        let buffer = PixelBuffer::from_fn(6, 3, |x, y| (x * 30 + y) as u8).unwrap();
        let grid = build_tiles(&buffer, 8, 8, ClipLimit::Relative(2.0)).unwrap();

        assert_eq!((grid.rows(), grid.cols()), (3, 6));
        assert!(grid.tiles().iter().all(|t| t.pixel_count() == 1));
        assert_eq!(grid.dimensions(), (6, 3));
    }

    #[test]
    fn test_flat_unclipped_tile_keeps_its_level() {
        let buffer = PixelBuffer::filled(8, 8, 50).unwrap();
        let grid = build_tiles(&buffer, 1, 1, ClipLimit::Absolute(1000)).unwrap();
        let tile = grid.tile(0, 0);
        assert_eq!(tile.clipped, 0);
        for v in [0u8, 49, 50, 51, 200, 255] {
            assert_eq!(tile.table.get(v), 50);
        }
    }
}
