use super::tiles::TileGrid;
use crate::buffer::PixelBuffer;
use crate::error::EnhanceError;
use rayon::prelude::*;

/// Neighbouring tile indices along one axis and the weight of the second.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisWeight {
    lo: usize,
    hi: usize,
    weight: f64,
}

/// Interpolation weights for every coordinate `0..len` given ascending tile
/// centres. Coordinates outside the first/last centre clamp to that tile.
fn axis_weights(len: u32, centers: &[f64]) -> Vec<AxisWeight> {
    let last = centers.len() - 1;
    let mut lo = 0usize;

    (0..len)
        .map(|p| {
            let p = p as f64;
            if p <= centers[0] {
                return AxisWeight {
                    lo: 0,
                    hi: 0,
                    weight: 0.0,
                };
            }
            if p >= centers[last] {
                return AxisWeight {
                    lo: last,
                    hi: last,
                    weight: 0.0,
                };
            }

            while centers[lo + 1] <= p {
                lo += 1;
            }
            let span = centers[lo + 1] - centers[lo];
            AxisWeight {
                lo,
                hi: lo + 1,
                weight: (p - centers[lo]) / span,
            }
        })
        .collect()
}

/// Remap every pixel through its (up to) four neighbouring tile tables and
/// blend the results bilinearly.
pub fn apply(buffer: &PixelBuffer, grid: &TileGrid) -> Result<PixelBuffer, EnhanceError> {
    if buffer.dimensions() != grid.dimensions() {
        let (gw, gh) = grid.dimensions();
        return Err(EnhanceError::InvalidInput(format!(
            "tile grid built for {}x{} cannot be applied to {}x{} buffer",
            gw,
            gh,
            buffer.width(),
            buffer.height()
        )));
    }

    let (width, height) = buffer.dimensions();
    let cols = grid.cols() as usize;
    let xs = axis_weights(width, &grid.column_centers());
    let ys = axis_weights(height, &grid.row_centers());
    let tables: Vec<_> = grid.tiles().iter().map(|t| t.table).collect();

    let mut output = vec![0u8; width as usize * height as usize];

    output
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, out_row)| {
            let wy = ys[y];
            let src_row = buffer.row(y as u32);
            let top = &tables[wy.lo * cols..(wy.lo + 1) * cols];
            let bottom = &tables[wy.hi * cols..(wy.hi + 1) * cols];

            for ((out, &val), wx) in out_row.iter_mut().zip(src_row).zip(&xs) {
                let tl = top[wx.lo].get(val) as f64;
                let tr = top[wx.hi].get(val) as f64;
                let bl = bottom[wx.lo].get(val) as f64;
                let br = bottom[wx.hi].get(val) as f64;

                let upper = tl * (1.0 - wx.weight) + tr * wx.weight;
                let lower = bl * (1.0 - wx.weight) + br * wx.weight;
                let result = upper * (1.0 - wy.weight) + lower * wy.weight;

                *out = result.round().clamp(0.0, 255.0) as u8;
            }
        });

    PixelBuffer::new(width, height, output)
}
