use crate::buffer::PixelBuffer;
use crate::histogram::{Cdf, HISTOGRAM_BINS};
use rayon::prelude::*;

/// 256-entry intensity lookup table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemapTable([u8; HISTOGRAM_BINS]);

impl RemapTable {
    pub fn identity() -> Self {
        let mut table = [0u8; HISTOGRAM_BINS];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }
        Self(table)
    }

    pub fn from_array(table: [u8; HISTOGRAM_BINS]) -> Self {
        Self(table)
    }

    /// Equalization mapping `round((cdf[v] - cdf_min) / (N - cdf_min) * 255)`.
    ///
    /// Intensities with `cdf[v] == 0` map to 0. Returns `None` when the CDF
    /// has a single occupied level (`N == cdf_min`), leaving the fallback to
    /// the caller.
    pub fn equalizing(cdf: &Cdf) -> Option<Self> {
        let total = cdf.total();
        let cdf_min = cdf.min_nonzero()?;
        if total == cdf_min {
            return None;
        }

        let range = (total - cdf_min) as f64;
        let mut table = [0u8; HISTOGRAM_BINS];
        for (slot, &c) in table.iter_mut().zip(cdf.values().iter()) {
            if c > 0 {
                let v = ((c - cdf_min) as f64 / range * 255.0).round();
                *slot = v.clamp(0.0, 255.0) as u8;
            }
        }
        Some(Self(table))
    }

    /// Table sending every intensity to `level`
    pub fn constant(level: u8) -> Self {
        Self([level; HISTOGRAM_BINS])
    }

    #[inline]
    pub fn get(&self, value: u8) -> u8 {
        self.0[value as usize]
    }

    pub fn is_monotonic(&self) -> bool {
        self.0.windows(2).all(|w| w[0] <= w[1])
    }

    /// New buffer with every sample passed through the table.
    pub fn apply(&self, buffer: &PixelBuffer) -> PixelBuffer {
        let data: Vec<u8> = buffer.as_raw().par_iter().map(|&v| self.get(v)).collect();
        let (width, height) = buffer.dimensions();
        PixelBuffer::from_parts(width, height, data)
    }
}

impl Default for RemapTable {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Histogram;

    #[test]
    fn test_equalizing_spreads_to_full_range() {
        let histogram = Histogram::from_samples(&[10, 10, 20, 20, 30, 30, 40, 40]).unwrap();
        let table = RemapTable::equalizing(&histogram.cdf()).unwrap();
        assert_eq!(table.get(10), 0);
        assert_eq!(table.get(20), 85);
        assert_eq!(table.get(30), 170);
        assert_eq!(table.get(40), 255);
        assert_eq!(table.get(5), 0);
        assert!(table.is_monotonic());
    }

    #[test]
    fn test_equalizing_degenerate_returns_none() {
        let histogram = Histogram::from_samples(&[77; 9]).unwrap();
        assert!(RemapTable::equalizing(&histogram.cdf()).is_none());
    }

    #[test]
    fn test_constant_ignores_input() {
        let table = RemapTable::constant(50);
        assert_eq!(table.get(0), 50);
        assert_eq!(table.get(255), 50);
        assert!(table.is_monotonic());
    }

    #[test]
    fn test_apply_builds_new_buffer() {
        let buffer = PixelBuffer::from_fn(4, 2, |x, _| x as u8).unwrap();
        let mut table = [0u8; HISTOGRAM_BINS];
        table[1] = 100;
        table[3] = 200;
        let out = RemapTable::from_array(table).apply(&buffer);
        assert_eq!(out.dimensions(), (4, 2));
        assert_eq!(out.row(0), &[0, 100, 0, 200]);
        assert_eq!(buffer.row(0), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_identity() {
        let table = RemapTable::default();
        assert_eq!(table, RemapTable::from_array(std::array::from_fn(|i| i as u8)));
        assert!(table.is_monotonic());
        assert_eq!(table.get(123), 123);
    }
}
