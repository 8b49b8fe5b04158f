//! Intensity histograms and cumulative distributions
//!
//! Used for diagnostics and as the building block of both equalization passes.

use crate::buffer::PixelBuffer;
use crate::error::EnhanceError;
use serde::{Deserialize, Serialize};

/// Number of intensity levels in an 8-bit channel
pub const HISTOGRAM_BINS: usize = 256;

/// Per-intensity pixel counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    bins: [u64; HISTOGRAM_BINS],
}

impl Histogram {
    pub fn from_bins(bins: [u64; HISTOGRAM_BINS]) -> Self {
        Self { bins }
    }

    /// Count every sample. An empty slice is rejected.
    pub fn from_samples(samples: &[u8]) -> Result<Self, EnhanceError> {
        if samples.is_empty() {
            return Err(EnhanceError::InvalidInput(
                "cannot build a histogram from zero pixels".to_string(),
            ));
        }

        let mut bins = [0u64; HISTOGRAM_BINS];
        for &v in samples {
            bins[v as usize] += 1;
        }
        Ok(Self { bins })
    }

    pub fn bins(&self) -> &[u64; HISTOGRAM_BINS] {
        &self.bins
    }

    pub(crate) fn bins_mut(&mut self) -> &mut [u64; HISTOGRAM_BINS] {
        &mut self.bins
    }

    pub fn count(&self, value: u8) -> u64 {
        self.bins[value as usize]
    }

    pub fn total(&self) -> u64 {
        self.bins.iter().sum()
    }

    /// Largest single bin count
    pub fn peak(&self) -> u64 {
        self.bins.iter().copied().max().unwrap_or(0)
    }

    /// Number of distinct intensities present
    pub fn occupied_bins(&self) -> usize {
        self.bins.iter().filter(|&&c| c > 0).count()
    }

    pub fn cdf(&self) -> Cdf {
        let mut values = [0u64; HISTOGRAM_BINS];
        let mut running = 0u64;
        for (slot, &count) in values.iter_mut().zip(self.bins.iter()) {
            running += count;
            *slot = running;
        }
        Cdf { values }
    }
}

/// Running prefix sum of a histogram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cdf {
    values: [u64; HISTOGRAM_BINS],
}

impl Cdf {
    pub fn values(&self) -> &[u64; HISTOGRAM_BINS] {
        &self.values
    }

    pub fn get(&self, value: u8) -> u64 {
        self.values[value as usize]
    }

    pub fn total(&self) -> u64 {
        self.values[HISTOGRAM_BINS - 1]
    }

    /// Smallest non-zero cumulative count, i.e. the count of the darkest
    /// occupied intensity.
    pub fn min_nonzero(&self) -> Option<u64> {
        self.values.iter().copied().find(|&c| c > 0)
    }

    /// CDF rescaled so its maximum matches the histogram peak, for plotting
    /// both curves on one axis. Never used for remapping.
    pub fn normalized(&self, histogram: &Histogram) -> Vec<f64> {
        let total = self.total();
        if total == 0 {
            return vec![0.0; HISTOGRAM_BINS];
        }
        let scale = histogram.peak() as f64 / total as f64;
        self.values.iter().map(|&c| c as f64 * scale).collect()
    }
}

/// Histogram and CDF of a whole buffer
pub fn analyze(buffer: &PixelBuffer) -> Result<(Histogram, Cdf), EnhanceError> {
    let histogram = Histogram::from_samples(buffer.as_raw())?;
    let cdf = histogram.cdf();
    Ok((histogram, cdf))
}

/// Serializable histogram panel for diagnostic charts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramReport {
    pub label: String,
    pub pixel_count: u64,
    pub peak: u64,
    pub histogram: Vec<u64>,
    pub cdf: Vec<u64>,
    pub cdf_normalized: Vec<f64>,
}

impl HistogramReport {
    pub fn from_buffer(label: &str, buffer: &PixelBuffer) -> Result<Self, EnhanceError> {
        let (histogram, cdf) = analyze(buffer)?;
        Ok(Self {
            label: label.to_string(),
            pixel_count: histogram.total(),
            peak: histogram.peak(),
            histogram: histogram.bins().to_vec(),
            cdf: cdf.values().to_vec(),
            cdf_normalized: cdf.normalized(&histogram),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_counts_every_pixel() {
        let buffer = PixelBuffer::from_fn(16, 8, |x, y| ((x + y) * 7) as u8).unwrap();
        let (histogram, cdf) = analyze(&buffer).unwrap();
        assert_eq!(histogram.total(), 128);
        assert_eq!(cdf.total(), 128);
        assert_eq!(histogram.count(0), 1);
    }

    #[test]
    fn test_cdf_is_prefix_sum() {
        let histogram = Histogram::from_samples(&[3, 3, 5, 9, 9, 9]).unwrap();
        let cdf = histogram.cdf();
        assert_eq!(cdf.get(2), 0);
        assert_eq!(cdf.get(3), 2);
        assert_eq!(cdf.get(4), 2);
        assert_eq!(cdf.get(5), 3);
        assert_eq!(cdf.get(9), 6);
        assert_eq!(cdf.get(255), 6);
        assert_eq!(cdf.min_nonzero(), Some(2));
        assert!(cdf.values().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_empty_samples_rejected() {
        assert!(matches!(
            Histogram::from_samples(&[]),
            Err(EnhanceError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_normalized_cdf_peaks_at_histogram_max() {
        let histogram = Histogram::from_samples(&[0, 0, 0, 0, 10, 200]).unwrap();
        let normalized = histogram.cdf().normalized(&histogram);
        assert_eq!(normalized.len(), HISTOGRAM_BINS);
        assert!((normalized[255] - 4.0).abs() < 1e-9);
        assert!((normalized[0] - 4.0 * 4.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_report_matches_analysis() {
        let buffer = PixelBuffer::filled(4, 4, 42).unwrap();
        let report = HistogramReport::from_buffer("flat", &buffer).unwrap();
        assert_eq!(report.label, "flat");
        assert_eq!(report.pixel_count, 16);
        assert_eq!(report.peak, 16);
        assert_eq!(report.histogram[42], 16);
        assert_eq!(report.cdf[41], 0);
        assert_eq!(report.cdf[42], 16);
    }
}
