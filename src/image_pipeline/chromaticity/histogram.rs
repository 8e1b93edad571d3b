use crate::image_pipeline::chromaticity::types::ChromaticityMap;
use crate::image_pipeline::common::config::MAX_HISTOGRAM_BINS;
use crate::image_pipeline::common::error::{AnalysisError, Result};

/// 2-D histogram of (r, g) chromaticity over `[0, 1] x [0, 1]`.
///
/// Counts are stored row-major with one row per g bin, so `counts[g_bin * bins + r_bin]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromaticityHistogram {
    bins: usize,
    counts: Vec<u64>,
}

impl ChromaticityHistogram {
    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn count(&self, r_bin: usize, g_bin: usize) -> u64 {
        self.counts[g_bin * self.bins + r_bin]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Fullest bin as `(r_bin, g_bin, count)`, lowest index on ties.
    pub fn peak(&self) -> Option<(usize, usize, u64)> {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .fold(None, |best: Option<(usize, u64)>, (index, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((index, count)),
            })
            .map(|(index, count)| (index % self.bins, index / self.bins, count))
    }

    /// Center of bin `index` on either axis.
    pub fn bin_center(&self, index: usize) -> f64 {
        (index as f64 + 0.5) / self.bins as f64
    }

    fn bin_of(&self, value: f64) -> usize {
        ((value * self.bins as f64) as usize).min(self.bins - 1)
    }
}

impl ChromaticityMap {
    /// Bins the valid pixels of the map. Invalid pixels are not counted.
    pub fn histogram(&self, bins: usize) -> Result<ChromaticityHistogram> {
        let cells = bins
            .checked_mul(bins)
            .filter(|_| (1..=MAX_HISTOGRAM_BINS).contains(&bins))
            .ok_or_else(|| {
                AnalysisError::InvalidConfig(format!(
                    "histogram needs between 1 and {} bins, got {}",
                    MAX_HISTOGRAM_BINS, bins
                ))
            })?;

        let mut histogram = ChromaticityHistogram {
            bins,
            counts: vec![0; cells],
        };

        for ((&r, &g), _) in self
            .r
            .iter()
            .zip(&self.g)
            .zip(&self.valid)
            .filter(|(_, valid)| **valid)
        {
            let index = histogram.bin_of(g) * bins + histogram.bin_of(r);
            histogram.counts[index] += 1;
        }

        Ok(histogram)
    }
}
