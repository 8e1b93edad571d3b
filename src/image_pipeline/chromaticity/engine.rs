use tracing::{debug, instrument};

use crate::image_pipeline::common::config::{AnalysisConfig, DEFAULT_VALIDITY_THRESHOLD};
use crate::image_pipeline::common::error::{AnalysisError, Result};
use crate::image_pipeline::chromaticity::types::{ChromaticityMap, ChromaticityStats};
use crate::image_pipeline::decode::types::PixelBuffer;

/// Maps raw samples into `[0, 1]`.
///
/// RAW buffers first lose their mean black level (clamped at zero), then every
/// channel is divided by the one global maximum so channel ratios survive.
#[derive(Debug, Clone, Copy)]
struct Normalizer {
    offset: f64,
    max: f64,
}

impl Normalizer {
    fn for_buffer(buffer: &PixelBuffer, is_raw: bool) -> Result<Self> {
        let offset = if is_raw {
            buffer.black_level().map(|level| level.mean()).unwrap_or(0.0)
        } else {
            0.0
        };

        let samples = buffer.samples();
        let raw_max = (0..samples.len())
            .map(|i| samples.get_f64(i))
            .fold(0.0_f64, f64::max);
        let max = (raw_max - offset).max(0.0);

        debug!(offset, max, "Normalization parameters");

        if max <= 0.0 {
            return Err(AnalysisError::NoValidPixels);
        }
        Ok(Self { offset, max })
    }

    #[inline]
    fn apply(&self, sample: f64) -> f64 {
        (sample - self.offset).max(0.0) / self.max
    }

    fn pixels<'a>(&'a self, buffer: &'a PixelBuffer) -> impl Iterator<Item = [f64; 3]> + 'a {
        let samples = buffer.samples();
        (0..buffer.pixel_count()).map(move |p| {
            let base = p * 3;
            [
                self.apply(samples.get_f64(base)),
                self.apply(samples.get_f64(base + 1)),
                self.apply(samples.get_f64(base + 2)),
            ]
        })
    }
}

/// Computes chromaticity statistics from pixel buffers.
///
/// Holds no state besides its threshold, so one engine can be shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct ChromaticityEngine {
    validity_threshold: f64,
}

impl Default for ChromaticityEngine {
    fn default() -> Self {
        Self {
            validity_threshold: DEFAULT_VALIDITY_THRESHOLD,
        }
    }
}

impl ChromaticityEngine {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            validity_threshold: config.validity_threshold,
        }
    }

    pub fn validity_threshold(&self) -> f64 {
        self.validity_threshold
    }

    /// Reduces `buffer` to [`ChromaticityStats`].
    ///
    /// Pixels whose normalized `r + g + b` does not exceed the validity threshold are
    /// left out of the means and standard deviations but still count toward the channel
    /// maxima. Returns [`AnalysisError::NoValidPixels`] when no pixel is valid.
    #[instrument(skip(self, buffer), fields(width = buffer.width(), height = buffer.height()))]
    pub fn compute(&self, buffer: &PixelBuffer, is_raw: bool) -> Result<ChromaticityStats> {
        let normalizer = Normalizer::for_buffer(buffer, is_raw)?;

        let mut valid = 0usize;
        let mut sum_r = 0.0;
        let mut sum_g = 0.0;
        let mut max = [0.0_f64; 3];

        for [r, g, b] in normalizer.pixels(buffer) {
            max[0] = max[0].max(r);
            max[1] = max[1].max(g);
            max[2] = max[2].max(b);

            let total = r + g + b;
            if total > self.validity_threshold {
                valid += 1;
                sum_r += r / total;
                sum_g += g / total;
            }
        }

        if valid == 0 {
            return Err(AnalysisError::NoValidPixels);
        }

        let count = valid as f64;
        let mean_r = sum_r / count;
        let mean_g = sum_g / count;

        // Second pass keeps the variance numerically stable without storing the ratios.
        let mut sq_r = 0.0;
        let mut sq_g = 0.0;
        for [r, g, b] in normalizer.pixels(buffer) {
            let total = r + g + b;
            if total > self.validity_threshold {
                sq_r += (r / total - mean_r).powi(2);
                sq_g += (g / total - mean_g).powi(2);
            }
        }

        debug!(valid, total = buffer.pixel_count(), "Chromaticity reduction complete");

        Ok(ChromaticityStats {
            mean_r,
            mean_g,
            std_r: (sq_r / count).sqrt(),
            std_g: (sq_g / count).sqrt(),
            max_r: max[0],
            max_g: max[1],
            max_b: max[2],
        })
    }

    /// Per-pixel chromaticity planes using the same normalization and mask as [`compute`].
    ///
    /// [`compute`]: ChromaticityEngine::compute
    pub fn map(&self, buffer: &PixelBuffer, is_raw: bool) -> Result<ChromaticityMap> {
        let normalizer = Normalizer::for_buffer(buffer, is_raw)?;
        let pixel_count = buffer.pixel_count();

        let mut map = ChromaticityMap {
            width: buffer.width(),
            height: buffer.height(),
            r: Vec::with_capacity(pixel_count),
            g: Vec::with_capacity(pixel_count),
            b: Vec::with_capacity(pixel_count),
            valid: Vec::with_capacity(pixel_count),
        };

        for [r, g, b] in normalizer.pixels(buffer) {
            let total = r + g + b;
            let is_valid = total > self.validity_threshold;
            let (rc, gc, bc) = if is_valid {
                (r / total, g / total, b / total)
            } else {
                (0.0, 0.0, 0.0)
            };
            map.r.push(rc);
            map.g.push(gc);
            map.b.push(bc);
            map.valid.push(is_valid);
        }

        Ok(map)
    }
}

/// Computes chromaticity statistics with the default validity threshold.
pub fn compute_chromaticity(buffer: &PixelBuffer, is_raw: bool) -> Result<ChromaticityStats> {
    ChromaticityEngine::default().compute(buffer, is_raw)
}
