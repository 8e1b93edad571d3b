//! Analysis configuration types

use crate::image_pipeline::common::error::{AnalysisError, Result};

/// Pixels whose normalized channel sum is at or below this value have no
/// defined chromaticity.
pub const DEFAULT_VALIDITY_THRESHOLD: f64 = 1e-6;

/// Suffix replacing the image extension in archive entry names.
pub const DEFAULT_ARCHIVE_SUFFIX: &str = "_stats.json";

pub const DEFAULT_HISTOGRAM_BINS: usize = 100;

/// Upper bound on histogram bins per axis; the grid holds `bins * bins` counters.
pub const MAX_HISTOGRAM_BINS: usize = 4096;

/// Configuration for image analysis
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Minimum normalized `r + g + b` for a pixel to count as valid
    pub validity_threshold: f64,
    /// Whether to validate image dimensions after decoding
    pub validate_dimensions: bool,
    /// Largest accepted width or height, if any
    pub max_dimension: Option<usize>,
    /// Suffix for archive entry names (`<stem><suffix>`)
    pub archive_suffix: String,
    /// Whether analyses also bin their pixels into a chromaticity histogram
    pub compute_histogram: bool,
    /// Bins per axis for chromaticity histograms
    pub histogram_bins: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            validity_threshold: DEFAULT_VALIDITY_THRESHOLD,
            validate_dimensions: true,
            max_dimension: None,
            archive_suffix: DEFAULT_ARCHIVE_SUFFIX.to_string(),
            compute_histogram: false,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

impl AnalysisConfig {
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.validity_threshold.is_finite() || self.validity_threshold <= 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "validity_threshold must be positive and finite, got {}",
                self.validity_threshold
            )));
        }
        if self.histogram_bins == 0 || self.histogram_bins > MAX_HISTOGRAM_BINS {
            return Err(AnalysisError::InvalidConfig(format!(
                "histogram_bins must be between 1 and {}, got {}",
                MAX_HISTOGRAM_BINS, self.histogram_bins
            )));
        }
        if !self.archive_suffix.ends_with(".json") {
            return Err(AnalysisError::InvalidConfig(format!(
                "archive_suffix must end with .json, got {:?}",
                self.archive_suffix
            )));
        }
        Ok(())
    }
}

/// Builder for AnalysisConfig
#[derive(Default)]
pub struct AnalysisConfigBuilder {
    validity_threshold: Option<f64>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
    archive_suffix: Option<String>,
    compute_histogram: Option<bool>,
    histogram_bins: Option<usize>,
}

impl AnalysisConfigBuilder {
    pub fn validity_threshold(mut self, threshold: f64) -> Self {
        self.validity_threshold = Some(threshold);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn archive_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.archive_suffix = Some(suffix.into());
        self
    }

    pub fn compute_histogram(mut self, enable: bool) -> Self {
        self.compute_histogram = Some(enable);
        self
    }

    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    pub fn build(self) -> AnalysisConfig {
        let default = AnalysisConfig::default();
        AnalysisConfig {
            validity_threshold: self.validity_threshold.unwrap_or(default.validity_threshold),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
            archive_suffix: self.archive_suffix.unwrap_or(default.archive_suffix),
            compute_histogram: self.compute_histogram.unwrap_or(default.compute_histogram),
            histogram_bins: self.histogram_bins.unwrap_or(default.histogram_bins),
        }
    }
}
