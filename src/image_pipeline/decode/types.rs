//! Decoded image types

use std::path::Path;

use crate::image_pipeline::common::error::{AnalysisError, Result};

/// File extensions treated as RAW sensor captures.
const RAW_EXTENSIONS: &[&str] = &[
    "dng", "arw", "srf", "sr2", "cr2", "crw", "nef", "nrw", "raf", "orf", "rw2", "pef", "srw",
    "erf", "kdc", "dcr", "mrw", "3fr", "mos", "iiq", "rwl", "mef",
];

/// Where the bytes of an image came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// RAW sensor capture (DNG, ARW, NEF, ...)
    Raw,
    /// Already-rendered image in a standard container (JPEG, PNG, TIFF, HEIF, ...)
    Standard,
}

impl SourceKind {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let is_raw = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| RAW_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);

        if is_raw {
            SourceKind::Raw
        } else {
            SourceKind::Standard
        }
    }

    pub fn is_raw(self) -> bool {
        self == SourceKind::Raw
    }
}

/// Sensor black level, subtracted from RAW samples before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum BlackLevel {
    Scalar(f64),
    /// One value per channel or per CFA position
    PerChannel(Vec<f64>),
}

impl BlackLevel {
    /// Mean offset across channels. An empty per-channel list means no offset.
    pub fn mean(&self) -> f64 {
        match self {
            BlackLevel::Scalar(value) => *value,
            BlackLevel::PerChannel(values) if values.is_empty() => 0.0,
            BlackLevel::PerChannel(values) => values.iter().sum::<f64>() / values.len() as f64,
        }
    }
}

/// Interleaved RGB samples `[R, G, B, R, G, B, ...]`
#[derive(Debug, Clone, PartialEq)]
pub enum PixelSamples {
    U8(Vec<u8>),
    U16(Vec<u16>),
    F32(Vec<f32>),
}

impl PixelSamples {
    pub fn len(&self) -> usize {
        match self {
            PixelSamples::U8(values) => values.len(),
            PixelSamples::U16(values) => values.len(),
            PixelSamples::F32(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample `index` widened to f64.
    #[inline]
    pub(crate) fn get_f64(&self, index: usize) -> f64 {
        match self {
            PixelSamples::U8(values) => values[index] as f64,
            PixelSamples::U16(values) => values[index] as f64,
            PixelSamples::F32(values) => values[index] as f64,
        }
    }
}

/// A decoded 3-channel image with the sensor metadata needed for analysis.
///
/// Fields are private so a buffer cannot change after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    samples: PixelSamples,
    bit_depth: u32,
    black_level: Option<BlackLevel>,
}

impl PixelBuffer {
    /// Builds a buffer, checking that `samples` holds exactly `width * height * 3`
    /// values and that float samples are finite and non-negative.
    pub fn new(width: usize, height: usize, samples: PixelSamples, bit_depth: u32) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(3))
            .ok_or(AnalysisError::InvalidDimensions(width, height))?;

        if width == 0 || height == 0 || samples.len() != expected {
            return Err(AnalysisError::InvalidDimensions(width, height));
        }

        if let PixelSamples::F32(values) = &samples {
            if let Some((index, &value)) = values
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_finite() || **v < 0.0)
            {
                return Err(AnalysisError::InvalidSample { index, value });
            }
        }

        Ok(Self {
            width,
            height,
            samples,
            bit_depth,
            black_level: None,
        })
    }

    pub fn with_black_level(mut self, black_level: BlackLevel) -> Self {
        self.black_level = Some(black_level);
        self
    }

    /// Builds a buffer from three planar channels of equal size, row-major.
    pub fn from_planes(
        width: usize,
        height: usize,
        r: &[f32],
        g: &[f32],
        b: &[f32],
    ) -> Result<Self> {
        if r.len() != g.len() || g.len() != b.len() {
            return Err(AnalysisError::InvalidDimensions(width, height));
        }
        let samples = r
            .iter()
            .zip(g)
            .zip(b)
            .flat_map(|((&r, &g), &b)| [r, g, b])
            .collect();
        Self::new(width, height, PixelSamples::F32(samples), 32)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn samples(&self) -> &PixelSamples {
        &self.samples
    }

    pub fn bit_depth(&self) -> u32 {
        self.bit_depth
    }

    pub fn black_level(&self) -> Option<&BlackLevel> {
        self.black_level.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_from_path() {
        assert_eq!(SourceKind::from_path("capture.DNG"), SourceKind::Raw);
        assert_eq!(SourceKind::from_path("dir/capture.arw"), SourceKind::Raw);
        assert_eq!(SourceKind::from_path("photo.jpg"), SourceKind::Standard);
        assert_eq!(SourceKind::from_path("no_extension"), SourceKind::Standard);
    }

    #[test]
    fn test_black_level_mean() {
        assert_eq!(BlackLevel::Scalar(512.0).mean(), 512.0);
        assert_eq!(BlackLevel::PerChannel(vec![510.0, 512.0, 512.0, 514.0]).mean(), 512.0);
        assert_eq!(BlackLevel::PerChannel(vec![]).mean(), 0.0);
    }

    #[test]
    fn test_buffer_rejects_wrong_sample_count() {
        let result = PixelBuffer::new(2, 2, PixelSamples::U8(vec![0; 11]), 8);
        assert!(matches!(result, Err(AnalysisError::InvalidDimensions(2, 2))));
    }

    #[test]
    fn test_buffer_rejects_empty_image() {
        let result = PixelBuffer::new(0, 4, PixelSamples::U16(vec![]), 16);
        assert!(matches!(result, Err(AnalysisError::InvalidDimensions(0, 4))));
    }

    #[test]
    fn test_buffer_rejects_non_finite_float() {
        let result = PixelBuffer::new(1, 1, PixelSamples::F32(vec![0.5, f32::NAN, 0.1]), 32);
        assert!(matches!(result, Err(AnalysisError::InvalidSample { index: 1, .. })));

        let result = PixelBuffer::new(1, 1, PixelSamples::F32(vec![0.5, 0.2, -0.1]), 32);
        assert!(matches!(result, Err(AnalysisError::InvalidSample { index: 2, .. })));
    }

    #[test]
    fn test_from_planes_interleaves() {
        let buffer = PixelBuffer::from_planes(2, 1, &[1.0, 4.0], &[2.0, 5.0], &[3.0, 6.0]).unwrap();
        assert_eq!(
            buffer.samples(),
            &PixelSamples::F32(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        );
        assert!(buffer.black_level().is_none());
    }
}
