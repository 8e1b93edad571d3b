//! RAW image decoding using the rawloader library.
//!
//! Supports any format rawloader can decode (ARW, CR2, NEF, DNG, RAF, ...). Mosaiced
//! sensor data is expanded to RGB with [`CpuDebayer`]; the black level travels with the
//! buffer so the chromaticity engine can subtract it before normalization.

use std::io::Cursor;

use rawloader::{CFA as RawloaderCFA, RawImageData as RawloaderImageData};
use tracing::{debug, warn};

use crate::image_pipeline::common::error::{AnalysisError, Result};
use crate::image_pipeline::decode::cpu_debayer::CpuDebayer;
use crate::image_pipeline::decode::reader::PixelDecoder;
use crate::image_pipeline::decode::types::{BlackLevel, PixelBuffer, PixelSamples, SourceKind};

/// RAW image reader that uses the rawloader library for decoding.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawLoaderReader;

/// Default bit depth when no white level information is available from the RAW file.
const DEFAULT_BITS_PER_SAMPLE: u32 = 16;

/// The bit width of the u16 data type, used for calculating actual bits per sample.
const U16_BITS: u32 = 16;

/// Minimum number of bits needed to represent the sensor's white level,
/// e.g. 4095 -> 12 bits, 16383 -> 14 bits.
fn bits_from_white_level(whitelevels: &[u16]) -> u32 {
    let max_white_level = whitelevels.iter().max().copied().unwrap_or(u16::MAX);
    if max_white_level == 0 {
        DEFAULT_BITS_PER_SAMPLE
    } else {
        U16_BITS - max_white_level.leading_zeros()
    }
}

/// Visible-area bounds from rawloader's `[top, right, bottom, left]` crop margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CropArea {
    top: usize,
    left: usize,
    width: usize,
    height: usize,
}

impl CropArea {
    /// Returns `None` when the margins leave no visible pixels.
    fn from_margins(width: usize, height: usize, crops: [usize; 4]) -> Option<Self> {
        let [top, right, bottom, left] = crops;
        let visible_width = width.checked_sub(left)?.checked_sub(right)?;
        let visible_height = height.checked_sub(top)?.checked_sub(bottom)?;
        if visible_width == 0 || visible_height == 0 {
            return None;
        }
        Some(Self {
            top,
            left,
            width: visible_width,
            height: visible_height,
        })
    }

    fn is_full_frame(&self, width: usize, height: usize) -> bool {
        self.width == width && self.height == height
    }

    /// Copies the visible rows and columns out of a row-major frame with `cpp`
    /// samples per pixel.
    fn apply(&self, samples: &[u16], frame_width: usize, cpp: usize) -> Vec<u16> {
        let row_len = frame_width * cpp;
        if row_len == 0 {
            return Vec::new();
        }
        samples
            .chunks_exact(row_len)
            .skip(self.top)
            .take(self.height)
            .flat_map(|row| &row[self.left * cpp..(self.left + self.width) * cpp])
            .copied()
            .collect()
    }
}

/// Two-by-two pattern name of `cfa` as seen from pixel `(top, left)`, so the demosaic
/// phase matches a cropped mosaic.
fn cfa_name_at(cfa: &RawloaderCFA, top: usize, left: usize) -> String {
    const COLORS: [char; 4] = ['R', 'G', 'B', 'E'];
    [(0, 0), (0, 1), (1, 0), (1, 1)]
        .iter()
        .map(|&(row, col)| {
            COLORS
                .get(cfa.color_at(top + row, left + col))
                .copied()
                .unwrap_or('?')
        })
        .collect()
}

impl PixelDecoder for RawLoaderReader {
    /// Decodes RAW bytes into an RGB buffer.
    ///
    /// 1. Decodes the file with rawloader
    /// 2. Converts samples to u16 (float RAW data is scaled to the u16 range)
    /// 3. Derives the bit depth from the sensor white level
    /// 4. Crops to the visible area, dropping masked sensor borders
    /// 5. Demosaics single-channel data using the decoder's CFA pattern
    fn decode(&self, data: &[u8], _kind: SourceKind) -> Result<PixelBuffer> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| AnalysisError::DecodeError(e.to_string()))?;

        debug!(
            "Decoded image: {}x{}, {} component(s) per pixel, crops {:?}",
            decoded.width, decoded.height, decoded.cpp, decoded.crops
        );

        let samples: Vec<u16> = match decoded.data {
            RawloaderImageData::Integer(values) => values,
            RawloaderImageData::Float(values) => values
                .iter()
                .map(|&v| (v.clamp(0.0, 1.0) * u16::MAX as f32) as u16)
                .collect(),
        };

        let bits_per_sample = bits_from_white_level(&decoded.whitelevels);
        debug!(
            "Calculated bits_per_sample: {} (white levels: {:?}, black levels: {:?})",
            bits_per_sample, decoded.whitelevels, decoded.blacklevels
        );

        let crop = match CropArea::from_margins(decoded.width, decoded.height, decoded.crops) {
            Some(crop) => crop,
            None => {
                warn!("Crop margins {:?} leave no visible area, using full frame", decoded.crops);
                CropArea {
                    top: 0,
                    left: 0,
                    width: decoded.width,
                    height: decoded.height,
                }
            }
        };
        let samples = if crop.is_full_frame(decoded.width, decoded.height) {
            samples
        } else {
            crop.apply(&samples, decoded.width, decoded.cpp)
        };
        let (width, height) = (crop.width, crop.height);

        let rgb = match decoded.cpp {
            1 => {
                let pattern = cfa_name_at(&decoded.cfa, crop.top, crop.left);
                let cfa = CpuDebayer::cfa_from_name(&pattern)
                    .map_err(|e| AnalysisError::UnsupportedFormat(e.to_string()))?;
                CpuDebayer::new()
                    .process(&samples, width, height, bits_per_sample, cfa)
                    .map_err(|e| AnalysisError::DecodeError(e.to_string()))?
            }
            3 => samples,
            cpp => {
                return Err(AnalysisError::UnsupportedFormat(format!(
                    "{} components per pixel",
                    cpp
                )));
            }
        };

        let black_level =
            BlackLevel::PerChannel(decoded.blacklevels.iter().map(|&b| b as f64).collect());

        Ok(PixelBuffer::new(width, height, PixelSamples::U16(rgb), bits_per_sample)?
            .with_black_level(black_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_from_white_level() {
        assert_eq!(bits_from_white_level(&[4095, 4095, 4095, 4095]), 12);
        assert_eq!(bits_from_white_level(&[16383, 16383, 16383, 16383]), 14);
        assert_eq!(bits_from_white_level(&[0, 0, 0, 0]), DEFAULT_BITS_PER_SAMPLE);
        assert_eq!(bits_from_white_level(&[]), 16);
    }

    #[test]
    fn test_crop_keeps_visible_mosaic() {
        // 5x4 mosaic with a two-column masked border on the left and one row on top.
        let mosaic: Vec<u16> = (0..20).collect();
        let crop = CropArea::from_margins(5, 4, [1, 0, 0, 2]).unwrap();

        assert_eq!((crop.width, crop.height), (3, 3));
        assert_eq!(crop.apply(&mosaic, 5, 1), vec![7, 8, 9, 12, 13, 14, 17, 18, 19]);
    }

    #[test]
    fn test_crop_interleaved_rgb() {
        let frame: Vec<u16> = (0..2 * 2 * 3).collect();
        let crop = CropArea::from_margins(2, 2, [0, 1, 1, 0]).unwrap();
        assert_eq!(crop.apply(&frame, 2, 3), vec![0, 1, 2]);
    }

    #[test]
    fn test_crop_margins_without_visible_area() {
        assert_eq!(CropArea::from_margins(4, 4, [2, 0, 2, 0]), None);
        assert_eq!(CropArea::from_margins(4, 4, [0, 3, 0, 3]), None);
        assert!(CropArea::from_margins(4, 4, [0; 4]).unwrap().is_full_frame(4, 4));
    }

    #[test]
    fn test_cfa_phase_follows_crop_offset() {
        let cfa = RawloaderCFA::new("RGGB");
        assert_eq!(cfa_name_at(&cfa, 0, 0), "RGGB");
        assert_eq!(cfa_name_at(&cfa, 0, 1), "GRBG");
        assert_eq!(cfa_name_at(&cfa, 1, 0), "GBRG");
        assert_eq!(cfa_name_at(&cfa, 1, 1), "BGGR");
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let result = RawLoaderReader.decode(b"definitely not a raw file", SourceKind::Raw);
        assert!(matches!(result, Err(AnalysisError::DecodeError(_))));
    }
}
