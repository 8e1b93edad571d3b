use image::{ColorType, DynamicImage};
use tracing::debug;

use crate::image_pipeline::common::error::{AnalysisError, Result};
use crate::image_pipeline::decode::reader::PixelDecoder;
use crate::image_pipeline::decode::types::{PixelBuffer, PixelSamples, SourceKind};

/// Reader for already-rendered images (JPEG, PNG, TIFF, ...) backed by the `image` crate.
///
/// The native sample depth is kept: 8-bit sources stay u8, 16-bit sources stay u16,
/// float sources become f32. Alpha and luma-only layouts are expanded to RGB.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardImageReader;

impl StandardImageReader {
    fn to_buffer(image: DynamicImage) -> Result<PixelBuffer> {
        let width = image.width() as usize;
        let height = image.height() as usize;

        match image.color() {
            ColorType::L16 | ColorType::La16 | ColorType::Rgb16 | ColorType::Rgba16 => {
                let rgb = image.into_rgb16();
                PixelBuffer::new(width, height, PixelSamples::U16(rgb.into_raw()), 16)
            }
            ColorType::Rgb32F | ColorType::Rgba32F => {
                let rgb = image.into_rgb32f();
                PixelBuffer::new(width, height, PixelSamples::F32(rgb.into_raw()), 32)
            }
            _ => {
                let rgb = image.into_rgb8();
                PixelBuffer::new(width, height, PixelSamples::U8(rgb.into_raw()), 8)
            }
        }
    }
}

impl PixelDecoder for StandardImageReader {
    fn decode(&self, data: &[u8], _kind: SourceKind) -> Result<PixelBuffer> {
        debug!("Decoding standard image, {} bytes", data.len());

        let image = image::load_from_memory(data)
            .map_err(|e| AnalysisError::DecodeError(e.to_string()))?;

        debug!(
            "Decoded image: {}x{} ({:?})",
            image.width(),
            image.height(),
            image.color()
        );

        Self::to_buffer(image)
    }
}
