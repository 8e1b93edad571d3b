use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::decode::rawloader_reader::RawLoaderReader;
use crate::image_pipeline::decode::standard_reader::StandardImageReader;
use crate::image_pipeline::decode::types::{PixelBuffer, SourceKind};

/// Turns encoded image bytes into an RGB pixel buffer.
pub trait PixelDecoder {
    fn decode(&self, data: &[u8], kind: SourceKind) -> Result<PixelBuffer>;
}

/// Dispatches RAW captures to rawloader and everything else to the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultDecoder {
    raw: RawLoaderReader,
    standard: StandardImageReader,
}

impl PixelDecoder for DefaultDecoder {
    fn decode(&self, data: &[u8], kind: SourceKind) -> Result<PixelBuffer> {
        match kind {
            SourceKind::Raw => self.raw.decode(data, kind),
            SourceKind::Standard => self.standard.decode(data, kind),
        }
    }
}
