use std::io::Cursor;

use exif::{Exif, Field, In};

use crate::image_pipeline::exposure::error::MetadataParseError;
use crate::image_pipeline::exposure::types::TagSet;

/// Reads the metadata tags of one encoded image.
pub trait TagReader: Send + Sync {
    fn read_tags(&self, data: &[u8]) -> Result<TagSet, MetadataParseError>;
}

/// Parses the EXIF block of any container kamadak-exif understands (TIFF-based RAW,
/// JPEG, HEIF, PNG, WebP).
pub(crate) fn read_exif(data: &[u8]) -> Result<Exif, MetadataParseError> {
    exif::Reader::new()
        .read_from_container(&mut Cursor::new(data))
        .map_err(|e| MetadataParseError::Unreadable(e.to_string()))
}

/// Fields describing the main image, skipping thumbnail directories.
pub(crate) fn primary_fields(exif: &Exif) -> impl Iterator<Item = &Field> {
    exif.fields().filter(|field| field.ifd_num == In::PRIMARY)
}
