//! Exposure metadata module
//!
//! Reads ISO, aperture and shutter time from image metadata and derives APEX values.
//! Standard containers and RAW captures expose these tags differently (parsed numbers
//! vs. rational strings); both go through a [`TagReader`] and end up in the same
//! [`ExposureRecord`].

mod apex;
mod container_reader;
mod error;
mod extractor;
mod fraction;
mod raw_tag_reader;
mod tag_reader;
pub mod types;

pub use apex::{ISO_SPEED_CONSTANT, aperture_value, brightness_value, speed_value, time_value};
pub use container_reader::ContainerTagReader;
pub use error::MetadataParseError;
pub use extractor::{ExposureExtraction, ExposureExtractor, extract_exposure};
pub use fraction::parse_fraction;
pub use raw_tag_reader::RawTagReader;
pub use tag_reader::TagReader;
pub use types::{ExposureRecord, ExposureTag, TagSet, TagValue};
