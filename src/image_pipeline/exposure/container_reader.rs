use exif::Value;
use tracing::debug;

use crate::image_pipeline::exposure::error::MetadataParseError;
use crate::image_pipeline::exposure::tag_reader::{TagReader, primary_fields, read_exif};
use crate::image_pipeline::exposure::types::{TagSet, TagValue};

/// Tag reader for standard containers: numeric tags arrive already parsed.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContainerTagReader;

/// First element of a numeric value, rationals evaluated.
fn first_number(value: &Value) -> Option<f64> {
    match value {
        Value::Byte(v) => v.first().map(|&x| x as f64),
        Value::Short(v) => v.first().map(|&x| x as f64),
        Value::Long(v) => v.first().map(|&x| x as f64),
        Value::SByte(v) => v.first().map(|&x| x as f64),
        Value::SShort(v) => v.first().map(|&x| x as f64),
        Value::SLong(v) => v.first().map(|&x| x as f64),
        Value::Float(v) => v.first().map(|&x| x as f64),
        Value::Double(v) => v.first().copied(),
        Value::Rational(v) => v.first().map(|r| r.to_f64()),
        Value::SRational(v) => v.first().map(|r| r.to_f64()),
        _ => None,
    }
}

impl TagReader for ContainerTagReader {
    fn read_tags(&self, data: &[u8]) -> Result<TagSet, MetadataParseError> {
        let exif = read_exif(data)?;

        let tags: TagSet = primary_fields(&exif)
            .map(|field| {
                let value = first_number(&field.value)
                    .map(TagValue::Number)
                    .unwrap_or_else(|| TagValue::Text(field.display_value().to_string()));
                (field.tag.to_string(), value)
            })
            .collect();

        debug!("Read {} container tags", tags.len());
        Ok(tags)
    }
}
