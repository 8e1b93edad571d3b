use exif::Value;
use tracing::debug;

use crate::image_pipeline::exposure::error::MetadataParseError;
use crate::image_pipeline::exposure::tag_reader::{TagReader, primary_fields, read_exif};
use crate::image_pipeline::exposure::types::{TagSet, TagValue};

/// Tag reader for TIFF-based RAW captures.
///
/// Values are kept in their on-disk textual form: rationals as `"num/denom"`, lists as
/// `"[a, b]"`. Normalization into numbers happens later through the fraction parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawTagReader;

fn render<T, F>(items: &[T], mut render_one: F) -> Option<String>
where
    F: FnMut(&T) -> String,
{
    match items {
        [] => None,
        [single] => Some(render_one(single)),
        many => Some(format!(
            "[{}]",
            many.iter().map(render_one).collect::<Vec<_>>().join(", ")
        )),
    }
}

fn raw_text(value: &Value) -> Option<String> {
    match value {
        Value::Byte(v) => render(v, |x| x.to_string()),
        Value::Short(v) => render(v, |x| x.to_string()),
        Value::Long(v) => render(v, |x| x.to_string()),
        Value::SByte(v) => render(v, |x| x.to_string()),
        Value::SShort(v) => render(v, |x| x.to_string()),
        Value::SLong(v) => render(v, |x| x.to_string()),
        Value::Float(v) => render(v, |x| x.to_string()),
        Value::Double(v) => render(v, |x| x.to_string()),
        Value::Rational(v) => render(v, |r| format!("{}/{}", r.num, r.denom)),
        Value::SRational(v) => render(v, |r| format!("{}/{}", r.num, r.denom)),
        Value::Ascii(v) => render(v, |s| {
            String::from_utf8_lossy(s).trim_end_matches('\0').to_string()
        }),
        _ => None,
    }
}

impl TagReader for RawTagReader {
    fn read_tags(&self, data: &[u8]) -> Result<TagSet, MetadataParseError> {
        let exif = read_exif(data)?;

        let tags: TagSet = primary_fields(&exif)
            .map(|field| {
                let text = raw_text(&field.value)
                    .unwrap_or_else(|| field.display_value().to_string());
                (field.tag.to_string(), TagValue::Text(text))
            })
            .collect();

        debug!("Read {} raw tags", tags.len());
        Ok(tags)
    }
}
