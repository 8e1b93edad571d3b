use std::collections::BTreeMap;

use tracing::{debug, instrument, warn};

use crate::image_pipeline::decode::types::SourceKind;
use crate::image_pipeline::exposure::container_reader::ContainerTagReader;
use crate::image_pipeline::exposure::error::MetadataParseError;
use crate::image_pipeline::exposure::fraction::parse_fraction;
use crate::image_pipeline::exposure::raw_tag_reader::RawTagReader;
use crate::image_pipeline::exposure::tag_reader::TagReader;
use crate::image_pipeline::exposure::types::{ExposureRecord, ExposureTag, TagSet, TagValue};

/// Everything learned from an image's metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureExtraction {
    pub record: ExposureRecord,
    /// Every primary-image tag, for display and auditing
    pub tags: BTreeMap<String, String>,
    /// Problems that downgraded a value to absent
    pub issues: Vec<MetadataParseError>,
}

impl ExposureExtraction {
    /// The tag map as `name: value` lines, sorted by name.
    pub fn describe(&self) -> String {
        self.tags
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Builds [`ExposureRecord`]s, choosing a tag reader by source kind.
pub struct ExposureExtractor {
    raw_reader: Box<dyn TagReader>,
    container_reader: Box<dyn TagReader>,
}

impl Default for ExposureExtractor {
    fn default() -> Self {
        Self::with_readers(Box::new(RawTagReader), Box::new(ContainerTagReader))
    }
}

impl ExposureExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_readers(
        raw_reader: Box<dyn TagReader>,
        container_reader: Box<dyn TagReader>,
    ) -> Self {
        Self {
            raw_reader,
            container_reader,
        }
    }

    fn reader_for(&self, kind: SourceKind) -> &dyn TagReader {
        match kind {
            SourceKind::Raw => self.raw_reader.as_ref(),
            SourceKind::Standard => self.container_reader.as_ref(),
        }
    }

    /// Extracts the exposure record from `data`. Never fails: unreadable metadata yields
    /// an empty record and an issue explaining why.
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub fn extract(&self, kind: SourceKind, data: &[u8]) -> ExposureExtraction {
        let mut issues = Vec::new();

        let tags = self.reader_for(kind).read_tags(data).unwrap_or_else(|issue| {
            issues.push(issue);
            TagSet::new()
        });

        let iso = canonical_value(&tags, ExposureTag::Iso, &mut issues);
        let f_number = canonical_value(&tags, ExposureTag::FNumber, &mut issues);
        let exposure_time = canonical_value(&tags, ExposureTag::ExposureTime, &mut issues);

        let record = ExposureRecord::from_exposure(iso, f_number, exposure_time);

        for (field, input, derived) in [
            ("ISOSpeedRatings", record.iso, record.sv),
            ("FNumber", record.f_number, record.av),
            ("ExposureTime", record.exposure_time, record.tv),
        ] {
            if let (Some(value), None) = (input, derived) {
                issues.push(MetadataParseError::OutOfDomain { field, value });
            }
        }

        for issue in &issues {
            warn!("{}", issue);
        }
        debug!(?record, tag_count = tags.len(), "Exposure extraction complete");

        ExposureExtraction {
            record,
            tags: tags.to_display_map(),
            issues,
        }
    }
}

/// Looks up `tag` and normalizes it to a finite number.
fn canonical_value(
    tags: &TagSet,
    tag: ExposureTag,
    issues: &mut Vec<MetadataParseError>,
) -> Option<f64> {
    let (name, value) = tags.find(tag)?;

    let parsed = match value {
        TagValue::Number(number) => Some(*number).filter(|n| n.is_finite()),
        TagValue::Text(text) => parse_fraction(text),
    };

    if parsed.is_none() {
        issues.push(MetadataParseError::Malformed {
            tag: name.to_string(),
            value: value.to_string(),
        });
    }
    parsed
}

/// Extracts exposure metadata with the default readers.
pub fn extract_exposure(kind: SourceKind, data: &[u8]) -> ExposureExtraction {
    ExposureExtractor::default().extract(kind, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockTagReader {
        tags: Option<Vec<(&'static str, TagValue)>>,
    }

    impl TagReader for MockTagReader {
        fn read_tags(&self, _data: &[u8]) -> Result<TagSet, MetadataParseError> {
            match &self.tags {
                Some(tags) => Ok(tags
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.clone()))
                    .collect()),
                None => Err(MetadataParseError::Unreadable("Mock read error".to_string())),
            }
        }
    }

    fn extractor_with(raw: Option<Vec<(&'static str, TagValue)>>) -> ExposureExtractor {
        ExposureExtractor::with_readers(
            Box::new(MockTagReader { tags: raw }),
            Box::new(MockTagReader { tags: None }),
        )
    }

    fn text(value: &str) -> TagValue {
        TagValue::Text(value.to_string())
    }

    /// Little-endian TIFF with an EXIF directory holding ExposureTime, FNumber and ISO.
    fn exif_tiff(exposure: (u32, u32), f_number: (u32, u32), iso: u16) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"II");
        bytes.extend_from_slice(&42u16.to_le_bytes());
        bytes.extend_from_slice(&8u32.to_le_bytes());

        // IFD0 at 8: one entry pointing at the EXIF IFD at 26.
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&0x8769u16.to_le_bytes());
        bytes.extend_from_slice(&4u16.to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&26u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());

        // EXIF IFD at 26: three entries, rationals stored at 68 and 76.
        bytes.extend_from_slice(&3u16.to_le_bytes());
        for (tag, kind, value) in [(0x829Au16, 5u16, 68u32), (0x829D, 5, 76)] {
            bytes.extend_from_slice(&tag.to_le_bytes());
            bytes.extend_from_slice(&kind.to_le_bytes());
            bytes.extend_from_slice(&1u32.to_le_bytes());
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes.extend_from_slice(&0x8827u16.to_le_bytes());
        bytes.extend_from_slice(&3u16.to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&iso.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());

        for (num, denom) in [exposure, f_number] {
            bytes.extend_from_slice(&num.to_le_bytes());
            bytes.extend_from_slice(&denom.to_le_bytes());
        }
        assert_eq!(bytes.len(), 84);
        bytes
    }

    #[test]
    fn test_raw_fraction_strings_normalized() {
        let extractor = extractor_with(Some(vec![
            ("ISOSpeedRatings", text("100")),
            ("FNumber", text("28/10")),
            ("ExposureTime", text("1/125")),
        ]));

        let extraction = extractor.extract(SourceKind::Raw, b"raw bytes");

        let expected = ExposureRecord::from_exposure(Some(100.0), Some(2.8), Some(1.0 / 125.0));
        assert_eq!(extraction.record, expected);
        assert!(extraction.record.bv.is_some());
        assert!(extraction.issues.is_empty());
        assert_eq!(extraction.tags["ExposureTime"], "1/125");
    }

    #[test]
    fn test_malformed_value_only_drops_its_field() {
        let extractor = extractor_with(Some(vec![
            ("ISOSpeedRatings", text("ISO one hundred")),
            ("FNumber", text("4/1")),
            ("ExposureTime", text("1/0")),
        ]));

        let extraction = extractor.extract(SourceKind::Raw, b"");

        assert_eq!(extraction.record.iso, None);
        assert_eq!(extraction.record.exposure_time, None);
        assert_eq!(extraction.record.av, Some(4.0));
        assert_eq!(extraction.record.bv, None);
        assert_eq!(extraction.issues.len(), 2);
        assert!(extraction
            .issues
            .iter()
            .all(|i| matches!(i, MetadataParseError::Malformed { .. })));
    }

    #[test]
    fn test_zero_iso_reported_out_of_domain() {
        let extractor = extractor_with(Some(vec![
            ("PhotographicSensitivity", TagValue::Number(0.0)),
            ("FNumber", TagValue::Number(2.0)),
            ("ExposureTime", TagValue::Number(0.25)),
        ]));

        let extraction = extractor.extract(SourceKind::Raw, b"");

        assert_eq!(extraction.record.iso, Some(0.0));
        assert_eq!(extraction.record.sv, None);
        assert_eq!(extraction.record.av, Some(2.0));
        assert_eq!(extraction.record.tv, Some(2.0));
        assert_eq!(
            extraction.issues,
            vec![MetadataParseError::OutOfDomain {
                field: "ISOSpeedRatings",
                value: 0.0
            }]
        );
    }

    #[test]
    fn test_unreadable_metadata_yields_empty_record() {
        let extraction = extractor_with(None).extract(SourceKind::Raw, b"");

        assert_eq!(extraction.record, ExposureRecord::default());
        assert!(extraction.tags.is_empty());
        assert!(matches!(extraction.issues[..], [MetadataParseError::Unreadable(_)]));
    }

    #[test]
    fn test_reader_selected_by_source_kind() {
        let extractor = extractor_with(Some(vec![("FNumber", text("2"))]));

        assert_eq!(extractor.extract(SourceKind::Raw, b"").record.f_number, Some(2.0));
        assert_eq!(extractor.extract(SourceKind::Standard, b"").record.f_number, None);
    }

    #[test]
    fn test_non_finite_number_rejected() {
        let extractor =
            extractor_with(Some(vec![("ExposureTime", TagValue::Number(f64::INFINITY))]));
        let extraction = extractor.extract(SourceKind::Raw, b"");
        assert_eq!(extraction.record.exposure_time, None);
        assert_eq!(extraction.issues.len(), 1);
    }

    #[test]
    fn test_container_reader_reads_numbers() {
        let data = exif_tiff((1, 125), (28, 10), 100);

        let extraction = ExposureExtractor::new().extract(SourceKind::Standard, &data);

        assert_eq!(extraction.record.iso, Some(100.0));
        assert_eq!(extraction.record.f_number, Some(2.8));
        assert_eq!(extraction.record.exposure_time, Some(1.0 / 125.0));
        assert!(extraction.record.bv.is_some());
        assert_eq!(extraction.tags["ExposureTime"], "0.008");
    }

    #[test]
    fn test_raw_reader_reads_fraction_text() {
        let data = exif_tiff((1, 125), (28, 10), 100);

        let extraction = extract_exposure(SourceKind::Raw, &data);

        assert_eq!(extraction.tags["ExposureTime"], "1/125");
        assert_eq!(extraction.tags["FNumber"], "28/10");
        assert_eq!(extraction.record.f_number, Some(2.8));
        assert_eq!(extraction.record.exposure_time, Some(1.0 / 125.0));
        assert!(extraction.describe().contains("FNumber: 28/10"));
    }

    #[test]
    fn test_garbage_bytes_are_not_fatal() {
        let extraction = extract_exposure(SourceKind::Standard, b"not an image");
        assert_eq!(extraction.record, ExposureRecord::default());
        assert_eq!(extraction.issues.len(), 1);
    }
}
