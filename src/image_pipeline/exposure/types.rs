//! Exposure record and tag types

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical exposure settings plus their APEX values.
///
/// Every APEX field is `None` when its input is absent or outside the logarithm's
/// domain; `bv` additionally needs all of `sv`, `av` and `tv`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExposureRecord {
    #[serde(rename = "ISOSpeedRatings", default)]
    pub iso: Option<f64>,
    #[serde(rename = "FNumber", default)]
    pub f_number: Option<f64>,
    #[serde(rename = "ExposureTime", default)]
    pub exposure_time: Option<f64>,
    #[serde(rename = "S_v", default)]
    pub sv: Option<f64>,
    #[serde(rename = "A_v", default)]
    pub av: Option<f64>,
    #[serde(rename = "T_v", default)]
    pub tv: Option<f64>,
    #[serde(rename = "B_v", default)]
    pub bv: Option<f64>,
}

/// The three tags the exposure record is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposureTag {
    Iso,
    FNumber,
    ExposureTime,
}

impl ExposureTag {
    pub const ALL: [ExposureTag; 3] =
        [ExposureTag::Iso, ExposureTag::FNumber, ExposureTag::ExposureTime];

    /// Tag names to try, in order. EXIF 2.3 renamed ISOSpeedRatings (0x8827) to
    /// PhotographicSensitivity.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            ExposureTag::Iso => &["ISOSpeedRatings", "PhotographicSensitivity"],
            ExposureTag::FNumber => &["FNumber"],
            ExposureTag::ExposureTime => &["ExposureTime"],
        }
    }
}

/// A tag value as delivered by a reader, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Number(value) => write!(f, "{}", value),
            TagValue::Text(text) => f.write_str(text),
        }
    }
}

/// Tag name to value, ordered by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagSet {
    tags: BTreeMap<String, TagValue>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first value seen for a name.
    pub fn insert(&mut self, name: impl Into<String>, value: TagValue) {
        self.tags.entry(name.into()).or_insert(value);
    }

    pub fn get(&self, name: &str) -> Option<&TagValue> {
        self.tags.get(name)
    }

    /// First alias of `tag` present in the set, with the name it was found under.
    pub fn find(&self, tag: ExposureTag) -> Option<(&'static str, &TagValue)> {
        tag.aliases()
            .iter()
            .find_map(|&name| self.tags.get(name).map(|value| (name, value)))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TagValue)> {
        self.tags.iter()
    }

    pub fn to_display_map(&self) -> BTreeMap<String, String> {
        self.tags
            .iter()
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect()
    }
}

impl FromIterator<(String, TagValue)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (String, TagValue)>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_uses_alias_order() {
        let set: TagSet = [
            ("PhotographicSensitivity".to_string(), TagValue::Number(200.0)),
            ("ISOSpeedRatings".to_string(), TagValue::Number(100.0)),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            set.find(ExposureTag::Iso),
            Some(("ISOSpeedRatings", &TagValue::Number(100.0)))
        );
        assert_eq!(set.find(ExposureTag::FNumber), None);
    }

    #[test]
    fn test_first_insert_wins() {
        let mut set = TagSet::new();
        set.insert("FNumber", TagValue::Text("28/10".to_string()));
        set.insert("FNumber", TagValue::Text("4/1".to_string()));
        assert_eq!(set.get("FNumber"), Some(&TagValue::Text("28/10".to_string())));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_record_serializes_absent_fields_as_null() {
        let record = ExposureRecord {
            iso: Some(100.0),
            ..ExposureRecord::default()
        };
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(json["ISOSpeedRatings"], 100.0);
        assert!(json["B_v"].is_null());
        assert!(json["FNumber"].is_null());
    }
}
