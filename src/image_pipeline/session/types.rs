//! Session record types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::image_pipeline::chromaticity::types::ChromaticityStats;
use crate::image_pipeline::common::error::AnalysisError;
use crate::image_pipeline::exposure::types::ExposureRecord;

/// Illumination source an image was captured under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LampCondition {
    #[serde(rename = "222 Ushio")]
    Ushio222,
    #[serde(rename = "222 Nukit")]
    Nukit222,
    #[serde(rename = "222 Lumen")]
    Lumen222,
    #[serde(rename = "222 Unfiltered")]
    Unfiltered222,
    #[serde(rename = "207 KrBr")]
    KrBr207,
    #[serde(rename = "254")]
    Nm254,
    #[serde(rename = "265 LED")]
    Led265,
    #[serde(rename = "280 LED")]
    Led280,
    #[serde(rename = "295 LED")]
    Led295,
    #[serde(rename = "302")]
    Nm302,
    #[serde(rename = "365")]
    Nm365,
    #[serde(rename = "sunlight")]
    Sunlight,
    #[serde(rename = "Room light (fluorescent)")]
    RoomLight,
}

impl LampCondition {
    /// Every condition, in display order.
    pub const ALL: [LampCondition; 13] = [
        LampCondition::Ushio222,
        LampCondition::Nukit222,
        LampCondition::Lumen222,
        LampCondition::Unfiltered222,
        LampCondition::KrBr207,
        LampCondition::Nm254,
        LampCondition::Led265,
        LampCondition::Led280,
        LampCondition::Led295,
        LampCondition::Nm302,
        LampCondition::Nm365,
        LampCondition::Sunlight,
        LampCondition::RoomLight,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LampCondition::Ushio222 => "222 Ushio",
            LampCondition::Nukit222 => "222 Nukit",
            LampCondition::Lumen222 => "222 Lumen",
            LampCondition::Unfiltered222 => "222 Unfiltered",
            LampCondition::KrBr207 => "207 KrBr",
            LampCondition::Nm254 => "254",
            LampCondition::Led265 => "265 LED",
            LampCondition::Led280 => "280 LED",
            LampCondition::Led295 => "295 LED",
            LampCondition::Nm302 => "302",
            LampCondition::Nm365 => "365",
            LampCondition::Sunlight => "sunlight",
            LampCondition::RoomLight => "Room light (fluorescent)",
        }
    }
}

impl fmt::Display for LampCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LampCondition {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        LampCondition::ALL
            .into_iter()
            .find(|lamp| lamp.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AnalysisError::UnknownLampCondition(s.to_string()))
    }
}

/// One saved analysis, as exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResult {
    pub image_name: String,
    pub lamp_condition: LampCondition,
    pub chromaticity: ChromaticityStats,
    #[serde(rename = "exif_and_brightness")]
    pub exposure: ExposureRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_from_str() {
        for lamp in LampCondition::ALL {
            assert_eq!(lamp.label().parse::<LampCondition>().unwrap(), lamp);
        }
    }

    #[test]
    fn test_from_str_is_lenient_about_case_and_spaces() {
        assert_eq!(" SUNLIGHT ".parse::<LampCondition>().unwrap(), LampCondition::Sunlight);
        assert_eq!("265 led".parse::<LampCondition>().unwrap(), LampCondition::Led265);
    }

    #[test]
    fn test_unknown_label_rejected() {
        assert!(matches!(
            "candle".parse::<LampCondition>(),
            Err(AnalysisError::UnknownLampCondition(_))
        ));
        assert!("2540".parse::<LampCondition>().is_err());
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&LampCondition::RoomLight).unwrap();
        assert_eq!(json, "\"Room light (fluorescent)\"");
        let lamp: LampCondition = serde_json::from_str("\"207 KrBr\"").unwrap();
        assert_eq!(lamp, LampCondition::KrBr207);
    }

    #[test]
    fn test_record_shape() {
        let result = ImageResult {
            image_name: "IMG_0001.dng".to_string(),
            lamp_condition: LampCondition::Nm254,
            chromaticity: ChromaticityStats {
                mean_r: 0.4,
                mean_g: 0.35,
                std_r: 0.01,
                std_g: 0.02,
                max_r: 1.0,
                max_g: 0.8,
                max_b: 0.5,
            },
            exposure: ExposureRecord::from_exposure(Some(100.0), None, Some(0.01)),
        };

        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["lamp_condition"], "254");
        assert_eq!(json["chromaticity"]["mean_g"], 0.35);
        assert_eq!(json["exif_and_brightness"]["ISOSpeedRatings"], 100.0);
        assert!(json["exif_and_brightness"]["A_v"].is_null());
        assert!(json["exif_and_brightness"]["B_v"].is_null());
    }
}
