use thiserror::Error;

/// Non-fatal metadata problems. Each one downgrades a single value to absent and is
/// reported alongside the extracted record instead of aborting extraction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetadataParseError {
    #[error("Metadata could not be read: {0}")]
    Unreadable(String),

    #[error("Malformed value for {tag}: {value:?}")]
    Malformed { tag: String, value: String },

    #[error("{field} is outside its domain: {value}")]
    OutOfDomain { field: &'static str, value: f64 },
}
