use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Invalid pixel sample at index {index}: {value}")]
    InvalidSample { index: usize, value: f32 },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("No valid pixels: every pixel is below the chromaticity threshold")]
    NoValidPixels,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown lamp condition: {0:?}")]
    UnknownLampCondition(String),

    #[error("Failed to write archive: {0}")]
    ArchiveError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for AnalysisError {
    fn from(err: zip::result::ZipError) -> Self {
        AnalysisError::ArchiveError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
