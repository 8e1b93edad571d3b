//! Image analysis pipeline module
//!
//! Decodes photographic captures, reduces them to chromaticity statistics and APEX
//! exposure values, and aggregates per-image results for export. Decoding, the
//! chromaticity engine, metadata extraction and session storage live in separate
//! modules; `analysis` wires them together.

pub mod analysis;
pub mod chromaticity;
pub mod common;
pub mod decode;
pub mod exposure;
pub mod session;

pub use common::{
    AnalysisConfig,
    AnalysisConfigBuilder,
    AnalysisError,
    Result,
};

pub use decode::{
    BlackLevel,
    DefaultDecoder,
    PixelBuffer,
    PixelDecoder,
    PixelSamples,
    SourceKind,
};

pub use chromaticity::{
    ChromaticityEngine,
    ChromaticityHistogram,
    ChromaticityMap,
    ChromaticityStats,
    compute_chromaticity,
};

pub use exposure::{
    ExposureExtraction,
    ExposureExtractor,
    ExposureRecord,
    MetadataParseError,
    TagReader,
    extract_exposure,
};

pub use session::{
    ArchiveExport,
    ArchiveNameCollision,
    ImageResult,
    LampCondition,
    SessionStore,
    export_archive,
};

pub use analysis::{
    BatchItem,
    ImageAnalysis,
    ImageAnalyzer,
};
