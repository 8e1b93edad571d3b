//! Chromaticity and APEX exposure analysis for RAW and standard photographic images.

pub mod image_pipeline;
pub mod logger;
