//! Analysis pipeline module
//!
//! Orchestrates decode → chromaticity → exposure extraction for one image or a batch.

mod pipeline;


pub use pipeline::{BatchItem, ImageAnalysis, ImageAnalyzer};
