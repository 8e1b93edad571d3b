//! Chromaticity module
//!
//! Normalizes a decoded pixel buffer and reduces it to per-pixel and aggregate
//! chromaticity values.

mod engine;
mod histogram;
pub mod types;

pub use engine::{ChromaticityEngine, compute_chromaticity};
pub use histogram::ChromaticityHistogram;
pub use types::{ChromaticityMap, ChromaticityStats};
