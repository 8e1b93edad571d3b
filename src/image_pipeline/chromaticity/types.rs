//! Chromaticity result types

use serde::{Deserialize, Serialize};

/// Aggregate chromaticity of one image.
///
/// `mean_*` and `std_*` describe the `r/(r+g+b)` and `g/(r+g+b)` ratios over valid
/// pixels only. `max_*` are the largest *normalized channel values* over every pixel,
/// valid or not, and so report saturation rather than color. The blue ratio is left
/// implicit; `mean_r + mean_g <= 1` holds for these reductions but is not part of the
/// record's contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChromaticityStats {
    pub mean_r: f64,
    pub mean_g: f64,
    pub std_r: f64,
    pub std_g: f64,
    pub max_r: f64,
    pub max_g: f64,
    pub max_b: f64,
}

/// Per-pixel chromaticity planes, row-major. Invalid pixels hold 0 in every plane.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromaticityMap {
    pub width: usize,
    pub height: usize,
    pub r: Vec<f64>,
    pub g: Vec<f64>,
    pub b: Vec<f64>,
    pub valid: Vec<bool>,
}

impl ChromaticityMap {
    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|&&v| v).count()
    }
}
