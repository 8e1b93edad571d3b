//! Common utilities module
//!
//! This module contains the error type and configuration shared across the image pipeline.

pub mod config;
pub mod error;

pub use config::{AnalysisConfig, AnalysisConfigBuilder};
pub use error::{AnalysisError, Result};
