//! Command-line argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use uvsn_rs::image_pipeline::LampCondition;

#[derive(Debug, Parser)]
#[command(
    name = "uvsn",
    version,
    about = "Chromaticity and exposure analysis of photographic captures"
)]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze images captured under one lamp condition
    Analyze(AnalyzeArgs),
    /// List the accepted lamp condition labels
    Lamps,
}

#[derive(Debug, clap::Args)]
pub struct AnalyzeArgs {
    /// Images to analyze (RAW captures are recognized by extension)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Lamp condition label, e.g. "222 Ushio" or "sunlight"
    #[arg(short, long, value_parser = parse_lamp)]
    pub lamp: LampCondition,

    /// Write a zip archive of per-image JSON records here
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also compute an N x N chromaticity histogram per image and report its peak
    #[arg(long, value_name = "N")]
    pub histogram_bins: Option<usize>,

    /// Print every metadata tag read from each image
    #[arg(long)]
    pub show_tags: bool,

    /// Pixels with a normalized channel sum at or below this are ignored
    #[arg(long, default_value_t = 1e-6)]
    pub threshold: f64,
}

fn parse_lamp(value: &str) -> Result<LampCondition, String> {
    value.parse().map_err(|e: uvsn_rs::image_pipeline::AnalysisError| e.to_string())
}
