//! Image decoding module
//!
//! Thin adapters over external decoders. RAW captures go through rawloader (and the
//! `bayer` crate for mosaiced sensors), standard images through the `image` crate.
//! Both produce a [`PixelBuffer`] carrying bit depth and, for RAW, the black level.

mod cpu_debayer;
mod rawloader_reader;
mod reader;
mod standard_reader;
pub mod types;

pub use cpu_debayer::CpuDebayer;
pub use rawloader_reader::RawLoaderReader;
pub use reader::{DefaultDecoder, PixelDecoder};
pub use standard_reader::StandardImageReader;
pub use types::{BlackLevel, PixelBuffer, PixelSamples, SourceKind};
