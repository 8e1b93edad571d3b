use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::image_pipeline::{
    chromaticity::{ChromaticityEngine, ChromaticityHistogram, ChromaticityStats},
    common::{
        config::AnalysisConfig,
        error::{AnalysisError, Result},
    },
    decode::{DefaultDecoder, PixelDecoder, SourceKind},
    exposure::{ExposureExtraction, ExposureExtractor},
    session::{ImageResult, LampCondition},
};

/// Everything computed for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAnalysis {
    pub image_name: String,
    pub source_kind: SourceKind,
    pub width: usize,
    pub height: usize,
    pub bit_depth: u32,
    pub chromaticity: ChromaticityStats,
    pub exposure: ExposureExtraction,
    /// Present when the analyzer is configured to compute histograms
    pub histogram: Option<ChromaticityHistogram>,
}

impl ImageAnalysis {
    /// The record saved to a session for this image.
    pub fn to_result(&self, lamp_condition: LampCondition) -> ImageResult {
        self.clone().into_result(lamp_condition)
    }

    pub fn into_result(self, lamp_condition: LampCondition) -> ImageResult {
        ImageResult {
            image_name: self.image_name,
            lamp_condition,
            chromaticity: self.chromaticity,
            exposure: self.exposure.record,
        }
    }
}

/// Outcome for one file of a batch.
#[derive(Debug)]
pub struct BatchItem {
    pub path: PathBuf,
    pub outcome: Result<ImageAnalysis>,
}

/// Runs decode, chromaticity and exposure extraction for single images or batches.
pub struct ImageAnalyzer<D: PixelDecoder> {
    decoder: D,
    engine: ChromaticityEngine,
    extractor: ExposureExtractor,
    config: AnalysisConfig,
}

impl ImageAnalyzer<DefaultDecoder> {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        Self::with_custom(DefaultDecoder::default(), ExposureExtractor::default(), config)
    }
}

impl<D: PixelDecoder> ImageAnalyzer<D> {
    pub fn with_custom(
        decoder: D,
        extractor: ExposureExtractor,
        config: AnalysisConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            decoder,
            engine: ChromaticityEngine::new(&config),
            extractor,
            config,
        })
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(AnalysisError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!("Image dimensions {}x{} exceed maximum {}", width, height, max);
                return Err(AnalysisError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    /// Analyzes one encoded image.
    ///
    /// Decode and chromaticity failures are returned as errors. Metadata problems are
    /// not: they show up as absent fields and entries in `exposure.issues`.
    #[instrument(skip(self, data), fields(input_size = data.len()))]
    pub fn analyze(
        &self,
        image_name: &str,
        data: &[u8],
        kind: SourceKind,
    ) -> Result<ImageAnalysis> {
        info!("Starting image analysis");

        let buffer = {
            let _span = tracing::info_span!("decode").entered();
            self.decoder.decode(data, kind)?
        };

        {
            let _span = tracing::info_span!(
                "validate_dimensions",
                width = buffer.width(),
                height = buffer.height()
            )
            .entered();
            self.validate_dimensions(buffer.width(), buffer.height())?;
        }

        let chromaticity = {
            let _span = tracing::info_span!("chromaticity").entered();
            self.engine.compute(&buffer, kind.is_raw())?
        };

        let histogram = if self.config.compute_histogram {
            let _span =
                tracing::info_span!("histogram", bins = self.config.histogram_bins).entered();
            Some(
                self.engine
                    .map(&buffer, kind.is_raw())?
                    .histogram(self.config.histogram_bins)?,
            )
        } else {
            None
        };

        let exposure = {
            let _span = tracing::info_span!("exposure").entered();
            self.extractor.extract(kind, data)
        };

        info!(
            width = buffer.width(),
            height = buffer.height(),
            mean_r = chromaticity.mean_r,
            mean_g = chromaticity.mean_g,
            "Analysis complete"
        );

        Ok(ImageAnalysis {
            image_name: image_name.to_string(),
            source_kind: kind,
            width: buffer.width(),
            height: buffer.height(),
            bit_depth: buffer.bit_depth(),
            chromaticity,
            exposure,
            histogram,
        })
    }

    /// Reads and analyzes a file; the source kind comes from its extension.
    #[instrument(skip(self, input_path))]
    pub fn analyze_file<P: AsRef<Path>>(&self, input_path: P) -> Result<ImageAnalysis> {
        let input_path = input_path.as_ref();

        info!(input = %input_path.display(), "Analyzing file");

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                AnalysisError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let image_name = input_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| input_path.display().to_string());

        self.analyze(&image_name, &input_data, SourceKind::from_path(input_path))
    }

    /// Analyzes many files in parallel. Items come back in input order and a failing
    /// file never affects the others.
    pub fn analyze_batch<P>(&self, paths: &[P]) -> Vec<BatchItem>
    where
        P: AsRef<Path> + Sync,
        D: Sync,
    {
        info!("Analyzing batch of {} file(s)", paths.len());

        paths
            .par_iter()
            .map(|path| BatchItem {
                path: path.as_ref().to_path_buf(),
                outcome: self.analyze_file(path),
            })
            .collect()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AnalysisConfig) -> Result<()> {
        config.validate()?;
        self.engine = ChromaticityEngine::new(&config);
        self.config = config;
        Ok(())
    }
}
