use anyhow::{Result, anyhow};
use bayer::{BayerDepth, CFA, Demosaic, RasterDepth, RasterMut};
use std::io::Cursor;
use tracing::debug;

/// Expands a single-channel Bayer mosaic into interleaved RGB with linear interpolation.
///
/// No black level, white balance or color matrix is applied: sensor values pass
/// through unchanged so the chromaticity engine sees the camera's native response.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpuDebayer;

impl CpuDebayer {
    pub fn new() -> Self {
        Self
    }

    /// Maps a decoder pattern name such as `"RGGB"` to the `bayer` crate's CFA.
    pub fn cfa_from_name(name: &str) -> Result<CFA> {
        match name.to_ascii_uppercase().as_str() {
            "RGGB" => Ok(CFA::RGGB),
            "BGGR" => Ok(CFA::BGGR),
            "GRBG" => Ok(CFA::GRBG),
            "GBRG" => Ok(CFA::GBRG),
            other => Err(anyhow!("unsupported CFA pattern {:?}", other)),
        }
    }

    pub fn process(
        &self,
        mosaic: &[u16],
        width: usize,
        height: usize,
        bits_per_sample: u32,
        cfa: CFA,
    ) -> Result<Vec<u16>> {
        debug!("Starting CPU debayering for image {}x{}", width, height);

        if mosaic.len() != width * height {
            return Err(anyhow!(
                "mosaic holds {} samples, expected {}x{}",
                mosaic.len(),
                width,
                height
            ));
        }

        // bayer crate only supports 8 and 16 bit
        let (bayer_depth, raster_depth, bytes_per_pixel) = if bits_per_sample <= 8 {
            (BayerDepth::Depth8, RasterDepth::Depth8, 1)
        } else {
            (BayerDepth::Depth16LE, RasterDepth::Depth16, 2)
        };

        let bayer_bytes: Vec<u8> = if bytes_per_pixel == 1 {
            mosaic.iter().map(|&val| val as u8).collect()
        } else {
            mosaic.iter().flat_map(|&val| val.to_le_bytes()).collect()
        };

        let mut output_buf = vec![0u8; width * height * 3 * bytes_per_pixel];
        let mut cursor = Cursor::new(&bayer_bytes[..]);

        {
            let mut output_raster = RasterMut::new(width, height, raster_depth, &mut output_buf);
            bayer::run_demosaic(
                &mut cursor,
                bayer_depth,
                cfa,
                Demosaic::Linear,
                &mut output_raster,
            )
            .map_err(|e| anyhow!("Demosaic failed: {:?}", e))?;
        }

        let rgb = if bytes_per_pixel == 1 {
            output_buf.iter().map(|&b| b as u16).collect()
        } else {
            output_buf
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect()
        };

        debug!("Debayering complete");
        Ok(rgb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cfa_from_name() {
        assert!(matches!(CpuDebayer::cfa_from_name("rggb"), Ok(CFA::RGGB)));
        assert!(matches!(CpuDebayer::cfa_from_name("GBRG"), Ok(CFA::GBRG)));
        assert!(CpuDebayer::cfa_from_name("RGBE").is_err());
    }

    #[test]
    fn test_rejects_mismatched_mosaic() {
        let result = CpuDebayer::new().process(&[0u16; 5], 2, 2, 12, CFA::RGGB);
        assert!(result.is_err());
    }

    #[test]
    fn test_uniform_mosaic_stays_uniform() {
        let mosaic = vec![1000u16; 4 * 4];
        let rgb = CpuDebayer::new().process(&mosaic, 4, 4, 12, CFA::RGGB).unwrap();
        assert_eq!(rgb.len(), 4 * 4 * 3);
        assert!(rgb.iter().all(|&v| v == 1000));
    }
}
