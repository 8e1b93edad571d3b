use crate::image_pipeline::exposure::types::ExposureRecord;

/// Ratio between arithmetic ISO speed and the APEX speed scale (`Sv = log2(ISO / 3.3333)`).
pub const ISO_SPEED_CONSTANT: f64 = 3.3333;

/// `log2(x)` for finite positive `x`, otherwise `None`.
fn checked_log2(x: f64) -> Option<f64> {
    (x.is_finite() && x > 0.0)
        .then(|| x.log2())
        .filter(|value| value.is_finite())
}

pub fn speed_value(iso: f64) -> Option<f64> {
    checked_log2(iso / ISO_SPEED_CONSTANT)
}

pub fn aperture_value(f_number: f64) -> Option<f64> {
    checked_log2(f_number).map(|log| 2.0 * log)
}

pub fn time_value(exposure_time: f64) -> Option<f64> {
    checked_log2(exposure_time).map(|log| -log)
}

/// `Bv = Av + Tv - Sv`, only when all three are known.
pub fn brightness_value(sv: Option<f64>, av: Option<f64>, tv: Option<f64>) -> Option<f64> {
    match (sv, av, tv) {
        (Some(sv), Some(av), Some(tv)) => Some(av + tv - sv),
        _ => None,
    }
}

impl ExposureRecord {
    /// Derives the APEX values from whichever inputs are present.
    pub fn from_exposure(
        iso: Option<f64>,
        f_number: Option<f64>,
        exposure_time: Option<f64>,
    ) -> Self {
        let sv = iso.and_then(speed_value);
        let av = f_number.and_then(aperture_value);
        let tv = exposure_time.and_then(time_value);

        Self {
            iso,
            f_number,
            exposure_time,
            sv,
            av,
            tv,
            bv: brightness_value(sv, av, tv),
        }
    }
}
