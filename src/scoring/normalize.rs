use serde::Serialize;

use crate::error::{Result, ScreeningError};
use crate::numeric::round2;
use crate::patient::Trimester;
use crate::tables::{Analyte, NormTable, RangeStatus};

/// Maternal weight the reference medians are normalised to
pub const REFERENCE_WEIGHT_KG: f64 = 65.0;

/// A measurement expressed as a multiple of the gestational-week median.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MomResult {
    pub analyte: Analyte,
    pub measured: f64,
    /// MoM rounded to two decimals
    pub ratio: f64,
    pub median: f64,
    pub weight_corrected: bool,
    pub range: RangeStatus,
    /// Raw measurement above the analyte's hard cutoff, for markers that have one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub above_cutoff: Option<bool>,
}

/// Convert a raw measurement into a MoM ratio.
///
/// Weight correction divides by `sqrt(weight / 65)` and is only applied for
/// first-trimester evaluations of weight-corrected analytes. Second-trimester
/// norms carry the flag too but are left uncorrected.
pub fn normalize(
    norms: &NormTable,
    measured: f64,
    analyte: Analyte,
    week: u32,
    maternal_weight_kg: Option<f64>,
    trimester: Trimester,
) -> Result<MomResult> {
    if measured < 0.0 || !measured.is_finite() {
        return Err(ScreeningError::InvalidMeasurement {
            analyte,
            value: measured,
        });
    }
    if let Some(kg) = maternal_weight_kg {
        if kg <= 0.0 || !kg.is_finite() {
            return Err(ScreeningError::NonPositiveWeight(kg));
        }
    }

    let norm = norms.get(analyte)?;
    let median = norm.median_for(week);

    let (ratio, weight_corrected) = if median <= 0.0 {
        (1.0, false)
    } else {
        let mut mom = measured / median;
        let mut corrected = false;
        if let Some(kg) = maternal_weight_kg {
            if trimester == Trimester::First && norm.weight_corrected {
                mom /= (kg / REFERENCE_WEIGHT_KG).sqrt();
                corrected = true;
            }
        }
        (round2(mom), corrected)
    };

    tracing::debug!(%analyte, measured, median, ratio, weight_corrected, "normalized marker");

    Ok(MomResult {
        analyte,
        measured,
        ratio,
        median,
        weight_corrected,
        range: norm.range_status(ratio),
        above_cutoff: norm.exceeds_cutoff(measured),
    })
}
