use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, ScreeningError};
use crate::patient::Trimester;

/// Biochemical and ultrasound markers the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Analyte {
    /// Nuchal translucency (ultrasound, mm)
    Nt,
    /// Pregnancy-associated plasma protein A
    PappA,
    /// Free beta human chorionic gonadotropin
    FreeBetaHcg,
    /// Alpha-fetoprotein
    Afp,
    /// Total human chorionic gonadotropin
    TotalHcg,
    /// Unconjugated estriol
    Ue3,
}

impl Analyte {
    pub const ALL: [Analyte; 6] = [
        Analyte::Nt,
        Analyte::PappA,
        Analyte::FreeBetaHcg,
        Analyte::Afp,
        Analyte::TotalHcg,
        Analyte::Ue3,
    ];

    /// Trimester in which this analyte is part of the screening panel.
    pub fn trimester(self) -> Trimester {
        match self {
            Analyte::Nt | Analyte::PappA | Analyte::FreeBetaHcg => Trimester::First,
            Analyte::Afp | Analyte::TotalHcg | Analyte::Ue3 => Trimester::Second,
        }
    }

    /// Human-readable marker name
    pub fn label(self) -> &'static str {
        match self {
            Analyte::Nt => "NT",
            Analyte::PappA => "PAPP-A",
            Analyte::FreeBetaHcg => "Free β-hCG",
            Analyte::Afp => "AFP",
            Analyte::TotalHcg => "Total hCG",
            Analyte::Ue3 => "uE3",
        }
    }

    /// Key used in configuration files
    pub fn key(self) -> &'static str {
        match self {
            Analyte::Nt => "NT",
            Analyte::PappA => "PAPP_A",
            Analyte::FreeBetaHcg => "FREE_BETA_HCG",
            Analyte::Afp => "AFP",
            Analyte::TotalHcg => "TOTAL_HCG",
            Analyte::Ue3 => "UE3",
        }
    }
}

impl fmt::Display for Analyte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Where a MoM ratio falls relative to the analyte's acceptable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeStatus {
    Low,
    Normal,
    High,
}

/// Reference data for one analyte.
///
/// Example YAML:
/// ```yaml
/// unit: U/L
/// medians: { 10: 1.0, 11: 1.2, 12: 1.4 }
/// mom_low: 0.4
/// mom_high: 2.5
/// weight_corrected: true
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AnalyteNorm {
    pub unit: String,

    /// Population median per completed gestational week
    pub medians: BTreeMap<u32, f64>,

    /// Lower bound of the acceptable MoM range
    pub mom_low: f64,

    /// Upper bound of the acceptable MoM range
    pub mom_high: f64,

    /// Hard cutoff on the raw measurement, if the marker has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff: Option<f64>,

    #[serde(default)]
    pub weight_corrected: bool,
}

impl AnalyteNorm {
    fn new(unit: &str, medians: &[(u32, f64)], mom_low: f64, mom_high: f64) -> Self {
        Self {
            unit: unit.to_string(),
            medians: medians.iter().copied().collect(),
            mom_low,
            mom_high,
            cutoff: None,
            weight_corrected: true,
        }
    }

    /// Median for `week`, falling back to the nearest tabulated week.
    ///
    /// Weeks are iterated in ascending order and the first minimal distance
    /// wins, so a tie between two neighbours resolves to the lower week.
    /// An empty table yields the neutral value 1.0.
    pub fn median_for(&self, week: u32) -> f64 {
        if let Some(median) = self.medians.get(&week) {
            return *median;
        }

        self.medians
            .iter()
            .min_by_key(|(w, _)| w.abs_diff(week))
            .map(|(_, median)| *median)
            .unwrap_or(1.0)
    }

    /// Classify a MoM ratio against `[mom_low, mom_high]` (bounds inclusive as normal).
    pub fn range_status(&self, mom: f64) -> RangeStatus {
        if mom < self.mom_low {
            RangeStatus::Low
        } else if mom > self.mom_high {
            RangeStatus::High
        } else {
            RangeStatus::Normal
        }
    }

    /// Whether a raw measurement exceeds the hard cutoff. `None` when the marker has no cutoff.
    pub fn exceeds_cutoff(&self, measured: f64) -> Option<bool> {
        self.cutoff.map(|cutoff| measured > cutoff)
    }
}

/// Analyte → reference norms.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct NormTable(BTreeMap<Analyte, AnalyteNorm>);

impl NormTable {
    pub fn new(norms: BTreeMap<Analyte, AnalyteNorm>) -> Self {
        Self(norms)
    }

    pub fn get(&self, analyte: Analyte) -> Result<&AnalyteNorm> {
        self.0
            .get(&analyte)
            .ok_or(ScreeningError::MissingAnalyte(analyte))
    }

    pub fn median_for(&self, analyte: Analyte, week: u32) -> Result<f64> {
        Ok(self.get(analyte)?.median_for(week))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Analyte, &AnalyteNorm)> {
        self.0.iter()
    }
}

impl Default for NormTable {
    /// DELFIA (Revvity) reagent norms for both screening windows
    fn default() -> Self {
        let mut norms = BTreeMap::new();

        norms.insert(
            Analyte::PappA,
            AnalyteNorm::new(
                "U/L",
                &[(10, 1.0), (11, 1.2), (12, 1.4), (13, 1.6), (14, 1.8)],
                0.4,
                2.5,
            ),
        );
        norms.insert(
            Analyte::FreeBetaHcg,
            AnalyteNorm::new(
                "ng/ml",
                &[(10, 40.0), (11, 60.0), (12, 80.0), (13, 100.0), (14, 120.0)],
                0.5,
                2.0,
            ),
        );
        norms.insert(
            Analyte::Nt,
            AnalyteNorm {
                cutoff: Some(2.5),
                weight_corrected: false,
                ..AnalyteNorm::new(
                    "mm",
                    &[(10, 1.2), (11, 1.3), (12, 1.4), (13, 1.5), (14, 1.5)],
                    0.8,
                    2.0,
                )
            },
        );
        norms.insert(
            Analyte::Afp,
            AnalyteNorm::new(
                "ng/ml",
                &[(15, 30.0), (16, 35.0), (17, 40.0), (18, 45.0), (19, 50.0), (20, 55.0)],
                0.5,
                2.0,
            ),
        );
        norms.insert(
            Analyte::TotalHcg,
            AnalyteNorm::new(
                "IU/L",
                &[
                    (15, 30000.0),
                    (16, 28000.0),
                    (17, 25000.0),
                    (18, 22000.0),
                    (19, 20000.0),
                    (20, 18000.0),
                ],
                0.5,
                2.0,
            ),
        );
        norms.insert(
            Analyte::Ue3,
            AnalyteNorm::new(
                "nmol/L",
                &[(15, 2.5), (16, 3.0), (17, 3.5), (18, 4.0), (19, 4.5), (20, 5.0)],
                0.5,
                2.0,
            ),
        );

        Self(norms)
    }
}
