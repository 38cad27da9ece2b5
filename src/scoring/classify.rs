use serde::Serialize;

/// Coarse severity band used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Unknown,
    Critical,
    High,
    Medium,
    Low,
}

/// Fine-grained risk category of a final probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Unknown,
    Critical,     // > 1:10
    VeryHigh,     // > 1:20
    High,         // > 1:50
    ModerateHigh, // > 1:100
    Moderate,     // > 1:200
    LowModerate,  // > 1:1000
    Low,
}

impl RiskCategory {
    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::Unknown => "UNKNOWN",
            RiskCategory::Critical => "CRITICAL",
            RiskCategory::VeryHigh => "VERY HIGH",
            RiskCategory::High => "HIGH",
            RiskCategory::ModerateHigh => "MODERATE-HIGH",
            RiskCategory::Moderate => "MODERATE",
            RiskCategory::LowModerate => "LOW-MODERATE",
            RiskCategory::Low => "LOW",
        }
    }

    pub fn band(&self) -> RiskBand {
        match self {
            RiskCategory::Unknown => RiskBand::Unknown,
            RiskCategory::Critical => RiskBand::Critical,
            RiskCategory::VeryHigh | RiskCategory::High => RiskBand::High,
            RiskCategory::ModerateHigh | RiskCategory::Moderate => RiskBand::Medium,
            RiskCategory::LowModerate | RiskCategory::Low => RiskBand::Low,
        }
    }

    /// Display colour as a hex triplet
    pub fn color(&self) -> &'static str {
        match self {
            RiskCategory::Unknown => "#9e9e9e",
            RiskCategory::Critical => "#b71c1c",
            RiskCategory::VeryHigh => "#e65100",
            RiskCategory::High => "#f57c00",
            RiskCategory::ModerateHigh => "#f57f17",
            RiskCategory::Moderate => "#f9a825",
            RiskCategory::LowModerate => "#388e3c",
            RiskCategory::Low => "#1b5e20",
        }
    }
}

/// Map a probability onto its category. Boundaries belong to the lower category.
pub fn classify(probability: f64) -> RiskCategory {
    if probability.is_nan() || probability <= 0.0 {
        RiskCategory::Unknown
    } else if probability > 0.1 {
        RiskCategory::Critical
    } else if probability > 0.05 {
        RiskCategory::VeryHigh
    } else if probability > 0.02 {
        RiskCategory::High
    } else if probability > 0.01 {
        RiskCategory::ModerateHigh
    } else if probability > 0.005 {
        RiskCategory::Moderate
    } else if probability > 0.001 {
        RiskCategory::LowModerate
    } else {
        RiskCategory::Low
    }
}
