use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use crate::error::{Result, ScreeningError};
use crate::tables::Analyte;

/// Supported maternal age span, in completed years
pub const AGE_RANGE: RangeInclusive<u32> = 15..=55;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trimester {
    First,
    Second,
}

impl Trimester {
    /// Gestational weeks the trimester's norms are defined for
    pub fn week_range(self) -> RangeInclusive<u32> {
        match self {
            Trimester::First => 10..=14,
            Trimester::Second => 15..=20,
        }
    }
}

impl fmt::Display for Trimester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trimester::First => f.write_str("first"),
            Trimester::Second => f.write_str("second"),
        }
    }
}

/// Per-evaluation patient data.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PatientContext {
    pub age: u32,
    pub gestational_week: u32,
    #[serde(default)]
    pub maternal_weight_kg: Option<f64>,
    #[serde(default)]
    pub maternal_height_cm: Option<f64>,
    pub trimester: Trimester,
}

impl PatientContext {
    pub fn new(age: u32, gestational_week: u32, trimester: Trimester) -> Self {
        Self {
            age,
            gestational_week,
            maternal_weight_kg: None,
            maternal_height_cm: None,
            trimester,
        }
    }

    pub fn with_weight(mut self, kg: f64) -> Self {
        self.maternal_weight_kg = Some(kg);
        self
    }

    pub fn with_height(mut self, cm: f64) -> Self {
        self.maternal_height_cm = Some(cm);
        self
    }

    /// Reject out-of-domain values instead of clamping them.
    pub fn validate(&self) -> Result<()> {
        if !AGE_RANGE.contains(&self.age) {
            return Err(ScreeningError::AgeOutOfRange(self.age));
        }

        let weeks = self.trimester.week_range();
        if !weeks.contains(&self.gestational_week) {
            return Err(ScreeningError::WeekOutOfRange {
                week: self.gestational_week,
                trimester: self.trimester,
                min: *weeks.start(),
                max: *weeks.end(),
            });
        }

        if let Some(kg) = self.maternal_weight_kg {
            if kg <= 0.0 || !kg.is_finite() {
                return Err(ScreeningError::NonPositiveWeight(kg));
            }
        }
        if let Some(cm) = self.maternal_height_cm {
            if cm <= 0.0 || !cm.is_finite() {
                return Err(ScreeningError::NonPositiveHeight(cm));
            }
        }

        Ok(())
    }
}

/// One raw laboratory or ultrasound measurement, in the analyte's norm unit.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct MarkerReading {
    pub analyte: Analyte,
    pub value: f64,
}

impl MarkerReading {
    pub fn new(analyte: Analyte, value: f64) -> Self {
        Self { analyte, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_first_trimester_context() {
        let ctx = PatientContext::new(30, 12, Trimester::First).with_weight(65.0);
        assert!(ctx.validate().is_ok());
    }

    #[test]
    fn test_week_outside_trimester() {
        let ctx = PatientContext::new(30, 16, Trimester::First);
        assert_eq!(
            ctx.validate(),
            Err(ScreeningError::WeekOutOfRange {
                week: 16,
                trimester: Trimester::First,
                min: 10,
                max: 14,
            })
        );

        let ctx = PatientContext::new(30, 14, Trimester::Second);
        assert!(ctx.validate().is_err());
    }

    #[test]
    fn test_week_bounds_inclusive() {
        assert!(PatientContext::new(30, 10, Trimester::First).validate().is_ok());
        assert!(PatientContext::new(30, 14, Trimester::First).validate().is_ok());
        assert!(PatientContext::new(30, 15, Trimester::Second).validate().is_ok());
        assert!(PatientContext::new(30, 20, Trimester::Second).validate().is_ok());
    }

    #[test]
    fn test_age_outside_domain() {
        assert_eq!(
            PatientContext::new(14, 12, Trimester::First).validate(),
            Err(ScreeningError::AgeOutOfRange(14))
        );
        assert!(PatientContext::new(56, 12, Trimester::First).validate().is_err());
        assert!(PatientContext::new(55, 12, Trimester::First).validate().is_ok());
    }

    #[test]
    fn test_non_positive_weight() {
        let ctx = PatientContext::new(30, 12, Trimester::First).with_weight(0.0);
        assert_eq!(ctx.validate(), Err(ScreeningError::NonPositiveWeight(0.0)));

        let ctx = PatientContext::new(30, 12, Trimester::First).with_weight(-3.0);
        assert!(ctx.validate().is_err());
    }

    #[test]
    fn test_non_positive_height() {
        let ctx = PatientContext::new(30, 12, Trimester::First).with_height(0.0);
        assert_eq!(ctx.validate(), Err(ScreeningError::NonPositiveHeight(0.0)));
    }

    #[test]
    fn test_each_trimester_has_three_markers() {
        for trimester in [Trimester::First, Trimester::Second] {
            let panel = Analyte::ALL
                .iter()
                .filter(|a| a.trimester() == trimester)
                .count();
            assert_eq!(panel, 3);
        }
    }
}
