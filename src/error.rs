use thiserror::Error;

use crate::patient::Trimester;
use crate::tables::{Analyte, Condition};

/// Coarse error classes surfaced to callers.
///
/// `Configuration` means the reference tables cannot serve the request and the
/// evaluation must not proceed. `InvalidInput` means the patient data was
/// rejected before any arithmetic ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InvalidInput,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScreeningError {
    #[error("no reference norms configured for analyte {0}")]
    MissingAnalyte(Analyte),

    #[error("no age-risk anchors configured for {0}")]
    MissingAgeAnchors(Condition),

    #[error("no base prevalence configured for {0}")]
    MissingPrevalence(Condition),

    #[error("maternal age {0} is outside the supported range (15-55)")]
    AgeOutOfRange(u32),

    #[error("gestational week {week} is outside the {trimester} trimester range ({min}-{max})")]
    WeekOutOfRange {
        week: u32,
        trimester: Trimester,
        min: u32,
        max: u32,
    },

    #[error("maternal weight must be positive, got {0} kg")]
    NonPositiveWeight(f64),

    #[error("maternal height must be positive, got {0} cm")]
    NonPositiveHeight(f64),

    #[error("measured value for {analyte} must be a finite non-negative number, got {value}")]
    InvalidMeasurement { analyte: Analyte, value: f64 },

    #[error("{analyte} is not measured in the {trimester} trimester")]
    WrongTrimester {
        analyte: Analyte,
        trimester: Trimester,
    },

    #[error("{0} was supplied more than once")]
    DuplicateReading(Analyte),

    #[error("patient context is for the {context} trimester but {requested} was requested")]
    TrimesterMismatch {
        context: Trimester,
        requested: Trimester,
    },
}

impl ScreeningError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScreeningError::MissingAnalyte(_)
            | ScreeningError::MissingAgeAnchors(_)
            | ScreeningError::MissingPrevalence(_) => ErrorKind::Configuration,
            _ => ErrorKind::InvalidInput,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScreeningError>;
