use serde::Serialize;
use std::collections::BTreeMap;

use super::classify::{classify, RiskCategory};
use super::factors::Stage;
use super::ladders::{ConditionProfile, PROFILES, QUAD_STAGES, RISK_CAP};
use super::normalize::{normalize, MomResult};
use crate::error::{Result, ScreeningError};
use crate::patient::{calculate_bmi, Bmi, MarkerReading, PatientContext, Trimester};
use crate::tables::{Analyte, Condition, ReferenceTables};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorContribution {
    pub label: String,       // e.g. "Age", "PAPP-A", "Quad correction"
    pub description: String, // e.g. "MoM 0.25 matched '<0.3' -> x3"
    pub before: f64,         // Probability before this factor
    pub after: f64,          // Probability after this factor
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskResult {
    pub condition: Condition,
    pub probability: f64,
    pub category: RiskCategory,
    /// Multiplier taken from the age table; `None` for conditions without age scaling
    pub age_multiplier: Option<f64>,
    pub base_prevalence: f64,
    /// The cap clipped the probability at least once
    pub capped: bool,
    pub factors: Vec<FactorContribution>,
}

/// MoM ratios available to the composer, keyed by analyte.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerRatios(BTreeMap<Analyte, f64>);

impl MarkerRatios {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, analyte: Analyte, ratio: f64) -> Self {
        self.0.insert(analyte, ratio);
        self
    }

    pub fn get(&self, analyte: Analyte) -> Option<f64> {
        self.0.get(&analyte).copied()
    }
}

impl FromIterator<(Analyte, f64)> for MarkerRatios {
    fn from_iter<I: IntoIterator<Item = (Analyte, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Complete output of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub trimester: Trimester,
    /// Present when both weight and height were supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi: Option<Bmi>,
    pub markers: Vec<MomResult>,
    pub risks: Vec<RiskResult>,
}

impl Evaluation {
    pub fn risk(&self, condition: Condition) -> Option<&RiskResult> {
        self.risks.iter().find(|r| r.condition == condition)
    }

    pub fn marker(&self, analyte: Analyte) -> Option<&MomResult> {
        self.markers.iter().find(|m| m.analyte == analyte)
    }

    /// Condition with the largest probability; the earliest condition wins a tie.
    pub fn highest_risk(&self) -> Option<&RiskResult> {
        self.risks.iter().fold(None, |best: Option<&RiskResult>, r| match best {
            Some(b) if b.probability >= r.probability => Some(b),
            _ => Some(r),
        })
    }
}

/// Normalise the readings and compose a risk for every condition.
pub fn evaluate(
    tables: &ReferenceTables,
    trimester: Trimester,
    patient: &PatientContext,
    readings: &[MarkerReading],
) -> Result<Evaluation> {
    if patient.trimester != trimester {
        return Err(ScreeningError::TrimesterMismatch {
            context: patient.trimester,
            requested: trimester,
        });
    }
    patient.validate()?;

    let mut markers: Vec<MomResult> = Vec::with_capacity(readings.len());
    for reading in readings {
        if reading.analyte.trimester() != trimester {
            return Err(ScreeningError::WrongTrimester {
                analyte: reading.analyte,
                trimester,
            });
        }
        if markers.iter().any(|m| m.analyte == reading.analyte) {
            return Err(ScreeningError::DuplicateReading(reading.analyte));
        }
        markers.push(normalize(
            &tables.norms,
            reading.value,
            reading.analyte,
            patient.gestational_week,
            patient.maternal_weight_kg,
            trimester,
        )?);
    }

    let bmi = match (patient.maternal_weight_kg, patient.maternal_height_cm) {
        (Some(kg), Some(cm)) => Some(calculate_bmi(kg, cm)?),
        _ => None,
    };

    let ratios: MarkerRatios = markers.iter().map(|m| (m.analyte, m.ratio)).collect();
    let risks = calculate_risks(tables, patient.age, trimester, &ratios)?;

    tracing::debug!(
        %trimester,
        age = patient.age,
        week = patient.gestational_week,
        markers = markers.len(),
        "evaluation complete"
    );

    Ok(Evaluation {
        trimester,
        bmi,
        markers,
        risks,
    })
}

/// Compose per-condition risks from already-normalised ratios.
///
/// Missing ratios skip their stage. The second-trimester quad correction runs
/// after every condition's ladders and is followed by a second cap.
pub fn calculate_risks(
    tables: &ReferenceTables,
    age: u32,
    trimester: Trimester,
    ratios: &MarkerRatios,
) -> Result<Vec<RiskResult>> {
    let quad = match trimester {
        Trimester::Second => quad_correction(ratios),
        Trimester::First => None,
    };

    PROFILES
        .iter()
        .map(|profile| {
            let mut result = compose(tables, profile, age, ratios)?;
            if let (Some(q), Some(amplifier)) = (&quad, profile.quad_amplifier) {
                apply_quad(&mut result, q, amplifier);
            }
            result.category = classify(result.probability);
            Ok(result)
        })
        .collect()
}

fn compose(
    tables: &ReferenceTables,
    profile: &ConditionProfile,
    age: u32,
    ratios: &MarkerRatios,
) -> Result<RiskResult> {
    let condition = profile.condition;
    let base_prevalence = tables.base_prevalence.get(condition)?;
    let mut probability = base_prevalence;
    let mut factors = Vec::new();

    let age_multiplier = if profile.age_scaled {
        let multiplier = tables.age_risk.multiplier(age, condition)?;
        let before = probability;
        probability *= multiplier;
        factors.push(FactorContribution {
            label: "Age".to_string(),
            description: format!("age {} -> x{}", age, multiplier),
            before,
            after: probability,
        });
        Some(multiplier)
    } else {
        None
    };

    for stage in profile.stages {
        if let Some(contribution) = apply_stage(stage, ratios, &mut probability) {
            tracing::debug!(
                %condition,
                stage = stage.analyte.label(),
                before = contribution.before,
                after = contribution.after,
                "ladder band fired"
            );
            factors.push(contribution);
        }
    }

    let capped = probability > RISK_CAP;
    Ok(RiskResult {
        condition,
        probability: probability.min(RISK_CAP),
        category: RiskCategory::Unknown,
        age_multiplier,
        base_prevalence,
        capped,
        factors,
    })
}

/// Apply the first matching band of `stage`, if its ratio is present.
fn apply_stage(
    stage: &Stage,
    ratios: &MarkerRatios,
    probability: &mut f64,
) -> Option<FactorContribution> {
    let ratio = ratios.get(stage.analyte)?;
    let band = stage.first_match(ratio)?;
    let before = *probability;
    *probability = band.effect.apply(before);
    Some(FactorContribution {
        label: stage.analyte.label().to_string(),
        description: format!("MoM {:.2} matched '{}' -> {}", ratio, band.range, band.effect),
        before,
        after: *probability,
    })
}

/// Joint second-trimester correction and the stages that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadCorrection {
    pub scalar: f64,
    /// Stages whose band fired, in AFP, total hCG, uE3 order
    pub fired: Vec<FactorContribution>,
}

/// Joint second-trimester scalar.
///
/// `None` unless AFP, total hCG and uE3 ratios are all present and non-zero.
/// Stages compound; within a stage the first matching band applies.
pub fn quad_correction(ratios: &MarkerRatios) -> Option<QuadCorrection> {
    let complete = QUAD_STAGES
        .iter()
        .all(|stage| ratios.get(stage.analyte).is_some_and(|r| r != 0.0));
    if !complete {
        return None;
    }

    let mut scalar = 1.0;
    let fired = QUAD_STAGES
        .iter()
        .filter_map(|stage| apply_stage(stage, ratios, &mut scalar))
        .collect();
    Some(QuadCorrection { scalar, fired })
}

fn apply_quad(result: &mut RiskResult, quad: &QuadCorrection, amplifier: f64) {
    let before = result.probability;
    let after = before * (quad.scalar * amplifier);
    result.capped |= after > RISK_CAP;
    result.probability = after.min(RISK_CAP);

    let mut description = format!("x{} (amplifier x{})", quad.scalar, amplifier);
    if !quad.fired.is_empty() {
        let stages: Vec<String> = quad
            .fired
            .iter()
            .map(|f| format!("{} {}", f.label, f.description))
            .collect();
        description.push_str(&format!(" from {}", stages.join("; ")));
    }
    result.factors.push(FactorContribution {
        label: "Quad correction".to_string(),
        description,
        before,
        after: result.probability,
    });
}
