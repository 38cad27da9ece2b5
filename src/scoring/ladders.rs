//! Threshold ladders per condition.
//!
//! Each stage inspects one MoM ratio; at most one band per stage fires and
//! bands are listed most extreme first on each side of the normal range.

use super::factors::{Band, Stage};
use crate::tables::{Analyte, Condition};

/// Upper bound on any composed probability
pub const RISK_CAP: f64 = 0.5;

/// How one condition's risk is composed.
#[derive(Debug, Clone, Copy)]
pub struct ConditionProfile {
    pub condition: Condition,
    /// Whether the prior is scaled by the age multiplier
    pub age_scaled: bool,
    pub stages: &'static [Stage],
    /// Extra factor on the quad correction; `None` leaves the condition untouched
    pub quad_amplifier: Option<f64>,
}

const DOWNS: &[Stage] = &[
    Stage {
        analyte: Analyte::PappA,
        bands: &[
            Band::below(0.3, 3.0),
            Band::below(0.4, 2.0),
            Band::below(0.5, 1.5),
            Band::above(2.5, 1.2),
        ],
    },
    Stage {
        analyte: Analyte::FreeBetaHcg,
        bands: &[
            Band::below(0.2, 2.5),
            Band::below(0.3, 1.8),
            Band::above(3.5, 2.5),
            Band::above(2.5, 2.0),
        ],
    },
    Stage {
        analyte: Analyte::Nt,
        bands: &[
            Band::below(0.6, 0.7),
            Band::below(0.8, 0.8),
            Band::above(3.0, 5.0),
            Band::above(2.0, 3.0),
        ],
    },
];

const EDWARDS: &[Stage] = &[
    Stage {
        analyte: Analyte::PappA,
        bands: &[Band::below(0.2, 4.0), Band::below(0.3, 2.5)],
    },
    Stage {
        analyte: Analyte::FreeBetaHcg,
        bands: &[Band::below(0.1, 3.0), Band::below(0.2, 2.0)],
    },
    Stage {
        analyte: Analyte::Nt,
        bands: &[Band::above(2.5, 4.0)],
    },
];

const PATAU: &[Stage] = &[
    Stage {
        analyte: Analyte::PappA,
        bands: &[Band::below(0.2, 5.0), Band::below(0.3, 3.0)],
    },
    Stage {
        analyte: Analyte::FreeBetaHcg,
        bands: &[Band::below(0.15, 3.5), Band::below(0.25, 2.5)],
    },
    Stage {
        analyte: Analyte::Nt,
        bands: &[Band::above(2.8, 5.0)],
    },
];

const TURNER: &[Stage] = &[
    Stage {
        analyte: Analyte::FreeBetaHcg,
        bands: &[Band::above(3.0, 3.0), Band::above(2.0, 2.0)],
    },
    Stage {
        analyte: Analyte::Nt,
        bands: &[Band::above(3.0, 4.0)],
    },
];

// Elevated AFP replaces the prior outright.
const NTD: &[Stage] = &[Stage {
    analyte: Analyte::Afp,
    bands: &[
        Band::above_set(2.5, 0.01),
        Band::above_set(2.0, 0.02),
        Band::below(0.5, 0.7),
    ],
}];

pub const PROFILES: [ConditionProfile; 5] = [
    ConditionProfile {
        condition: Condition::Downs,
        age_scaled: true,
        stages: DOWNS,
        quad_amplifier: Some(1.0),
    },
    ConditionProfile {
        condition: Condition::Edwards,
        age_scaled: true,
        stages: EDWARDS,
        quad_amplifier: Some(1.2),
    },
    ConditionProfile {
        condition: Condition::Patau,
        age_scaled: true,
        stages: PATAU,
        quad_amplifier: Some(1.3),
    },
    ConditionProfile {
        condition: Condition::Turner,
        age_scaled: true,
        stages: TURNER,
        quad_amplifier: None,
    },
    ConditionProfile {
        condition: Condition::Ntd,
        age_scaled: false,
        stages: NTD,
        quad_amplifier: None,
    },
];

/// Second-trimester correction stages. Unlike the per-condition ladders these
/// compound: every stage that matches multiplies the scalar.
pub const QUAD_STAGES: &[Stage] = &[
    Stage {
        analyte: Analyte::Afp,
        bands: &[Band::below(0.5, 0.8), Band::above(2.0, 1.3)],
    },
    Stage {
        analyte: Analyte::TotalHcg,
        bands: &[Band::below(0.5, 0.9), Band::above(2.0, 1.8)],
    },
    Stage {
        analyte: Analyte::Ue3,
        bands: &[Band::below(0.5, 1.5)],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::factors::RangeOp;

    #[test]
    fn test_profiles_follow_condition_order() {
        for (profile, condition) in PROFILES.iter().zip(Condition::ALL) {
            assert_eq!(profile.condition, condition);
            assert_eq!(profile.age_scaled, condition.is_age_scaled());
        }
    }

    #[test]
    fn test_ladders_are_ordered_most_extreme_first() {
        let stages = PROFILES
            .iter()
            .flat_map(|p| p.stages.iter())
            .chain(QUAD_STAGES.iter());
        for stage in stages {
            let mut last_below = f64::INFINITY;
            let mut last_above = f64::INFINITY;
            for band in stage.bands {
                match band.range {
                    RangeOp::Below(t) => {
                        assert!(t > last_below || last_below.is_infinite(), "{:?}", stage);
                        last_below = t;
                    }
                    RangeOp::Above(t) => {
                        assert!(t < last_above, "{:?}", stage);
                        last_above = t;
                    }
                }
            }
        }
    }

    #[test]
    fn test_ntd_is_only_condition_without_age_scaling() {
        let unscaled: Vec<_> = PROFILES
            .iter()
            .filter(|p| !p.age_scaled)
            .map(|p| p.condition)
            .collect();
        assert_eq!(unscaled, vec![Condition::Ntd]);
    }
}
