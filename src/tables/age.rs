use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::condition::Condition;
use crate::error::{Result, ScreeningError};
use crate::numeric::round2;

/// Condition → (anchor age → risk multiplier).
///
/// Anchors are sparse; ages between two anchors are linearly interpolated and
/// ages outside the anchored span are clamped to the nearest end.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct AgeRiskTable(BTreeMap<Condition, BTreeMap<u32, f64>>);

impl AgeRiskTable {
    pub fn new(table: BTreeMap<Condition, BTreeMap<u32, f64>>) -> Self {
        Self(table)
    }

    pub fn anchors(&self, condition: Condition) -> Result<&BTreeMap<u32, f64>> {
        self.0
            .get(&condition)
            .filter(|anchors| !anchors.is_empty())
            .ok_or(ScreeningError::MissingAgeAnchors(condition))
    }

    /// Risk multiplier for `condition` at maternal `age`.
    pub fn multiplier(&self, age: u32, condition: Condition) -> Result<f64> {
        let anchors = self.anchors(condition)?;

        // anchors is non-empty, both ends exist
        let (Some((&low_age, &low_mult)), Some((&high_age, &high_mult))) =
            (anchors.first_key_value(), anchors.last_key_value())
        else {
            return Err(ScreeningError::MissingAgeAnchors(condition));
        };

        if age <= low_age {
            return Ok(low_mult);
        }
        if age >= high_age {
            return Ok(high_mult);
        }
        if let Some(exact) = anchors.get(&age) {
            return Ok(*exact);
        }

        let (Some((&age1, &mult1)), Some((&age2, &mult2))) = (
            anchors.range(..age).next_back(),
            anchors.range(age..).next(),
        ) else {
            return Err(ScreeningError::MissingAgeAnchors(condition));
        };

        let fraction = (age - age1) as f64 / (age2 - age1) as f64;
        let multiplier = round2(mult1 + fraction * (mult2 - mult1));
        tracing::trace!(%condition, age, age1, age2, multiplier, "interpolated age multiplier");
        Ok(multiplier)
    }

    /// Sample the multiplier curve for `condition` over `ages`.
    pub fn curve(
        &self,
        condition: Condition,
        ages: impl IntoIterator<Item = u32>,
    ) -> Result<Vec<(u32, f64)>> {
        ages.into_iter()
            .map(|age| self.multiplier(age, condition).map(|m| (age, m)))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Condition, &BTreeMap<u32, f64>)> {
        self.0.iter()
    }
}

impl Default for AgeRiskTable {
    fn default() -> Self {
        const AGES: [u32; 6] = [20, 25, 30, 35, 40, 45];
        let rows: [(Condition, [f64; 6]); 4] = [
            (Condition::Downs, [0.5, 0.7, 1.0, 2.5, 5.0, 10.0]),
            (Condition::Edwards, [0.3, 0.5, 1.0, 3.0, 8.0, 15.0]),
            (Condition::Patau, [0.3, 0.5, 1.0, 3.5, 10.0, 20.0]),
            (Condition::Turner, [0.4, 0.6, 1.0, 2.0, 4.0, 8.0]),
        ];

        Self(
            rows.into_iter()
                .map(|(condition, multipliers)| {
                    (condition, AGES.into_iter().zip(multipliers).collect())
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_anchor_ages_are_exact() {
        let table = AgeRiskTable::default();
        assert_eq!(table.multiplier(30, Condition::Downs).unwrap(), 1.0);
        assert_eq!(table.multiplier(35, Condition::Patau).unwrap(), 3.5);
        assert_eq!(table.multiplier(40, Condition::Edwards).unwrap(), 8.0);
    }

    #[test]
    fn test_clamps_low_and_high() {
        let table = AgeRiskTable::default();
        assert_eq!(table.multiplier(15, Condition::Downs).unwrap(), 0.5);
        assert_eq!(table.multiplier(20, Condition::Turner).unwrap(), 0.4);
        assert_eq!(table.multiplier(55, Condition::Patau).unwrap(), 20.0);
    }

    #[test]
    fn test_linear_interpolation() {
        let table = AgeRiskTable::default();
        // 1.0 + 3/5 * (2.5 - 1.0)
        assert_eq!(table.multiplier(33, Condition::Downs).unwrap(), 1.9);
        // 3.0 + 2/5 * (8.0 - 3.0)
        assert_eq!(table.multiplier(37, Condition::Edwards).unwrap(), 5.0);
        // 0.4 + 1/5 * (0.6 - 0.4)
        assert_eq!(table.multiplier(21, Condition::Turner).unwrap(), 0.44);
    }

    #[test]
    fn test_interpolation_rounds_to_two_decimals() {
        let mut anchors = BTreeMap::new();
        anchors.insert(20, 0.0);
        anchors.insert(23, 1.0);
        let table = AgeRiskTable::new(BTreeMap::from([(Condition::Downs, anchors)]));
        assert_eq!(table.multiplier(21, Condition::Downs).unwrap(), 0.33);
        assert_eq!(table.multiplier(22, Condition::Downs).unwrap(), 0.67);
    }

    #[test]
    fn test_anchor_value_not_rounded() {
        let anchors = BTreeMap::from([(20, 0.125), (25, 0.3333), (30, 1.0)]);
        let table = AgeRiskTable::new(BTreeMap::from([(Condition::Turner, anchors)]));
        assert_eq!(table.multiplier(25, Condition::Turner).unwrap(), 0.3333);
    }

    #[test]
    fn test_missing_condition_is_configuration_error() {
        let table = AgeRiskTable::default();
        assert_eq!(
            table.multiplier(30, Condition::Ntd),
            Err(ScreeningError::MissingAgeAnchors(Condition::Ntd))
        );
    }

    #[test]
    fn test_empty_anchors_is_configuration_error() {
        let table = AgeRiskTable::new(BTreeMap::from([(Condition::Downs, BTreeMap::new())]));
        assert!(table.multiplier(30, Condition::Downs).is_err());
    }

    #[test]
    fn test_curve_samples() {
        let table = AgeRiskTable::default();
        let curve = table
            .curve(Condition::Downs, (20..=45).step_by(5))
            .unwrap();
        assert_eq!(
            curve,
            vec![(20, 0.5), (25, 0.7), (30, 1.0), (35, 2.5), (40, 5.0), (45, 10.0)]
        );
    }

    proptest! {
        #[test]
        fn default_table_is_monotone(age in 15u32..55) {
            let table = AgeRiskTable::default();
            for condition in Condition::AGE_SCALED {
                let here = table.multiplier(age, condition).unwrap();
                let next = table.multiplier(age + 1, condition).unwrap();
                prop_assert!(next >= here, "{} dropped between {} and {}", condition, age, age + 1);
            }
        }

        #[test]
        fn interpolation_stays_within_bracket(age in 20u32..=45) {
            let table = AgeRiskTable::default();
            for condition in Condition::AGE_SCALED {
                let m = table.multiplier(age, condition).unwrap();
                let anchors = table.anchors(condition).unwrap();
                let low = anchors.range(..=age).next_back().map(|(_, v)| *v).unwrap();
                let high = anchors.range(age..).next().map(|(_, v)| *v).unwrap();
                prop_assert!(m >= low && m <= high);
            }
        }
    }
}
