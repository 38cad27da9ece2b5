use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::condition::Condition;
use crate::error::{Result, ScreeningError};

/// Condition → population prior probability, the seed of every risk estimate.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct BasePrevalence(BTreeMap<Condition, f64>);

impl BasePrevalence {
    pub fn new(prevalence: BTreeMap<Condition, f64>) -> Self {
        Self(prevalence)
    }

    pub fn get(&self, condition: Condition) -> Result<f64> {
        self.0
            .get(&condition)
            .copied()
            .ok_or(ScreeningError::MissingPrevalence(condition))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Condition, &f64)> {
        self.0.iter()
    }
}

impl Default for BasePrevalence {
    fn default() -> Self {
        Self(BTreeMap::from([
            (Condition::Downs, 1.0 / 800.0),
            (Condition::Edwards, 1.0 / 3000.0),
            (Condition::Patau, 1.0 / 5000.0),
            (Condition::Turner, 1.0 / 2500.0),
            (Condition::Ntd, 1.0 / 1000.0),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_condition() {
        let prevalence = BasePrevalence::default();
        for condition in Condition::ALL {
            assert!(prevalence.get(condition).unwrap() > 0.0);
        }
        assert_eq!(prevalence.get(Condition::Downs).unwrap(), 1.0 / 800.0);
    }

    #[test]
    fn test_missing_condition() {
        let prevalence = BasePrevalence::new(BTreeMap::new());
        assert_eq!(
            prevalence.get(Condition::Turner),
            Err(ScreeningError::MissingPrevalence(Condition::Turner))
        );
    }
}
