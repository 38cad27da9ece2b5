use serde::{Deserialize, Serialize};

use crate::tables::{AgeRiskTable, BasePrevalence, NormTable, ReferenceTables};

/// On-disk configuration. Each table, when present, replaces the built-in
/// table as a whole; there is no per-entry merging.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub norms: Option<NormTable>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_risk: Option<AgeRiskTable>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_prevalence: Option<BasePrevalence>,
}

impl Config {
    /// Config carrying every built-in table, as written by `init`
    pub fn starter() -> Self {
        Self {
            norms: Some(NormTable::default()),
            age_risk: Some(AgeRiskTable::default()),
            base_prevalence: Some(BasePrevalence::default()),
        }
    }

    /// Effective tables: configured ones, built-ins for the rest
    pub fn tables(&self) -> ReferenceTables {
        ReferenceTables {
            norms: self.norms.clone().unwrap_or_default(),
            age_risk: self.age_risk.clone().unwrap_or_default(),
            base_prevalence: self.base_prevalence.clone().unwrap_or_default(),
        }
    }
}
