//! Static reference data: analyte norms, age-risk anchors and base prevalence.
//!
//! The built-in values are the DELFIA (Revvity) reagent norms. A deployment can
//! replace any of the three tables through the config file.

pub mod age;
pub mod condition;
pub mod norms;
pub mod prevalence;

pub use age::AgeRiskTable;
pub use condition::Condition;
pub use norms::{Analyte, AnalyteNorm, NormTable, RangeStatus};
pub use prevalence::BasePrevalence;

use serde::{Deserialize, Serialize};

/// The full read-only configuration an evaluation runs against.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ReferenceTables {
    pub norms: NormTable,
    pub age_risk: AgeRiskTable,
    pub base_prevalence: BasePrevalence,
}
