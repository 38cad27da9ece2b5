pub mod classify;
pub mod engine;
pub mod factors;
pub mod ladders;
pub mod normalize;
pub mod validation;

pub use classify::{classify, RiskBand, RiskCategory};
pub use engine::{
    calculate_risks, evaluate, quad_correction, Evaluation, FactorContribution, MarkerRatios,
    QuadCorrection, RiskResult,
};
pub use factors::{Band, Effect, RangeOp, Stage};
pub use ladders::RISK_CAP;
pub use normalize::{normalize, MomResult, REFERENCE_WEIGHT_KG};
pub use validation::validate_tables;
