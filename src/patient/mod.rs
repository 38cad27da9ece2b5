pub mod bmi;
pub mod types;

pub use bmi::{calculate_bmi, Bmi, BmiCategory};
pub use types::{MarkerReading, PatientContext, Trimester, AGE_RANGE};
