//! Prenatal aneuploidy and neural-tube-defect screening risk engine.
//!
//! Raw marker measurements are normalised to multiples of the gestational-week
//! median, combined with maternal age and base prevalence through per-condition
//! threshold ladders, and classified into severity categories.

pub mod config;
pub mod error;
pub mod numeric;
pub mod output;
pub mod patient;
pub mod scoring;
pub mod tables;

pub use error::{ErrorKind, Result, ScreeningError};
