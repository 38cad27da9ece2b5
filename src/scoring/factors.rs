use std::fmt;

use crate::tables::Analyte;

/// Strict threshold test on a MoM ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeOp {
    Below(f64),
    Above(f64),
}

impl RangeOp {
    pub fn matches(&self, value: f64) -> bool {
        match self {
            RangeOp::Below(n) => value < *n,
            RangeOp::Above(n) => value > *n,
        }
    }
}

impl fmt::Display for RangeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeOp::Below(n) => write!(f, "<{}", n),
            RangeOp::Above(n) => write!(f, ">{}", n),
        }
    }
}

/// What a matched band does to the running probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    Multiply(f64),
    /// Replace the running probability with an absolute value
    Override(f64),
}

impl Effect {
    pub fn apply(&self, probability: f64) -> f64 {
        match self {
            Effect::Multiply(n) => probability * n,
            Effect::Override(n) => *n,
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Multiply(n) => write!(f, "x{}", n),
            Effect::Override(n) => write!(f, "={}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub range: RangeOp,
    pub effect: Effect,
}

impl Band {
    pub const fn below(threshold: f64, factor: f64) -> Self {
        Self {
            range: RangeOp::Below(threshold),
            effect: Effect::Multiply(factor),
        }
    }

    pub const fn above(threshold: f64, factor: f64) -> Self {
        Self {
            range: RangeOp::Above(threshold),
            effect: Effect::Multiply(factor),
        }
    }

    pub const fn above_set(threshold: f64, probability: f64) -> Self {
        Self {
            range: RangeOp::Above(threshold),
            effect: Effect::Override(probability),
        }
    }
}

/// One ladder stage: a marker and its bands, most extreme first.
#[derive(Debug, Clone, Copy)]
pub struct Stage {
    pub analyte: Analyte,
    pub bands: &'static [Band],
}

impl Stage {
    /// First band matching `ratio`. Later bands are never consulted once one matches.
    pub fn first_match(&self, ratio: f64) -> Option<&'static Band> {
        self.bands.iter().find(|band| band.range.matches(ratio))
    }
}
