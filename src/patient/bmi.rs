use serde::Serialize;

use crate::error::{Result, ScreeningError};
use crate::numeric::round1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// Body mass index rounded to one decimal, with its category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bmi {
    pub value: f64,
    pub category: BmiCategory,
}

/// kg / m², rounded to one decimal.
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> Result<Bmi> {
    if weight_kg <= 0.0 || !weight_kg.is_finite() {
        return Err(ScreeningError::NonPositiveWeight(weight_kg));
    }
    if height_cm <= 0.0 || !height_cm.is_finite() {
        return Err(ScreeningError::NonPositiveHeight(height_cm));
    }

    let height_m = height_cm / 100.0;
    let value = round1(weight_kg / (height_m * height_m));
    Ok(Bmi {
        value,
        category: BmiCategory::from_bmi(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi_value() {
        let bmi = calculate_bmi(65.0, 165.0).unwrap();
        assert_eq!(bmi.value, 23.9);
        assert_eq!(bmi.category, BmiCategory::Normal);
    }

    #[test]
    fn test_bmi_categories() {
        assert_eq!(BmiCategory::from_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_bmi_rejects_zero_height() {
        assert_eq!(
            calculate_bmi(65.0, 0.0),
            Err(ScreeningError::NonPositiveHeight(0.0))
        );
    }

    #[test]
    fn test_bmi_rejects_negative_weight() {
        assert!(calculate_bmi(-1.0, 165.0).is_err());
    }
}
