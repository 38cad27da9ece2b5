use crate::tables::{Analyte, Condition, ReferenceTables};

/// Validate reference tables at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_tables(tables: &ReferenceTables) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    // Norms: every analyte, positive medians, sane MoM range
    for analyte in Analyte::ALL {
        let Ok(norm) = tables.norms.get(analyte) else {
            errors.push(format!("norms.{}: missing", analyte));
            continue;
        };

        if norm.medians.is_empty() {
            errors.push(format!("norms.{}.medians: must not be empty", analyte));
        }
        for (week, median) in &norm.medians {
            if *median <= 0.0 || !median.is_finite() {
                errors.push(format!(
                    "norms.{}.medians[{}]: must be positive, got {}",
                    analyte, week, median
                ));
            }
        }

        if !(norm.mom_low > 0.0 && norm.mom_low < norm.mom_high) {
            errors.push(format!(
                "norms.{}: mom_low ({}) must be positive and below mom_high ({})",
                analyte, norm.mom_low, norm.mom_high
            ));
        }

        if let Some(cutoff) = norm.cutoff {
            if cutoff <= 0.0 || !cutoff.is_finite() {
                errors.push(format!(
                    "norms.{}.cutoff: must be positive, got {}",
                    analyte, cutoff
                ));
            }
        }
    }

    // Age anchors for every age-scaled condition
    for condition in Condition::AGE_SCALED {
        let Ok(anchors) = tables.age_risk.anchors(condition) else {
            errors.push(format!("age_risk.{}: missing or empty", condition));
            continue;
        };
        for (age, multiplier) in anchors {
            if *multiplier < 0.0 || !multiplier.is_finite() {
                errors.push(format!(
                    "age_risk.{}[{}]: must be a non-negative number, got {}",
                    condition, age, multiplier
                ));
            }
        }
    }

    // Prevalence is a probability
    for condition in Condition::ALL {
        match tables.base_prevalence.get(condition) {
            Ok(p) if p > 0.0 && p <= 1.0 => {}
            Ok(p) => errors.push(format!(
                "base_prevalence.{}: must be in (0, 1], got {}",
                condition, p
            )),
            Err(_) => errors.push(format!("base_prevalence.{}: missing", condition)),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
