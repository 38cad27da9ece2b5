/// Round to `places` decimals from the exact decimal value of `value`.
///
/// Precision formatting works on the full binary expansion, so 0.295 (stored as
/// 0.29499999...) rounds down, and only true halves go to the even neighbour.
fn round_to(value: f64, places: usize) -> f64 {
    format!("{:.*}", places, value).parse().unwrap_or(value)
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    round_to(value, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.0), 1.0);
        assert_eq!(round2(0.33333), 0.33);
        assert_eq!(round2(0.666), 0.67);
        assert_eq!(round2(4.0), 4.0);
    }

    #[test]
    fn test_round2_uses_stored_value() {
        // 0.295 is stored just below the half
        assert_eq!(round2(0.295), 0.29);
        assert_eq!(round2(0.495), 0.49);
        // 0.405 and 0.505 are stored just above it
        assert_eq!(round2(0.405), 0.41);
        assert_eq!(round2(0.505), 0.51);
        // 0.03 / 1.2 lands slightly above 0.025
        assert_eq!(round2(0.03 / 1.2), 0.03);
    }

    #[test]
    fn test_round2_exact_half_goes_even() {
        // 0.125 and 0.375 are exact in binary
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(23.8754), 23.9);
        assert_eq!(round1(22.04), 22.0);
        assert_eq!(round1(0.25), 0.2);
    }

    #[test]
    fn test_non_finite_passes_through() {
        assert!(round2(f64::NAN).is_nan());
        assert_eq!(round2(f64::INFINITY), f64::INFINITY);
    }
}
