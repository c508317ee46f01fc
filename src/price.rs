use std::fmt;

/// Fixed-point decimal price with 4 decimal places, stored as a scaled integer.
///
/// Comparing scaled integers keeps the lowest-price tie-break exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Price(i64);

impl Price {
    const SCALE: i64 = 10_000;

    pub fn from_float(value: f64) -> Self {
        Price((value * Self::SCALE as f64).round() as i64)
    }

    /// Like [`Price::from_float`], but `None` for NaN, infinities and values
    /// whose scaled form does not fit an `i64`.
    pub fn try_from_float(value: f64) -> Option<Self> {
        let scaled = (value * Self::SCALE as f64).round();
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        if scaled.is_finite() && scaled >= i64::MIN as f64 && scaled < i64::MAX as f64 {
            Some(Price(scaled as i64))
        } else {
            None
        }
    }

    pub fn from_scaled(value: i64) -> Self {
        Price(value)
    }

    /// Whole units, e.g. `Price::from_units(95)` is `95.00`.
    pub fn from_units(units: i64) -> Self {
        Price(units * Self::SCALE)
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

/// Prints at least two decimals, more only when they carry a digit.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        let whole = abs / Self::SCALE;
        let mut frac = format!("{:04}", abs % Self::SCALE);
        while frac.len() > 2 && frac.ends_with('0') {
            frac.pop();
        }
        write!(f, "{sign}{whole}.{frac}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_units_scales() {
        assert_eq!(Price::from_units(95), Price::from_scaled(950_000));
        assert_eq!(Price::from_units(0), Price::default());
    }

    #[test]
    fn from_float_rounds_to_four_places() {
        assert_eq!(Price::from_float(100.0), Price::from_units(100));
        assert_eq!(Price::from_float(0.0001), Price::from_scaled(1));
        assert_eq!(Price::from_float(1.23456), Price::from_scaled(12346));
        assert_eq!(Price::from_float(1.23454), Price::from_scaled(12345));
    }

    #[test]
    fn try_from_float_accepts_finite_values() {
        assert_eq!(Price::try_from_float(95.5), Some(Price::from_float(95.5)));
        assert_eq!(Price::try_from_float(0.0), Some(Price::default()));
    }

    #[test]
    fn try_from_float_rejects_non_finite_and_out_of_range() {
        assert_eq!(Price::try_from_float(f64::NAN), None);
        assert_eq!(Price::try_from_float(f64::INFINITY), None);
        assert_eq!(Price::try_from_float(f64::NEG_INFINITY), None);
        assert_eq!(Price::try_from_float(1e300), None);
        assert_eq!(Price::try_from_float(1e15), None);
        assert_eq!(Price::try_from_float(-1e15), None);
    }

    #[test]
    fn negative_detection() {
        assert!(Price::from_float(-0.5).is_negative());
        assert!(!Price::from_float(0.0).is_negative());
        assert!(!Price::from_units(5).is_negative());
    }

    #[test]
    fn display_keeps_two_decimals() {
        assert_eq!(Price::from_units(95).to_string(), "95.00");
        assert_eq!(Price::from_float(1.5).to_string(), "1.50");
        assert_eq!(Price::default().to_string(), "0.00");
    }

    #[test]
    fn display_shows_significant_extra_decimals() {
        assert_eq!(Price::from_scaled(12345).to_string(), "1.2345");
        assert_eq!(Price::from_scaled(12340).to_string(), "1.234");
        assert_eq!(Price::from_scaled(1).to_string(), "0.0001");
    }

    #[test]
    fn display_negative() {
        assert_eq!(Price::from_scaled(-502_500).to_string(), "-50.25");
    }

    #[test]
    fn ordering_is_numeric() {
        assert!(Price::from_units(5) < Price::from_units(10));
        assert!(Price::from_float(9.9999) < Price::from_units(10));
    }
}
