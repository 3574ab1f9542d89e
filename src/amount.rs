use std::fmt;

/// Fixed-point decimal with 4 decimal places, stored as a scaled integer.
///
/// Used for both stock quantities (ml, g, units) and prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(i64);

impl Amount {
    const SCALE: i64 = 10_000;
    const DECIMALS: u32 = 4;

    pub const ZERO: Amount = Amount(0);

    /// Largest magnitude accepted from external input, in whole units.
    pub const MAX_UNITS: i64 = 1_000_000_000_000;

    /// Convert a float, saturating at the `i64` range.
    pub fn from_float(value: f64) -> Self {
        Amount((value * Self::SCALE as f64).round() as i64)
    }

    /// Convert a float, or `None` if it is not finite or its magnitude
    /// exceeds [`Amount::MAX_UNITS`].
    pub fn try_from_float(value: f64) -> Option<Self> {
        if !value.is_finite() || value.abs() > Self::MAX_UNITS as f64 {
            return None;
        }
        Some(Self::from_float(value))
    }

    pub fn to_float(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    pub fn from_scaled(value: i64) -> Self {
        Amount(value)
    }

    pub const fn from_units(value: i64) -> Self {
        Amount(value * Self::SCALE)
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Multiply by `factor / 1000`, rounding half away from zero.
    pub fn scale_per_mille(self, factor: i64) -> Self {
        Amount(div_round(self.0.saturating_mul(factor), 1000))
    }

    /// Round to `dp` decimal places, half away from zero.
    pub fn round_dp(self, dp: u32) -> Self {
        if dp >= Self::DECIMALS {
            return self;
        }
        let unit = 10_i64.pow(Self::DECIMALS - dp);
        Amount(div_round(self.0, unit).saturating_mul(unit))
    }

    /// Render with exactly `dp` decimals (rounded).
    pub fn to_fixed(self, dp: u32) -> String {
        let dp = dp.min(Self::DECIMALS);
        let rounded = self.round_dp(dp).0;
        let sign = if rounded < 0 { "-" } else { "" };
        let abs = rounded.unsigned_abs();
        let whole = abs / Self::SCALE as u64;
        if dp == 0 {
            return format!("{sign}{whole}");
        }
        let frac = (abs % Self::SCALE as u64) / 10_u64.pow(Self::DECIMALS - dp);
        format!("{sign}{whole}.{frac:0width$}", width = dp as usize)
    }
}

fn div_round(value: i64, divisor: i64) -> i64 {
    let half = divisor / 2;
    if value >= 0 {
        value.saturating_add(half) / divisor
    } else {
        value.saturating_sub(half) / divisor
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / Self::SCALE as u64;
        let frac = abs % Self::SCALE as u64;
        if frac == 0 {
            return write!(f, "{sign}{whole}");
        }
        let frac = format!("{frac:04}");
        write!(f, "{sign}{whole}.{}", frac.trim_end_matches('0'))
    }
}

impl std::ops::Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl std::ops::AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

impl<'a> std::iter::Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_float_converts_correctly() {
        assert_eq!(Amount::from_float(100.0), Amount::from_scaled(1_000_000));
        assert_eq!(Amount::from_float(1.5), Amount::from_scaled(15_000));
        assert_eq!(Amount::from_float(0.0001), Amount::from_scaled(1));
    }

    #[test]
    fn from_float_rounds_correctly() {
        assert_eq!(Amount::from_float(1.23456), Amount::from_scaled(12346));
        assert_eq!(Amount::from_float(1.23454), Amount::from_scaled(12345));
    }

    #[test]
    fn try_from_float_rejects_out_of_range() {
        assert_eq!(Amount::try_from_float(5.25), Some(Amount::from_float(5.25)));
        assert_eq!(Amount::try_from_float(-3.0), Some(Amount::from_units(-3)));
        assert_eq!(Amount::try_from_float(1e20), None);
        assert_eq!(Amount::try_from_float(-1e20), None);
        assert_eq!(Amount::try_from_float(f64::INFINITY), None);
        assert_eq!(Amount::try_from_float(f64::NAN), None);
    }

    #[test]
    fn to_float() {
        assert_eq!(Amount::from_units(2000).to_float(), 2000.0);
        assert_eq!(Amount::from_float(19.2).to_float(), 19.2);
    }

    #[test]
    fn extreme_values_format_without_overflow() {
        let min = Amount::from_scaled(i64::MIN);
        let max = Amount::from_scaled(i64::MAX);
        assert_eq!(min.to_string(), "-922337203685477.5808");
        assert_eq!(max.to_string(), "922337203685477.5807");
        assert!(min.to_fixed(2).starts_with("-922337203685477."));
        assert!(max.to_fixed(2).starts_with("922337203685477."));
        assert_eq!(Amount::from_float(-1e20), min);
    }

    #[test]
    fn from_units_matches_from_float() {
        assert_eq!(Amount::from_units(2000), Amount::from_float(2000.0));
        assert_eq!(Amount::from_units(0), Amount::ZERO);
    }

    #[test]
    fn scale_per_mille() {
        assert_eq!(
            Amount::from_units(16).scale_per_mille(1200),
            Amount::from_float(19.2)
        );
        assert_eq!(
            Amount::from_units(200).scale_per_mille(1500),
            Amount::from_units(300)
        );
        assert_eq!(
            Amount::from_units(7).scale_per_mille(1000),
            Amount::from_units(7)
        );
    }

    #[test]
    fn round_dp_rounds_half_away_from_zero() {
        assert_eq!(Amount::from_scaled(10_050).round_dp(2), Amount::from_scaled(10_100));
        assert_eq!(Amount::from_scaled(10_049).round_dp(2), Amount::from_scaled(10_000));
        assert_eq!(Amount::from_scaled(-10_050).round_dp(2), Amount::from_scaled(-10_100));
        assert_eq!(Amount::from_float(2.5).round_dp(0), Amount::from_units(3));
    }

    #[test]
    fn display_trims_trailing_zeros() {
        assert_eq!(Amount::from_units(1750).to_string(), "1750");
        assert_eq!(Amount::from_float(19.2).to_string(), "19.2");
        assert_eq!(Amount::from_scaled(1).to_string(), "0.0001");
        assert_eq!(Amount::ZERO.to_string(), "0");
        assert_eq!(Amount::from_float(-50.25).to_string(), "-50.25");
    }

    #[test]
    fn to_fixed_pads_decimals() {
        assert_eq!(Amount::from_float(4.8).to_fixed(2), "4.80");
        assert_eq!(Amount::from_units(10).to_fixed(2), "10.00");
        assert_eq!(Amount::from_float(10.5).to_fixed(0), "11");
        assert_eq!(Amount::from_float(-0.5).to_fixed(2), "-0.50");
    }

    #[test]
    fn arithmetic() {
        let mut a = Amount::from_units(100);
        a += Amount::from_units(50);
        assert_eq!(a, Amount::from_units(150));
        a -= Amount::from_units(30);
        assert_eq!(a, Amount::from_units(120));
        assert_eq!(a - Amount::from_units(120), Amount::ZERO);
    }

    #[test]
    fn sum() {
        let values = [Amount::from_float(4.8), Amount::from_float(10.5)];
        assert_eq!(values.iter().sum::<Amount>(), Amount::from_float(15.3));
    }

    #[test]
    fn sign_checks() {
        assert!(Amount::from_units(-1).is_negative());
        assert!(!Amount::ZERO.is_negative());
        assert!(!Amount::ZERO.is_positive());
        assert!(Amount::from_scaled(1).is_positive());
    }
}
