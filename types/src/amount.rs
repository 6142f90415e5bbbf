//! Monetary amount type.
//!
//! Amounts travel as decimal strings in the native currency unit ("1.0",
//! "0.05") and are held internally as an exact count of minor units (u128,
//! 18 decimals) so fee/payout splits never round.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// An amount of the native currency, in minor units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(u128);

impl Amount {
    /// Number of decimal places between the native unit and a minor unit.
    pub const DECIMALS: u32 = 18;

    /// Minor units per native unit.
    pub const UNIT: u128 = 10u128.pow(Self::DECIMALS);

    pub const ZERO: Self = Self(0);

    pub fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// `floor(self * bps / 10_000)` without intermediate overflow.
    pub fn basis_points(self, bps: u32) -> Self {
        let bps = u128::from(bps);
        Self(self.0 / 10_000 * bps + (self.0 % 10_000) * bps / 10_000)
    }

    /// Parse a non-negative decimal string such as `"12"`, `"0.05"` or `".5"`.
    pub fn parse_decimal(s: &str) -> Result<Self, TypesError> {
        let input = s.trim();
        if input.is_empty() {
            return Err(TypesError::InvalidAmount(s.to_string(), "empty"));
        }

        let (whole, frac) = match input.split_once('.') {
            Some((w, f)) => (w, f),
            None => (input, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(TypesError::InvalidAmount(s.to_string(), "no digits"));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(TypesError::InvalidAmount(
                s.to_string(),
                "only digits and one decimal point are allowed",
            ));
        }
        if frac.len() > Self::DECIMALS as usize {
            return Err(TypesError::TooManyDecimals(s.to_string(), Self::DECIMALS));
        }

        let overflow = || TypesError::AmountOverflow(s.to_string());

        let whole_units: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let frac_units: u128 = if frac.is_empty() {
            0
        } else {
            let padded = format!("{frac:0<width$}", width = Self::DECIMALS as usize);
            padded.parse().map_err(|_| overflow())?
        };

        whole_units
            .checked_mul(Self::UNIT)
            .and_then(|w| w.checked_add(frac_units))
            .map(Self)
            .ok_or_else(overflow)
    }
}

impl fmt::Display for Amount {
    /// Always prints at least one fractional digit and trims trailing zeros:
    /// `1.0`, `0.05`, `0.95`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::UNIT;
        let frac = self.0 % Self::UNIT;
        let digits = format!("{frac:0width$}", width = Self::DECIMALS as usize);
        let trimmed = digits.trim_end_matches('0');
        if trimmed.is_empty() {
            write!(f, "{whole}.0")
        } else {
            write!(f, "{whole}.{trimmed}")
        }
    }
}

impl FromStr for Amount {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_decimal(s)
    }
}

impl TryFrom<String> for Amount {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse_decimal(&s)
    }
}

impl From<Amount> for String {
    fn from(a: Amount) -> Self {
        a.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional() {
        assert_eq!(Amount::parse_decimal("0").unwrap(), Amount::ZERO);
        assert_eq!(Amount::parse_decimal("1").unwrap().raw(), Amount::UNIT);
        assert_eq!(Amount::parse_decimal("1.0").unwrap().raw(), Amount::UNIT);
        assert_eq!(
            Amount::parse_decimal("0.05").unwrap().raw(),
            50_000_000_000_000_000
        );
        assert_eq!(Amount::parse_decimal(".5").unwrap().raw(), Amount::UNIT / 2);
        assert_eq!(Amount::parse_decimal("2.").unwrap().raw(), 2 * Amount::UNIT);
        assert_eq!(
            Amount::parse_decimal("0.000000000000000001").unwrap().raw(),
            1
        );
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", " ", ".", "-1", "1.2.3", "abc", "1e18", "+3", "1,5"] {
            assert!(Amount::parse_decimal(bad).is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn rejects_excess_precision() {
        assert!(matches!(
            Amount::parse_decimal("0.0000000000000000001"),
            Err(TypesError::TooManyDecimals(_, 18))
        ));
    }

    #[test]
    fn rejects_overflow() {
        let huge = "9".repeat(40);
        assert!(matches!(
            Amount::parse_decimal(&huge),
            Err(TypesError::AmountOverflow(_))
        ));
    }

    #[test]
    fn display_format() {
        assert_eq!(Amount::ZERO.to_string(), "0.0");
        assert_eq!(Amount::from_raw(Amount::UNIT).to_string(), "1.0");
        assert_eq!(Amount::parse_decimal("0.05").unwrap().to_string(), "0.05");
        assert_eq!(Amount::parse_decimal("12.340").unwrap().to_string(), "12.34");
    }

    #[test]
    fn basis_points_floor() {
        let one = Amount::parse_decimal("1.0").unwrap();
        assert_eq!(one.basis_points(500).to_string(), "0.05");
        assert_eq!(Amount::from_raw(19).basis_points(500).raw(), 0);
        assert_eq!(Amount::from_raw(20).basis_points(500).raw(), 1);
        assert_eq!(
            Amount::from_raw(u128::MAX).basis_points(10_000).raw(),
            u128::MAX
        );
    }

    #[test]
    fn serde_uses_decimal_strings() {
        let a = Amount::parse_decimal("0.95").unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), r#""0.95""#);
        let back: Amount = serde_json::from_str(r#""0.95""#).unwrap();
        assert_eq!(back, a);
    }
}
