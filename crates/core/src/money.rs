//! Fixed-point money.
//!
//! Amounts are stored as a signed count of minor units (e.g. cents). Decimal
//! values only appear at the boundaries: parsing loosely typed input and handing
//! figures to a renderer.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Number of fractional digits used when no explicit scale is configured.
pub const DEFAULT_SCALE: u32 = 2;

/// Signed amount in minor units.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(units: i64) -> Self {
        Self(units)
    }

    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Convert a decimal into minor units at `scale` fractional digits.
    ///
    /// Fails with `Precision` when the value carries more significant fractional
    /// digits than `scale` allows, or when it does not fit in `i64` minor units.
    pub fn from_decimal(value: Decimal, scale: u32) -> LedgerResult<Self> {
        let normalized = value.normalize();
        if normalized.scale() > scale {
            return Err(LedgerError::precision(format!(
                "{value} has more than {scale} fractional digits"
            )));
        }

        let minor = 10i128
            .checked_pow(scale - normalized.scale())
            .and_then(|factor| normalized.mantissa().checked_mul(factor))
            .ok_or_else(|| LedgerError::precision(format!("{value} overflows at scale {scale}")))?;

        let units = i64::try_from(minor)
            .map_err(|_| LedgerError::precision(format!("{value} does not fit in minor units")))?;

        Ok(Self(units))
    }

    /// Parse a decimal literal (e.g. `"1234.50"`) into minor units.
    pub fn parse(literal: &str, scale: u32) -> LedgerResult<Self> {
        let value = Decimal::from_str_exact(literal.trim())
            .map_err(|e| LedgerError::validation(format!("invalid amount '{literal}': {e}")))?;
        Self::from_decimal(value, scale)
    }

    /// Decimal view of this amount at `scale` fractional digits.
    pub fn to_decimal(self, scale: u32) -> Decimal {
        Decimal::from_i128_with_scale(self.0 as i128, scale)
    }

    pub fn abs(self) -> LedgerResult<Self> {
        self.0
            .checked_abs()
            .map(Self)
            .ok_or_else(|| LedgerError::precision("absolute value overflows"))
    }

    pub fn checked_add(self, rhs: Money) -> LedgerResult<Self> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or_else(|| LedgerError::precision(format!("{} + {} overflows", self.0, rhs.0)))
    }

    pub fn checked_sub(self, rhs: Money) -> LedgerResult<Self> {
        self.0
            .checked_sub(rhs.0)
            .map(Self)
            .ok_or_else(|| LedgerError::precision(format!("{} - {} overflows", self.0, rhs.0)))
    }

    pub fn checked_neg(self) -> LedgerResult<Self> {
        self.0
            .checked_neg()
            .map(Self)
            .ok_or_else(|| LedgerError::precision("negation overflows"))
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_exact_amounts() {
        assert_eq!(Money::parse("100", 2).unwrap(), Money::from_minor(10_000));
        assert_eq!(Money::parse("12.5", 2).unwrap(), Money::from_minor(1_250));
        assert_eq!(Money::parse("-0.01", 2).unwrap(), Money::from_minor(-1));
        assert_eq!(Money::parse("3.100", 2).unwrap(), Money::from_minor(310));
    }

    #[test]
    fn rejects_sub_minor_amounts() {
        let err = Money::parse("10.005", 2).unwrap_err();
        assert!(matches!(err, LedgerError::Precision(_)));
    }

    #[test]
    fn rejects_non_numeric_literals() {
        let err = Money::parse("ten", 2).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn rejects_values_beyond_i64() {
        let err = Money::parse("100000000000000000000", 2).unwrap_err();
        assert!(matches!(err, LedgerError::Precision(_)));
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        let err = Money::from_minor(i64::MAX).checked_add(Money::from_minor(1)).unwrap_err();
        assert!(matches!(err, LedgerError::Precision(_)));
        assert!(Money::from_minor(i64::MIN).abs().is_err());
    }

    proptest! {
        #[test]
        fn decimal_view_converts_back(units in -1_000_000_000i64..1_000_000_000i64) {
            let money = Money::from_minor(units);
            prop_assert_eq!(Money::from_decimal(money.to_decimal(2), 2).unwrap(), money);
        }
    }
}
