use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use rust_decimal::Decimal;

use crate::EngineError;

/// Monetary amount backed by an arbitrary-precision decimal.
///
/// Use this type for **all** monetary values in the engine (totals, running
/// balances, ledger amounts). Binary floating point is never acceptable for
/// currency: amounts must compare exactly and must not drift across a long
/// sequence of settlements.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount: Money = "12.34".parse().unwrap();
/// assert_eq!(amount.to_string(), "12.34");
/// assert!((amount - amount).is_zero());
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects
/// more than 2 decimals):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().to_string(), "10");
/// assert_eq!("10,5".parse::<Money>().unwrap().to_string(), "10.5");
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Creates an amount from a raw decimal.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Settlement tolerance: balances within one cent of zero are considered
    /// closed, so an exact terminal payment is never rejected over a rounding
    /// residue.
    #[must_use]
    pub fn tolerance() -> Self {
        Self(Decimal::new(1, 2))
    }

    /// Returns the raw decimal value.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if the amount is strictly positive.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns `true` if the amount is strictly negative.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Returns `true` if `self` exceeds `limit` by more than the settlement
    /// tolerance.
    #[must_use]
    pub fn exceeds(self, limit: Money) -> bool {
        self.0 > limit.0 + Self::tolerance().0
    }

    /// Returns `true` if `self` reaches `total` within the settlement
    /// tolerance.
    #[must_use]
    pub fn reaches(self, total: Money) -> bool {
        self.0 >= total.0 - Self::tolerance().0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string into an amount.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading
    /// `+`/`-`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount("invalid amount".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let normalized = trimmed.replace(',', ".");
        if let Some((_, frac)) = normalized.split_once('.') {
            if frac.len() > 2 {
                return Err(EngineError::InvalidAmount(
                    "too many decimals".to_string(),
                ));
            }
        }

        let amount = Decimal::from_str(&normalized).map_err(|_| invalid())?;
        Ok(Money(amount))
    }
}

/// Reads a money column stored as TEXT.
///
/// Stored values are engine-written `Display` output, so a parse failure
/// means a corrupt row, not bad user input.
pub(crate) fn from_stored(raw: &str, what: &str) -> Result<Money, EngineError> {
    Decimal::from_str(raw)
        .map(Money)
        .map_err(|_| EngineError::InvalidAmount(format!("corrupt {what} amount: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap(), "10.00".parse().unwrap());
        assert_eq!("10.5".parse::<Money>().unwrap(), "10,50".parse().unwrap());
        assert_eq!(
            "-0.01".parse::<Money>().unwrap(),
            Money::new(Decimal::new(-1, 2))
        );
        assert_eq!("  2.30 ".parse::<Money>().unwrap().to_string(), "2.30");
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert!("12.345".parse::<Money>().is_err());
        assert!("0.001".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
    }

    #[test]
    fn exceeds_applies_tolerance() {
        let limit: Money = "100".parse().unwrap();
        assert!(!"100".parse::<Money>().unwrap().exceeds(limit));
        assert!(!"100.01".parse::<Money>().unwrap().exceeds(limit));
        assert!("100.02".parse::<Money>().unwrap().exceeds(limit));
        assert!("150".parse::<Money>().unwrap().exceeds(limit));
    }

    #[test]
    fn reaches_applies_tolerance() {
        let total: Money = "1000".parse().unwrap();
        assert!("1000".parse::<Money>().unwrap().reaches(total));
        assert!("999.99".parse::<Money>().unwrap().reaches(total));
        assert!(!"999.98".parse::<Money>().unwrap().reaches(total));
    }

    #[test]
    fn arithmetic_is_exact() {
        let mut due: Money = "1000".parse().unwrap();
        for _ in 0..10 {
            due -= "99.99".parse().unwrap();
        }
        assert_eq!(due, "0.10".parse().unwrap());
    }
}
