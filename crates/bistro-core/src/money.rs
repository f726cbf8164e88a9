//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    $39.31 / 3 = 13.103333...  → shown as $13.10 three times            │
//! │    13.10 × 3 = 39.30          → the table is one cent short!          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    3931 cents / 3 = 1310 cents, leftover 1 cent                        │
//! │    We KNOW where the cent went, and assign it explicitly               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bistro_core::money::Money;
//!
//! let pizza = Money::from_cents(1299); // $12.99
//! let bread = Money::from_major_minor(4, 99);
//!
//! let line = bread * 2;               // $9.98
//! assert_eq!((pizza + line).cents(), 2297);
//!
//! // Parsing user input (a custom tip field, say)
//! let tip: Money = "5.5".parse().unwrap();
//! assert_eq!(tip.cents(), 550);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Rate;

/// Number of minor units in one major unit (cents per dollar).
pub const MINOR_UNITS: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: A ledger remainder can be negative when a diner
///   overpays by hand, so the type must be able to say so
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money is Used
/// ```text
/// LineItem.unit_price ──► line total ──► subtotal ──┬──► tax
///                                                   ├──► tip
///                                                   ▼
///                                     total ──► SplitLedger shares
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// let price = Money::from_cents(1299); // Represents $12.99
    /// assert_eq!(price.cents(), 1299);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50
    ///
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(39, 31).cents(), 3931);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * MINOR_UNITS - minor)
        } else {
            Money(major * MINOR_UNITS + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / MINOR_UNITS
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % MINOR_UNITS).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Applies a rate and rounds the result to whole cents, half up.
    ///
    /// This is the single rounding point for tax and percentage tips.
    /// Returns `None` if the result does not fit in the money range.
    ///
    /// ## Round Half Up
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  amount × bps / 10000, then:                                        │
    /// │                                                                     │
    /// │    255.68 cents → 256      (tax on $31.96 at 8%)                    │
    /// │    479.40 cents → 479      (15% tip on $31.96)                      │
    /// │     82.50 cents →  83      (.5 always goes up)                      │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Implementation
    /// Integer math: `floor((amount * bps + 5000) / 10000)`.
    /// The +5000 provides rounding (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::money::Money;
    /// use bistro_core::types::Rate;
    ///
    /// let subtotal = Money::from_cents(3196);
    /// let tax = subtotal.checked_apply_rate(Rate::from_bps(800)).unwrap();
    /// assert_eq!(tax.cents(), 256);
    /// ```
    pub fn checked_apply_rate(&self, rate: Rate) -> Option<Money> {
        // i128 keeps the intermediate product exact
        let scaled = self.0 as i128 * rate.bps() as i128 + 5000;
        let cents = scaled.div_euclid(10_000);
        i64::try_from(cents).ok().map(Money)
    }

    /// Multiplies money by a quantity, or `None` on overflow.
    ///
    /// ```rust
    /// use bistro_core::money::Money;
    ///
    /// let garlic_bread = Money::from_cents(499);
    /// assert_eq!(garlic_bread.checked_mul_quantity(2), Some(Money::from_cents(998)));
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, or `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, clamping at the bounds of the money range.
    #[inline]
    pub const fn saturating_add(&self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Subtracts two amounts, clamping at the bounds of the money range.
    #[inline]
    pub const fn saturating_sub(&self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a decimal currency string such as `"12"`, `"12.5"` or `"-3.05"`.
///
/// At most two fractional digits are accepted; anything finer than a cent is
/// rejected instead of being silently rounded. The sign is preserved so the
/// caller decides whether negatives are allowed.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (digits, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("expected a number"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("expected digits with an optional decimal point"));
        }
        if frac.len() > 2 {
            return Err(invalid("at most 2 decimal places are allowed"));
        }

        let major: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount is too large"))?
        };
        let minor: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("bad cents"))? * 10,
            _ => frac.parse().map_err(|_| invalid("bad cents"))?,
        };

        let cents = major
            .checked_mul(MINOR_UNITS)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and logs. The register formats amounts through its
/// configured currency settings.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (quantities, participant counts).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1299);
        assert_eq!(money.cents(), 1299);
        assert_eq!(money.dollars(), 12);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(3931)), "$39.31");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-3034)), "-$30.34");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1966);
        let b = Money::from_cents(1965);

        assert_eq!((a + b).cents(), 3931);
        assert_eq!((a - b).cents(), 1);
        assert_eq!((b * 3).cents(), 5895);

        let shares = [a, b];
        assert_eq!(shares.iter().sum::<Money>(), Money::from_cents(3931));
    }

    #[test]
    fn test_apply_rate_rounds_half_up() {
        let subtotal = Money::from_cents(3196);
        assert_eq!(
            subtotal.checked_apply_rate(Rate::from_bps(800)),
            Some(Money::from_cents(256))
        );
        assert_eq!(
            subtotal.checked_apply_rate(Rate::from_bps(1500)),
            Some(Money::from_cents(479))
        );

        // $10.00 at 8.25% = 82.5 cents → 83
        let ten = Money::from_cents(1000);
        assert_eq!(
            ten.checked_apply_rate(Rate::from_bps(825)),
            Some(Money::from_cents(83))
        );
    }

    #[test]
    fn test_apply_rate_overflow() {
        let huge = Money::from_cents(i64::MAX);
        assert_eq!(huge.checked_apply_rate(Rate::from_bps(20_000)), None);
    }

    #[test]
    fn test_checked_ops() {
        assert_eq!(Money::from_cents(i64::MAX).checked_mul_quantity(2), None);
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
        assert_eq!(
            Money::from_cents(499).checked_mul_quantity(2),
            Some(Money::from_cents(998))
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("12".parse::<Money>().unwrap().cents(), 1200);
        assert_eq!("12.5".parse::<Money>().unwrap().cents(), 1250);
        assert_eq!(" 12.05 ".parse::<Money>().unwrap().cents(), 1205);
        assert_eq!(".75".parse::<Money>().unwrap().cents(), 75);
        assert_eq!("-3.05".parse::<Money>().unwrap().cents(), -305);

        assert!("".parse::<Money>().is_err());
        assert!(".".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!("1e3".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }
}
