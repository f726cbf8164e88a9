//! # Domain Types
//!
//! Core domain types used by the bill engine.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │    TipPolicy    │   │  PaymentMethod  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (unique)    │   │  Percentage     │   │  CreditCard     │       │
//! │  │  name           │   │    or           │   │  DigitalWallet  │       │
//! │  │  unit_price     │   │  FixedAmount    │   │  PayPal         │       │
//! │  │  quantity       │   └─────────────────┘   └─────────────────┘       │
//! │  │  customizations │                                                    │
//! │  └─────────────────┘   ┌─────────────────┐                             │
//! │                        │      Rate       │                             │
//! │                        │  ─────────────  │                             │
//! │                        │  bps (i64)      │                             │
//! │                        │  800 = 8%       │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// A proportional rate in basis points (bps).
///
/// Used for the tax rate and for percentage tips.
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 800 bps = 8% (the register's default tax), 1500 bps = a 15% tip.
///
/// The value is signed so a negative rate coming from user input can be
/// represented and rejected with a validation error rather than wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(i64);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: i64) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a whole percentage (`15` → 15%).
    ///
    /// Out-of-range percentages saturate; see [`Rate::checked_from_percent`].
    #[inline]
    pub const fn from_percent(percent: i64) -> Self {
        Rate(percent.saturating_mul(100))
    }

    /// Creates a rate from a whole percentage, or `None` if the basis
    /// points would not fit.
    #[inline]
    pub const fn checked_from_percent(percent: i64) -> Option<Self> {
        match percent.checked_mul(100) {
            Some(bps) => Some(Rate(bps)),
            None => None,
        }
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> i64 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the rate is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        if abs % 100 == 0 {
            write!(f, "{}{}%", sign, abs / 100)
        } else {
            write!(f, "{}{}.{:02}%", sign, abs / 100, abs % 100)
        }
    }
}

/// Parses a percentage string such as `"8"`, `"8.25"` or `"15"`.
///
/// Up to two fractional digits (one basis point) are accepted.
impl FromStr for Rate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_end_matches('%');
        // A percentage has the same shape as a currency amount: whole part,
        // then up to two decimals, so reuse that parser.
        let hundredths: Money = s.parse().map_err(|_| ValidationError::InvalidFormat {
            field: "rate".to_string(),
            reason: format!("'{}' is not a percentage with at most 2 decimals", s),
        })?;
        Ok(Rate(hundredths.cents()))
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One line of an order: a menu item, its price and how many were ordered.
///
/// Line items are immutable once handed to `OrderTotals::compute`; the cart
/// owns the mutable copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Unique identifier within an order.
    pub id: String,

    /// Display name shown on the order review.
    pub name: String,

    /// Price of a single unit.
    pub unit_price: Money,

    /// Units ordered (at least 1).
    pub quantity: i64,

    /// Labels such as "No croutons". Informational only, never priced.
    #[serde(default)]
    pub customizations: Vec<String>,
}

impl LineItem {
    /// Creates a line item without customizations.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> Self {
        LineItem {
            id: id.into(),
            name: name.into(),
            unit_price,
            quantity,
            customizations: Vec::new(),
        }
    }

    /// Attaches customization labels.
    pub fn with_customizations<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.customizations = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Unit price × quantity, or `None` on overflow.
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price.checked_mul_quantity(self.quantity)
    }
}

// =============================================================================
// Tip Policy
// =============================================================================

/// How the gratuity is derived.
///
/// Exactly one rule is active at a time: picking a preset percentage
/// replaces a custom amount and vice versa.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Add Tip step                                                           │
/// │                                                                         │
/// │  [ 10% ] [ 15% ] [ 20% ]  ──► Percentage(rate)  tip = subtotal × rate  │
/// │                                                                         │
/// │  Custom amount: [ 6.00 ]  ──► FixedAmount(a)    tip = a                │
/// │                                                                         │
/// │  Percentages apply to the PRE-TAX subtotal.                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TipPolicy {
    /// Tip is a share of the pre-tax subtotal.
    Percentage(Rate),
    /// Tip is an exact amount entered by the guest.
    FixedAmount(Money),
}

impl TipPolicy {
    /// No tip at all (0%).
    #[inline]
    pub const fn none() -> Self {
        TipPolicy::Percentage(Rate::zero())
    }

    /// A whole-percent preset such as the 10/15/20 buttons.
    #[inline]
    pub const fn percent(percent: i64) -> Self {
        TipPolicy::Percentage(Rate::from_percent(percent))
    }

    /// Like [`TipPolicy::percent`], but fails on a percentage too large to
    /// hold in basis points.
    pub fn try_percent(percent: i64) -> Result<Self, ValidationError> {
        Rate::checked_from_percent(percent)
            .map(TipPolicy::Percentage)
            .ok_or_else(|| ValidationError::Overflow {
                field: "tip percentage".to_string(),
            })
    }

    /// Builds a fixed-amount policy from the text of a custom tip field.
    ///
    /// A malformed or negative amount is rejected instead of clamped.
    ///
    /// ```rust
    /// use bistro_core::{Money, TipPolicy};
    ///
    /// let tip = TipPolicy::parse_custom("6.50").unwrap();
    /// assert_eq!(tip, TipPolicy::FixedAmount(Money::from_cents(650)));
    ///
    /// assert!(TipPolicy::parse_custom("-2").is_err());
    /// ```
    pub fn parse_custom(input: &str) -> Result<Self, ValidationError> {
        let amount: Money = input.parse().map_err(|_| ValidationError::InvalidFormat {
            field: "custom tip".to_string(),
            reason: format!("'{}' is not a currency amount", input.trim()),
        })?;
        crate::validation::validate_non_negative(amount, "custom tip")?;
        Ok(TipPolicy::FixedAmount(amount))
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the guest settles the bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    /// Credit or debit card.
    #[default]
    CreditCard,
    /// Phone wallet (Apple Pay, Google Pay, ...).
    DigitalWallet,
    /// PayPal checkout.
    #[serde(rename = "paypal")]
    PayPal,
}

impl PaymentMethod {
    /// Label shown on the confirmation step.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::DigitalWallet => "Digital Wallet",
            PaymentMethod::PayPal => "PayPal",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "credit-card" | "card" => Ok(PaymentMethod::CreditCard),
            "digital-wallet" | "wallet" => Ok(PaymentMethod::DigitalWallet),
            "paypal" => Ok(PaymentMethod::PayPal),
            other => Err(ValidationError::InvalidFormat {
                field: "payment method".to_string(),
                reason: format!(
                    "unknown method '{}', expected credit-card, digital-wallet or paypal",
                    other
                ),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
