//! # Order Totals
//!
//! Derives an order's monetary breakdown from its line items, a tax rate and
//! a tip policy.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  items ──► Σ(unit_price × quantity) ──► subtotal (exact)               │
//! │                                            │                            │
//! │                     ┌──────────────────────┼──────────────────┐         │
//! │                     ▼                      ▼                  │         │
//! │          round(subtotal × tax)   Percentage: round(subtotal × p)        │
//! │                     │            FixedAmount: a               │         │
//! │                     ▼                      ▼                  ▼         │
//! │                    tax        +           tip       +     subtotal      │
//! │                                    = total (no further rounding)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each field is rounded exactly once, half up, when it is finalized. Tax is
//! taken on the whole subtotal, not per line, so summing per-line rounded tax
//! can never drift away from the transaction's tax.
//!
//! Nothing is cached: the register recomputes on every input change.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{LineItem, Rate, TipPolicy};
use crate::validation::{validate_line_items, validate_rate, validate_tip_policy};

/// Monetary breakdown of an order.
///
/// Invariant: `total == subtotal + tax + tip`, exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub tip: Money,
    pub total: Money,
}

impl OrderTotals {
    /// Computes the totals for `items`.
    ///
    /// ## Errors
    /// `CoreError::InvalidInput` when a price is negative, a quantity is
    /// below 1, an id repeats, the tax rate or tip is negative, or the
    /// amounts overflow.
    ///
    /// ## Example
    /// ```rust
    /// use bistro_core::{LineItem, Money, OrderTotals, Rate, TipPolicy};
    ///
    /// let items = vec![
    ///     LineItem::new("1", "Margherita Pizza", Money::from_cents(1299), 1),
    ///     LineItem::new("2", "Caesar Salad", Money::from_cents(899), 1),
    ///     LineItem::new("3", "Garlic Bread", Money::from_cents(499), 2),
    /// ];
    ///
    /// let totals =
    ///     OrderTotals::compute(&items, Rate::from_bps(800), &TipPolicy::percent(15)).unwrap();
    /// assert_eq!(totals.subtotal.cents(), 3196);
    /// assert_eq!(totals.tax.cents(), 256);
    /// assert_eq!(totals.tip.cents(), 479);
    /// assert_eq!(totals.total.cents(), 3931);
    /// ```
    pub fn compute(
        items: &[LineItem],
        tax_rate: Rate,
        tip_policy: &TipPolicy,
    ) -> CoreResult<Self> {
        validate_line_items(items)?;
        validate_rate(tax_rate, "tax rate")?;
        validate_tip_policy(tip_policy)?;

        let subtotal = subtotal(items)?;
        let tax = subtotal
            .checked_apply_rate(tax_rate)
            .ok_or_else(|| overflow("tax"))?;
        let tip = tip_amount(subtotal, tip_policy)?;

        let total = subtotal
            .checked_add(tax)
            .and_then(|m| m.checked_add(tip))
            .ok_or_else(|| overflow("total"))?;

        Ok(OrderTotals {
            subtotal,
            tax,
            tip,
            total,
        })
    }

    /// Subtotal plus tax, before any tip (what the review step shows).
    #[inline]
    pub fn pre_tip_total(&self) -> Money {
        self.subtotal + self.tax
    }
}

/// Resolves the tip for a given pre-tax subtotal.
///
/// Exposed separately so preset buttons can preview their amount without a
/// full recomputation.
///
/// ```rust
/// use bistro_core::{Money, TipPolicy};
/// use bistro_core::totals::tip_amount;
///
/// let subtotal = Money::from_cents(3196);
/// assert_eq!(tip_amount(subtotal, &TipPolicy::percent(20)).unwrap().cents(), 639);
/// ```
pub fn tip_amount(subtotal: Money, policy: &TipPolicy) -> CoreResult<Money> {
    validate_tip_policy(policy)?;

    match policy {
        TipPolicy::Percentage(rate) => Ok(subtotal
            .checked_apply_rate(*rate)
            .ok_or_else(|| overflow("tip"))?),
        TipPolicy::FixedAmount(amount) => Ok(*amount),
    }
}

fn subtotal(items: &[LineItem]) -> CoreResult<Money> {
    items.iter().try_fold(Money::zero(), |acc, item| {
        item.line_total()
            .and_then(|line| acc.checked_add(line))
            .ok_or_else(|| overflow("subtotal").into())
    })
}

fn overflow(field: &str) -> ValidationError {
    ValidationError::Overflow {
        field: field.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
