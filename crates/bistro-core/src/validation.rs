//! # Validation Module
//!
//! Input validation for the bill engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (TypeScript)                                    │
//! │  ├── min="0" / step="0.01" hints on inputs                             │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Register commands                                            │
//! │  └── Parse text fields into Money / Rate                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE                                                  │
//! │  └── Reject negatives, zero quantities, duplicate ids                  │
//! │                                                                         │
//! │  HTML hints do not stop programmatic negatives, so this layer          │
//! │  is the one that must hold.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{LineItem, Rate, TipPolicy};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest participant name accepted by the split ledger.
pub const MAX_PARTICIPANT_NAME_LEN: usize = 100;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates that an amount is zero or greater.
///
/// ## Example
/// ```rust
/// use bistro_core::money::Money;
/// use bistro_core::validation::validate_non_negative;
///
/// assert!(validate_non_negative(Money::from_cents(0), "tip").is_ok());
/// assert!(validate_non_negative(Money::from_cents(-1), "tip").is_err());
/// ```
pub fn validate_non_negative(amount: Money, field: &str) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::NotNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a rate (tax or tip percentage) is zero or greater.
pub fn validate_rate(rate: Rate, field: &str) -> ValidationResult<()> {
    if rate.is_negative() {
        return Err(ValidationError::NotNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates an order quantity is at least one.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a quantity entered at the cart.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (99)
pub fn validate_cart_quantity(qty: i64) -> ValidationResult<()> {
    validate_quantity(qty)?;

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a tip policy: percentages and fixed amounts may not be negative.
pub fn validate_tip_policy(policy: &TipPolicy) -> ValidationResult<()> {
    match policy {
        TipPolicy::Percentage(rate) => validate_rate(*rate, "tip percentage"),
        TipPolicy::FixedAmount(amount) => validate_non_negative(*amount, "tip amount"),
    }
}

/// Validates a participant count for a new split.
pub fn validate_participant_count(count: usize) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::MustBePositive {
            field: "participant count".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Order Validators
// =============================================================================

/// Validates a single line item.
///
/// ## Rules
/// - `id` must not be blank
/// - `unit_price` must be ≥ 0 (free items are fine)
/// - `quantity` must be ≥ 1
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    if item.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "line item id".to_string(),
        });
    }

    validate_non_negative(item.unit_price, "unit price")?;
    validate_quantity(item.quantity)?;

    Ok(())
}

/// Validates every line item and that ids are unique within the order.
pub fn validate_line_items(items: &[LineItem]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(items.len());

    for item in items {
        validate_line_item(item)?;

        if !seen.insert(item.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "line item id".to_string(),
                value: item.id.clone(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a split participant's display name.
///
/// Empty names are allowed (the field is cleared while the guest types);
/// only absurdly long input is rejected.
pub fn validate_participant_name(name: &str) -> ValidationResult<()> {
    if name.chars().count() > MAX_PARTICIPANT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "participant name".to_string(),
            max: MAX_PARTICIPANT_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, cents: i64, qty: i64) -> LineItem {
        LineItem::new(id, format!("Item {}", id), Money::from_cents(cents), qty)
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(Money::from_cents(1099), "price").is_ok());
        assert!(validate_non_negative(Money::zero(), "price").is_ok());
        assert_eq!(
            validate_non_negative(Money::from_cents(-100), "price"),
            Err(ValidationError::NotNegative {
                field: "price".to_string()
            })
        );
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(5000).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_cart_quantity() {
        assert!(validate_cart_quantity(1).is_ok());
        assert!(validate_cart_quantity(MAX_ITEM_QUANTITY).is_ok());
        assert!(validate_cart_quantity(MAX_ITEM_QUANTITY + 1).is_err());
        assert!(validate_cart_quantity(0).is_err());
    }

    #[test]
    fn test_validate_tip_policy() {
        assert!(validate_tip_policy(&TipPolicy::percent(15)).is_ok());
        assert!(validate_tip_policy(&TipPolicy::Percentage(Rate::from_bps(-1))).is_err());
        assert!(validate_tip_policy(&TipPolicy::FixedAmount(Money::from_cents(-5))).is_err());
    }

    #[test]
    fn test_validate_line_items() {
        assert!(validate_line_items(&[]).is_ok());
        assert!(validate_line_items(&[item("1", 1299, 1), item("2", 0, 3)]).is_ok());

        assert!(validate_line_items(&[item("1", -1, 1)]).is_err());
        assert!(validate_line_items(&[item("1", 100, 0)]).is_err());
        assert!(validate_line_items(&[item(" ", 100, 1)]).is_err());

        let dup = validate_line_items(&[item("1", 100, 1), item("1", 200, 1)]);
        assert!(matches!(dup, Err(ValidationError::Duplicate { .. })));
    }

    #[test]
    fn test_validate_participant_name() {
        assert!(validate_participant_name("").is_ok());
        assert!(validate_participant_name("Alex").is_ok());
        assert!(validate_participant_name(&"x".repeat(MAX_PARTICIPANT_NAME_LEN + 1)).is_err());
    }
}
