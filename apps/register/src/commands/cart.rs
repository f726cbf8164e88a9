//! # Cart Commands
//!
//! Commands for building the order before checkout.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Placed  │       │
//! │  │  Cart    │     │          │     │  Wizard  │     │  Order   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_to_cart      begin_checkout                      │
//! │                   change_quantity  (checkout.rs)                       │
//! │                   remove_from_cart                                      │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bistro_core::{LineItem, OrderTotals, TipPolicy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{Cart, CartState, ConfigState};

/// Cart response including items and totals.
///
/// Totals carry no tip; the tip is chosen inside the checkout wizard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<LineItem>,
    pub item_count: usize,
    pub total_quantity: i64,
    pub totals: OrderTotals,
}

impl CartResponse {
    fn build(cart: &Cart, config: &ConfigState) -> Result<Self, ApiError> {
        Ok(CartResponse {
            items: cart.items.clone(),
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            totals: cart.totals(config.tax_rate(), &TipPolicy::none())?,
        })
    }
}

/// Applies `f` to a copy of the cart and commits it once the response
/// has been built.
fn update_cart<F>(cart: &CartState, config: &ConfigState, f: F) -> Result<CartResponse, ApiError>
where
    F: FnOnce(&mut Cart) -> Result<(), ApiError>,
{
    cart.with_cart_mut(|c| {
        let mut next = c.clone();
        f(&mut next)?;
        let response = CartResponse::build(&next, config)?;
        *c = next;
        Ok(response)
    })
}

/// Gets the current cart contents.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Order sidebar                                                          │
/// │                                                                         │
/// │  ┌────────────────────────────────────────────────────────────────┐    │
/// │  │  YOUR ORDER                                        4 items     │    │
/// │  ├────────────────────────────────────────────────────────────────┤    │
/// │  │  Margherita Pizza        x1              $12.99               │    │
/// │  │  Caesar Salad            x1               $8.99               │    │
/// │  │    • No croutons                                              │    │
/// │  │  Garlic Bread            x2               $9.98               │    │
/// │  ├────────────────────────────────────────────────────────────────┤    │
/// │  │  Subtotal                                $31.96               │    │
/// │  │  Tax (8%)                                 $2.56               │    │
/// │  └────────────────────────────────────────────────────────────────┘    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn get_cart(cart: &CartState, config: &ConfigState) -> Result<CartResponse, ApiError> {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::build(c, config))
}

/// Adds a menu item to the cart.
///
/// ## Behavior
/// - If the item id is already in the cart: quantity increases
/// - Otherwise: added as a new line
pub fn add_to_cart(
    cart: &CartState,
    config: &ConfigState,
    item: LineItem,
) -> Result<CartResponse, ApiError> {
    debug!(item_id = %item.id, quantity = item.quantity, "add_to_cart command");

    update_cart(cart, config, |c| {
        c.add_item(item)?;
        Ok(())
    })
}

/// Applies a +/- button press to an item's quantity.
///
/// Quantity never drops below 1; use `remove_from_cart` to delete a line.
pub fn change_quantity(
    cart: &CartState,
    config: &ConfigState,
    item_id: &str,
    delta: i64,
) -> Result<CartResponse, ApiError> {
    debug!(item_id = %item_id, delta, "change_quantity command");

    update_cart(cart, config, |c| {
        c.change_quantity(item_id, delta)?;
        Ok(())
    })
}

/// Removes an item from the cart.
pub fn remove_from_cart(
    cart: &CartState,
    config: &ConfigState,
    item_id: &str,
) -> Result<CartResponse, ApiError> {
    debug!(item_id = %item_id, "remove_from_cart command");

    update_cart(cart, config, |c| {
        c.remove_item(item_id)?;
        Ok(())
    })
}

/// Clears all items from the cart.
///
/// ## When Used
/// - Guest abandons the order
/// - After the order is confirmed (next guest)
pub fn clear_cart(cart: &CartState, config: &ConfigState) -> Result<CartResponse, ApiError> {
    debug!("clear_cart command");

    update_cart(cart, config, |c| {
        c.clear();
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use bistro_core::Money;

    fn salad() -> LineItem {
        LineItem::new("2", "Caesar Salad", Money::from_cents(899), 1)
            .with_customizations(["No croutons"])
    }

    #[test]
    fn test_cart_commands() {
        let cart = CartState::new();
        let config = ConfigState::default();

        let res = add_to_cart(&cart, &config, salad()).unwrap();
        assert_eq!(res.item_count, 1);
        assert_eq!(res.totals.tax, Money::from_cents(72));
        assert!(res.totals.tip.is_zero());

        let res = change_quantity(&cart, &config, "2", 2).unwrap();
        assert_eq!(res.total_quantity, 3);
        assert_eq!(res.totals.subtotal, Money::from_cents(2697));

        let res = clear_cart(&cart, &config).unwrap();
        assert!(res.items.is_empty());
        assert!(res.totals.total.is_zero());
    }

    #[test]
    fn test_missing_item_is_not_found() {
        let cart = CartState::new();
        let config = ConfigState::default();

        let err = remove_from_cart(&cart, &config, "nope").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = change_quantity(&cart, &config, "nope", 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_invalid_item_rejected() {
        let cart = CartState::new();
        let config = ConfigState::default();

        let bad = LineItem::new("x", "Mystery", Money::from_cents(-100), 1);
        let err = add_to_cart(&cart, &config, bad).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(get_cart(&cart, &config).unwrap().item_count, 0);
    }

    #[test]
    fn test_failed_add_leaves_cart_unchanged() {
        let cart = CartState::new();
        let config = ConfigState::default();
        add_to_cart(&cart, &config, salad()).unwrap();

        let costly = LineItem::new("9", "Truffle", Money::from_cents(i64::MAX - 10), 1);
        let err = add_to_cart(&cart, &config, costly).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let res = get_cart(&cart, &config).unwrap();
        assert_eq!(res.item_count, 1);
        assert_eq!(res.totals.subtotal, Money::from_cents(899));
    }
}
