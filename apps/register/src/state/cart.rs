//! # Cart State
//!
//! Manages the order being built from the menu.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Several commands read and modify the cart
//! 2. Only one command should modify the cart at a time
//! 3. Commands may be dispatched from different threads
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  UI Action                Command                 Cart State Change     │
//! │  ─────────                ───────                 ─────────────────     │
//! │                                                                         │
//! │  Add menu item ──────────► add_to_cart() ───────► merge or push        │
//! │                                                                         │
//! │  Click + / − ────────────► change_quantity() ───► qty = max(1, q + d)  │
//! │                                                                         │
//! │  Click Remove ───────────► remove_from_cart() ──► items.remove(i)      │
//! │                                                                         │
//! │  Click Clear ────────────► clear_cart() ────────► items.clear()        │
//! │                                                                         │
//! │  View Cart ──────────────► get_cart() ──────────► (read only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use bistro_core::validation::{validate_cart_quantity, validate_line_item};
use bistro_core::{CoreError, CoreResult, LineItem, OrderTotals, Rate, TipPolicy};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The order under construction.
///
/// ## Invariants
/// - Items are unique by `id` (adding the same id increases quantity)
/// - Quantity stays between 1 and `bistro_core::MAX_ITEM_QUANTITY`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Items in the cart
    pub items: Vec<LineItem>,

    /// When the cart was created/last cleared
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds an item, or increases its quantity if the id is already present.
    ///
    /// Nothing changes if the item is invalid or the merged quantity would
    /// exceed the maximum.
    pub fn add_item(&mut self, item: LineItem) -> CoreResult<()> {
        validate_line_item(&item)?;
        validate_cart_quantity(item.quantity)?;

        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            let new_qty = existing.quantity + item.quantity;
            validate_cart_quantity(new_qty)?;
            existing.quantity = new_qty;
            return Ok(());
        }

        self.items.push(item);
        Ok(())
    }

    /// Adjusts an item's quantity by `delta`, never going below 1.
    ///
    /// Returns the new quantity.
    pub fn change_quantity(&mut self, id: &str, delta: i64) -> CoreResult<i64> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))?;

        let new_qty = item.quantity.saturating_add(delta).max(1);
        validate_cart_quantity(new_qty)?;

        item.quantity = new_qty;
        Ok(new_qty)
    }

    /// Removes an item from the cart by id.
    pub fn remove_item(&mut self, id: &str) -> CoreResult<LineItem> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))?;
        Ok(self.items.remove(index))
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    /// Number of distinct items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total units across all items (the badge on the cart icon).
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Totals for the cart under the given tax rate and tip policy.
    pub fn totals(&self, tax_rate: Rate, tip: &TipPolicy) -> CoreResult<OrderTotals> {
        OrderTotals::compute(&self.items, tax_rate, tip)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared cart state.
///
/// A poisoned lock is recovered rather than propagated: every cart
/// mutation validates before it writes, so the data behind the lock is
/// always consistent.
#[derive(Debug, Clone)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState {
            cart: Arc::new(Mutex::new(Cart::new())),
        }
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_core::{Money, ValidationError, MAX_ITEM_QUANTITY};

    fn pizza(qty: i64) -> LineItem {
        LineItem::new("pizza", "Margherita Pizza", Money::from_cents(1299), qty)
    }

    #[test]
    fn test_add_same_item_increases_quantity() {
        let mut cart = Cart::new();
        cart.add_item(pizza(1)).unwrap();
        cart.add_item(pizza(2)).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_add_rejects_invalid_items() {
        let mut cart = Cart::new();
        assert!(cart.add_item(pizza(0)).is_err());

        let free_but_negative = LineItem::new("x", "Bad", Money::from_cents(-1), 1);
        assert!(cart.add_item(free_but_negative).is_err());

        cart.add_item(pizza(MAX_ITEM_QUANTITY)).unwrap();
        assert!(matches!(
            cart.add_item(pizza(1)),
            Err(CoreError::InvalidInput(ValidationError::OutOfRange { .. }))
        ));
        assert_eq!(cart.total_quantity(), MAX_ITEM_QUANTITY);
    }

    #[test]
    fn test_change_quantity_clamps_at_one() {
        let mut cart = Cart::new();
        cart.add_item(pizza(2)).unwrap();

        assert_eq!(cart.change_quantity("pizza", 1).unwrap(), 3);
        assert_eq!(cart.change_quantity("pizza", -10).unwrap(), 1);
        assert!(matches!(
            cart.change_quantity("salad", 1),
            Err(CoreError::ItemNotFound(_))
        ));
        assert!(cart.change_quantity("pizza", MAX_ITEM_QUANTITY).is_err());
        assert_eq!(cart.total_quantity(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        cart.add_item(pizza(1)).unwrap();
        cart.add_item(LineItem::new("bread", "Garlic Bread", Money::from_cents(499), 2))
            .unwrap();

        let removed = cart.remove_item("pizza").unwrap();
        assert_eq!(removed.name, "Margherita Pizza");
        assert!(cart.remove_item("pizza").is_err());

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_totals() {
        let mut cart = Cart::new();
        cart.add_item(pizza(1)).unwrap();
        cart.add_item(LineItem::new("salad", "Caesar Salad", Money::from_cents(899), 2))
            .unwrap();
        cart.add_item(LineItem::new("bread", "Garlic Bread", Money::from_cents(499), 1))
            .unwrap();

        let totals = cart.totals(Rate::from_bps(800), &TipPolicy::none()).unwrap();
        assert_eq!(totals.subtotal, Money::from_cents(3596));
        assert_eq!(totals.tax, Money::from_cents(288));
        assert_eq!(totals.total, Money::from_cents(3884));
    }

    #[test]
    fn test_cart_state_shares_one_cart() {
        let state = CartState::new();
        let other = state.clone();

        state.with_cart_mut(|c| c.add_item(pizza(1))).unwrap();
        assert_eq!(other.with_cart(|c| c.total_quantity()), 1);
    }
}
