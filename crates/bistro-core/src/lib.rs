//! # bistro-core: Bill Calculation Engine for Bistro POS
//!
//! This crate holds the checkout math for the restaurant register as pure,
//! synchronous functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bistro POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React)                             │   │
//! │  │    Menu ──► Cart ──► Checkout wizard ──► Confirmation           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    register (app crate)                         │   │
//! │  │    cart, checkout session, config, order submission             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bistro-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │  totals   │  │   split   │  │ validation│  │   │
//! │  │   │   Money   │  │ Order-    │  │ Split-    │  │   rules   │  │   │
//! │  │   │  (cents)  │  │ Totals    │  │ Ledger    │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO ASYNC • NO LOCKING • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Rate, LineItem, TipPolicy, PaymentMethod
//! - [`totals`] - Subtotal / tax / tip / total derivation
//! - [`split`] - Bill-split ledger with exact cent distribution
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use bistro_core::{LineItem, Money, OrderTotals, Rate, SplitLedger, TipPolicy};
//!
//! let items = vec![
//!     LineItem::new("1", "Margherita Pizza", Money::from_cents(1299), 1),
//!     LineItem::new("3", "Garlic Bread", Money::from_cents(499), 2),
//! ];
//!
//! let totals =
//!     OrderTotals::compute(&items, Rate::from_bps(800), &TipPolicy::percent(15)).unwrap();
//!
//! let mut ledger = SplitLedger::new();
//! ledger.enable_split(totals.total, 2).unwrap();
//! assert!(ledger.remainder().is_zero());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod split;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use split::{SplitLedger, SplitParticipant};
pub use totals::OrderTotals;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Fewest people a bill can be split between.
pub const MIN_SPLIT_PARTICIPANTS: usize = 2;

/// Maximum quantity of a single item added at the cart
///
/// ## Business Reason
/// Catches fat-fingered quantities (typing 100 instead of 10) before they
/// reach the kitchen.
pub const MAX_ITEM_QUANTITY: i64 = 99;
