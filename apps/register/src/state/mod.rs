//! # State Module
//!
//! Shared state for the register.
//!
//! Each concern gets its own state type so a command declares exactly the
//! state it touches, and the cart and checkout locks never block each other.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌────────────────────┐  ┌──────────────────┐        │
//! │  │  CartState   │  │   CheckoutState    │  │   ConfigState    │        │
//! │  │              │  │                    │  │                  │        │
//! │  │  Arc<Mutex<  │  │  Arc<Mutex<Option< │  │  store_name      │        │
//! │  │    Cart      │  │   CheckoutSession  │  │  tax_rate_bps    │        │
//! │  │  >>          │  │  >>>               │  │  tip_presets     │        │
//! │  └──────────────┘  └────────────────────┘  └──────────────────┘        │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CartState: Protected by Arc<Mutex<T>> for exclusive access          │
//! │  • CheckoutState: Same, empty slot when no checkout is open            │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod checkout;
mod config;

pub use cart::{Cart, CartState};
pub use checkout::{
    CheckoutSession, CheckoutState, CheckoutStep, Navigation, OrderReceipt, OrderStatus,
};
pub use config::ConfigState;
