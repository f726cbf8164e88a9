//! # Register Commands
//!
//! Everything the presentation layer can ask the register to do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── cart.rs      ◄─── Cart manipulation
//! ├── checkout.rs  ◄─── Wizard navigation, payment, tip, order submission
//! ├── split.rs     ◄─── Per-person bill split
//! └── config.rs    ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Presentation layer                                                     │
//! │  ──────────────────                                                     │
//! │  set_custom_tip(&checkout, &config, "6.00")                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Command (this module)                                                  │
//! │  ──────────────────────                                                 │
//! │  1. Lock the state it needs                                             │
//! │  2. Call into the session / bistro-core                                 │
//! │  3. Map CoreError ──► ApiError                                          │
//! │  4. Return a camelCase view for rendering                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Result<CheckoutView, ApiError>                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs the cart
//! fn remove_from_cart(cart: &CartState, id: &str)
//!
//! // Needs the checkout and config (for tip presets)
//! fn next_step(checkout: &CheckoutState, config: &ConfigState)
//! ```

pub mod cart;
pub mod checkout;
pub mod config;
pub mod split;
