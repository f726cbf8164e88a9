//! # Bistro Register Library
//!
//! The checkout register for Bistro POS: state, commands and startup.
//!
//! ## Module Organization
//! ```text
//! bistro_register/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── Cart state management
//! │   ├── checkout.rs ◄─── Checkout wizard session
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   ├── checkout.rs ◄─── Wizard, tip, payment and order commands
//! │   ├── split.rs    ◄─── Bill split commands
//! │   └── config.rs   ◄─── Configuration retrieval
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## State Management (Multiple State Types)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Register State                                       │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐   │
//! │  │    CartState     │ │  CheckoutState   │ │    ConfigState       │   │
//! │  │                  │ │                  │ │                      │   │
//! │  │  • Cart items    │ │  • Wizard step   │ │  • Tax rate          │   │
//! │  │  • Quantities    │ │  • Tip, payment  │ │  • Tip presets       │   │
//! │  │                  │ │  • Split ledger  │ │  • Store name        │   │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘   │
//! │                                                                         │
//! │  Each command only requests the state it needs.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use bistro_core::{LineItem, Money};
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::{cart, checkout, split};
use error::RegisterError;
use state::{CartState, CheckoutState, ConfigState};

/// Runs the register against the sample menu order.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Register Startup                                  │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter                                │
/// │     • Default: INFO, bistro crates at DEBUG, RUST_LOG overrides         │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → register.toml → BISTRO_* environment                   │
/// │                                                                         │
/// │  3. Initialize State Objects ─────────────────────────────────────────► │
/// │     • CartState, CheckoutState (empty), ConfigState                     │
/// │                                                                         │
/// │  4. Walk the Checkout ────────────────────────────────────────────────► │
/// │     • review → payment → tip → split → confirm                          │
/// │     • print the receipt as JSON                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), RegisterError> {
    init_tracing();

    info!("Starting Bistro register");

    let config = ConfigState::load(None)?;
    let cart_state = CartState::new();
    let checkout_state = CheckoutState::new();

    info!(store = %config.store_name, "State initialized");

    for item in sample_order() {
        cart::add_to_cart(&cart_state, &config, item)?;
    }

    let view = checkout::begin_checkout(&cart_state, &checkout_state, &config)?;
    info!(
        subtotal = %config.format_money(view.totals.subtotal),
        tax = %config.format_money(view.totals.tax),
        tip = %config.format_money(view.totals.tip),
        total = %config.format_money(view.totals.total),
        "Order reviewed"
    );

    checkout::next_step(&checkout_state, &config)?;
    checkout::select_payment_method(&checkout_state, &config, "credit-card")?;
    checkout::next_step(&checkout_state, &config)?;
    checkout::next_step(&checkout_state, &config)?;

    split::enable_split(&checkout_state, &config)?;
    split::add_person(&checkout_state, &config)?;
    let view = checkout::next_step(&checkout_state, &config)?;
    info!(step = %view.step_title, "Ready to place order");

    checkout::submit_order(&checkout_state, &config).await?;
    let receipt = checkout::complete_checkout(&cart_state, &checkout_state)?;

    println!("{}", serde_json::to_string_pretty(&receipt)?);
    info!(
        order_id = %receipt.order_id,
        prep_time = %config.estimated_prep_time,
        "Order confirmed"
    );
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages everywhere
/// - `RUST_LOG=bistro_register=trace` - Trace the register only
/// - Default: INFO, DEBUG for `bistro*` targets
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bistro=debug"));

    // try_init: a subscriber may already be installed (tests, embedding)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

/// The order the register walks through when run standalone.
fn sample_order() -> Vec<LineItem> {
    vec![
        LineItem::new("1", "Margherita Pizza", Money::from_cents(1299), 1),
        LineItem::new("2", "Caesar Salad", Money::from_cents(899), 1)
            .with_customizations(["No croutons"]),
        LineItem::new("3", "Garlic Bread", Money::from_cents(499), 2),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_core::{OrderTotals, Rate, TipPolicy};

    #[test]
    fn test_sample_order_totals() {
        let totals =
            OrderTotals::compute(&sample_order(), Rate::from_bps(800), &TipPolicy::percent(15))
                .unwrap();
        assert_eq!(totals.total, Money::from_cents(3931));
    }
}
