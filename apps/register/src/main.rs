//! # Bistro Register Entry Point
//!
//! Runs the register standalone: loads configuration, walks the sample
//! order through the checkout wizard and prints the receipt.
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bistro Register                                  │
//! │                                                                         │
//! │  main.rs ────► Starts the tokio runtime, reports failures              │
//! │                                                                         │
//! │  lib.rs ─────► Logging, config, state, checkout walk-through           │
//! │                                                                         │
//! │  commands/ ──► add_to_cart, select_tip_preset, add_person, submit_order│
//! │                                                                         │
//! │  state/ ─────► CartState, CheckoutState, ConfigState                   │
//! │                                                                         │
//! │  bistro-core ► Money, OrderTotals, SplitLedger                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    match bistro_register::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Register failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
