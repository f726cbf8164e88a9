//! # Split Commands
//!
//! The Split Bill step: divide the total between guests and track who paid.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Split Bill                                         Total: $39.31       │
//! │                                                                         │
//! │  [x] Split between multiple people                                     │
//! │                                                                         │
//! │  Person 1     [ 19.66 ]  [ ] paid   [Remove]                            │
//! │  Person 2     [ 19.65 ]  [ ] paid   [Remove]                            │
//! │                                                                         │
//! │  [+ Add Person]                        Remaining: $0.00                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Adding or removing a person rebalances everyone equally. Editing one
//! amount does not; the difference shows up as the remaining balance.

use bistro_core::{Money, SplitLedger, SplitParticipant};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::commands::checkout::{update_session, CheckoutView};
use crate::error::ApiError;
use crate::state::{CheckoutState, ConfigState};

/// The split ledger as the Split Bill step renders it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitView {
    pub participants: Vec<SplitParticipant>,
    pub total: Money,
    /// Total minus the sum of shares (negative when over-assigned)
    pub remainder: Money,
    pub paid: Money,
    pub outstanding: Money,
    pub all_paid: bool,
}

impl SplitView {
    /// `None` while the bill has a single payer.
    pub fn from_ledger(ledger: &SplitLedger) -> Option<Self> {
        let total = ledger.total()?;
        Some(SplitView {
            participants: ledger.participants().to_vec(),
            total,
            remainder: ledger.remainder(),
            paid: ledger.paid_amount(),
            outstanding: ledger.outstanding_amount(),
            all_paid: ledger.all_paid(),
        })
    }
}

/// Turns on the split with two people. Already split: unchanged.
pub fn enable_split(
    checkout: &CheckoutState,
    config: &ConfigState,
) -> Result<CheckoutView, ApiError> {
    debug!("enable_split command");
    update_session(checkout, config, |session| {
        session.enable_split()?;
        info!(people = session.ledger().len(), "Bill split");
        Ok(())
    })
}

/// Back to a single payer.
pub fn disable_split(
    checkout: &CheckoutState,
    config: &ConfigState,
) -> Result<CheckoutView, ApiError> {
    debug!("disable_split command");
    update_session(checkout, config, |session| {
        session.disable_split()?;
        Ok(())
    })
}

/// The "Add Person" button.
pub fn add_person(
    checkout: &CheckoutState,
    config: &ConfigState,
) -> Result<CheckoutView, ApiError> {
    debug!("add_person command");
    update_session(checkout, config, |session| {
        session.ledger_mut()?.add_participant()?;
        Ok(())
    })
}

/// A row's "Remove" button. The last two people cannot be removed.
pub fn remove_person(
    checkout: &CheckoutState,
    config: &ConfigState,
    index: usize,
) -> Result<CheckoutView, ApiError> {
    debug!(index, "remove_person command");
    update_session(checkout, config, |session| {
        let removed = session.ledger_mut()?.remove_participant(index)?;
        debug!(name = %removed.name, "Person removed from split");
        Ok(())
    })
}

/// Edits one person's share from the amount field.
///
/// An empty field means zero. Other shares are left alone.
pub fn set_person_amount(
    checkout: &CheckoutState,
    config: &ConfigState,
    index: usize,
    amount: &str,
) -> Result<CheckoutView, ApiError> {
    debug!(index, amount = %amount, "set_person_amount command");

    let amount = if amount.trim().is_empty() {
        Money::zero()
    } else {
        amount.parse::<Money>()?
    };

    update_session(checkout, config, |session| {
        session.ledger_mut()?.set_participant_amount(index, amount)?;
        Ok(())
    })
}

/// Renames a person.
pub fn set_person_name(
    checkout: &CheckoutState,
    config: &ConfigState,
    index: usize,
    name: &str,
) -> Result<CheckoutView, ApiError> {
    debug!(index, name = %name, "set_person_name command");
    update_session(checkout, config, |session| {
        session.ledger_mut()?.set_participant_name(index, name)?;
        Ok(())
    })
}

/// Ticks or unticks a person's "paid" box.
pub fn toggle_paid(
    checkout: &CheckoutState,
    config: &ConfigState,
    index: usize,
) -> Result<CheckoutView, ApiError> {
    debug!(index, "toggle_paid command");
    update_session(checkout, config, |session| {
        let paid = session.ledger_mut()?.toggle_paid(index)?;
        debug!(index, paid, "Paid flag toggled");
        Ok(())
    })
}
