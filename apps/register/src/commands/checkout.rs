//! # Checkout Commands
//!
//! Drive the checkout wizard from the presentation layer.
//!
//! ## Order Submission
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    submit_order()                                       │
//! │                                                                         │
//! │  Confirmation step                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  place_order(uuid, now) ──► status = Processing, receipt snapshotted   │
//! │       │                     (lock released)                             │
//! │       ▼                                                                 │
//! │  sleep(processing_delay) ──► wizard buttons disabled meanwhile          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  confirm() ──────────────► status = Confirmed                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  complete_checkout() ────► cart cleared, wizard closed                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bistro_core::{Money, OrderTotals, PaymentMethod, TipPolicy};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::commands::split::SplitView;
use crate::error::{ApiError, ErrorCode};
use crate::state::{
    CartState, CheckoutSession, CheckoutState, CheckoutStep, ConfigState, Navigation,
    OrderReceipt, OrderStatus,
};

// =============================================================================
// Views
// =============================================================================

/// One tip button with the amount it would add.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TipOption {
    pub percent: i64,
    pub amount: Money,
    pub selected: bool,
}

/// Everything the wizard needs to render the current step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub step: CheckoutStep,
    pub step_title: String,
    pub step_index: usize,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub tip_policy: TipPolicy,
    pub tip_options: Vec<TipOption>,
    pub totals: OrderTotals,
    pub split: Option<SplitView>,
    pub receipt: Option<OrderReceipt>,
}

impl CheckoutView {
    pub(crate) fn build(session: &CheckoutSession, config: &ConfigState) -> Result<Self, ApiError> {
        let tip_options = config
            .tip_presets
            .iter()
            .map(|&percent| -> Result<TipOption, ApiError> {
                Ok(TipOption {
                    percent,
                    amount: session.tip_preview(percent)?,
                    selected: session.tip_policy() == TipPolicy::percent(percent),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let step = session.step();
        Ok(CheckoutView {
            step,
            step_title: step.title().to_string(),
            step_index: step.index(),
            status: session.status(),
            payment_method: session.payment_method(),
            tip_policy: session.tip_policy(),
            tip_options,
            totals: session.totals()?,
            split: SplitView::from_ledger(session.ledger()),
            receipt: session.receipt().cloned(),
        })
    }
}

/// Runs `f` against the open session, or fails with `NO_CHECKOUT`.
pub(crate) fn with_session<F, R>(checkout: &CheckoutState, f: F) -> Result<R, ApiError>
where
    F: FnOnce(&mut CheckoutSession) -> Result<R, ApiError>,
{
    checkout.with_checkout_mut(|slot| match slot.as_mut() {
        Some(session) => f(session),
        None => Err(ApiError::no_checkout()),
    })
}

/// Applies `f` to a copy of the session and renders it.
///
/// The copy replaces the session only once the view has been built, so a
/// failure at either stage leaves the checkout as it was.
pub(crate) fn update_session<F>(
    checkout: &CheckoutState,
    config: &ConfigState,
    f: F,
) -> Result<CheckoutView, ApiError>
where
    F: FnOnce(&mut CheckoutSession) -> Result<(), ApiError>,
{
    with_session(checkout, |session| {
        let mut next = session.clone();
        f(&mut next)?;
        let view = CheckoutView::build(&next, config)?;
        *session = next;
        Ok(view)
    })
}

// =============================================================================
// Commands
// =============================================================================

/// Opens the wizard over a snapshot of the cart.
///
/// Replaces any checkout still in draft. An order that is processing
/// cannot be abandoned.
pub fn begin_checkout(
    cart: &CartState,
    checkout: &CheckoutState,
    config: &ConfigState,
) -> Result<CheckoutView, ApiError> {
    debug!("begin_checkout command");

    let items = cart.with_cart(|c| c.items.clone());
    let session = CheckoutSession::new(items, config.tax_rate(), config.default_tip())?;

    checkout.with_checkout_mut(|slot| {
        if let Some(existing) = slot.as_ref() {
            if existing.status() == OrderStatus::Processing {
                return Err(ApiError::new(
                    ErrorCode::InvalidState,
                    "An order is still processing",
                ));
            }
        }

        let view = CheckoutView::build(&session, config)?;
        info!(items = session.items().len(), total = %view.totals.total, "Checkout started");
        *slot = Some(session);
        Ok(view)
    })
}

/// Gets the current wizard view.
pub fn get_checkout(
    checkout: &CheckoutState,
    config: &ConfigState,
) -> Result<CheckoutView, ApiError> {
    debug!("get_checkout command");
    with_session(checkout, |session| CheckoutView::build(session, config))
}

/// The "Next" button.
pub fn next_step(
    checkout: &CheckoutState,
    config: &ConfigState,
) -> Result<CheckoutView, ApiError> {
    debug!("next_step command");
    update_session(checkout, config, |session| {
        session.advance()?;
        Ok(())
    })
}

/// The "Back" / "Cancel" button.
///
/// Returns `None` when backing out of the first step closed the wizard.
pub fn previous_step(
    checkout: &CheckoutState,
    config: &ConfigState,
) -> Result<Option<CheckoutView>, ApiError> {
    debug!("previous_step command");

    checkout.with_checkout_mut(|slot| {
        let mut next = slot.as_ref().cloned().ok_or_else(ApiError::no_checkout)?;
        match next.back()? {
            Navigation::Moved(_) => {
                let view = CheckoutView::build(&next, config)?;
                *slot = Some(next);
                Ok(Some(view))
            }
            Navigation::Cancelled => {
                *slot = None;
                info!("Checkout cancelled");
                Ok(None)
            }
        }
    })
}

/// Selects how the guest pays (`credit-card`, `digital-wallet`, `paypal`).
pub fn select_payment_method(
    checkout: &CheckoutState,
    config: &ConfigState,
    method: &str,
) -> Result<CheckoutView, ApiError> {
    debug!(method = %method, "select_payment_method command");

    let method: PaymentMethod = method.parse()?;
    update_session(checkout, config, |session| {
        session.set_payment_method(method)?;
        Ok(())
    })
}

/// Selects one of the configured tip buttons.
pub fn select_tip_preset(
    checkout: &CheckoutState,
    config: &ConfigState,
    percent: i64,
) -> Result<CheckoutView, ApiError> {
    debug!(percent, "select_tip_preset command");

    if !config.tip_presets.contains(&percent) {
        return Err(ApiError::validation(format!(
            "{}% is not one of the tip options {:?}",
            percent, config.tip_presets
        )));
    }

    update_session(checkout, config, |session| {
        session.select_tip_preset(percent)?;
        Ok(())
    })
}

/// Applies the custom tip field. Empty text means no tip.
pub fn set_custom_tip(
    checkout: &CheckoutState,
    config: &ConfigState,
    amount: &str,
) -> Result<CheckoutView, ApiError> {
    debug!(amount = %amount, "set_custom_tip command");
    update_session(checkout, config, |session| {
        session.set_custom_tip(amount)?;
        Ok(())
    })
}

/// Pulls the current cart into an open draft checkout.
pub fn refresh_checkout_items(
    cart: &CartState,
    checkout: &CheckoutState,
    config: &ConfigState,
) -> Result<CheckoutView, ApiError> {
    debug!("refresh_checkout_items command");

    let items = cart.with_cart(|c| c.items.clone());
    update_session(checkout, config, |session| {
        session.replace_items(items)?;
        Ok(())
    })
}

/// Closes a draft checkout without placing it.
pub fn cancel_checkout(checkout: &CheckoutState) -> Result<(), ApiError> {
    debug!("cancel_checkout command");

    checkout.with_checkout_mut(|slot| {
        if slot.as_ref().map(CheckoutSession::status) == Some(OrderStatus::Processing) {
            return Err(ApiError::new(
                ErrorCode::InvalidState,
                "Cannot cancel an order that is processing",
            ));
        }
        if slot.take().is_some() {
            info!("Checkout cancelled");
        }
        Ok(())
    })
}

/// Places the order and waits out payment processing.
///
/// The session lock is not held while waiting, so the wizard can be
/// rendered (with its buttons disabled) in the meantime.
pub async fn submit_order(
    checkout: &CheckoutState,
    config: &ConfigState,
) -> Result<OrderReceipt, ApiError> {
    debug!("submit_order command");

    let order_id = Uuid::new_v4().to_string();
    let receipt = with_session(checkout, |session| {
        Ok(session.place_order(order_id, Utc::now())?)
    })?;

    info!(
        order_id = %receipt.order_id,
        total = %receipt.totals.total,
        method = receipt.payment_method.label(),
        split = receipt.split.as_ref().map_or(0, Vec::len),
        "Order placed, processing payment"
    );

    tokio::time::sleep(config.processing_delay()).await;

    let receipt = with_session(checkout, |session| Ok(session.confirm()?.clone()))?;
    info!(order_id = %receipt.order_id, "Order confirmed");
    Ok(receipt)
}

/// The "Done" button: closes a confirmed checkout and empties the cart.
pub fn complete_checkout(
    cart: &CartState,
    checkout: &CheckoutState,
) -> Result<OrderReceipt, ApiError> {
    debug!("complete_checkout command");

    let receipt = checkout.with_checkout_mut(|slot| {
        let session = slot.as_ref().ok_or_else(ApiError::no_checkout)?;
        if session.status() != OrderStatus::Confirmed {
            return Err(ApiError::new(
                ErrorCode::InvalidState,
                "Order has not been confirmed yet",
            ));
        }
        let receipt = session
            .receipt()
            .cloned()
            .ok_or_else(|| ApiError::internal("Confirmed order has no receipt"))?;
        *slot = None;
        Ok(receipt)
    })?;

    cart.with_cart_mut(|c| c.clear());
    info!(order_id = %receipt.order_id, "Checkout complete");
    Ok(receipt)
}
