//! # Checkout State
//!
//! The checkout wizard: one session per order, walked step by step.
//!
//! ## Wizard Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Wizard                                      │
//! │                                                                         │
//! │  ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌───────┐ │
//! │  │  Review  │──►│ Payment  │──►│ Add Tip  │──►│  Split   │──►│Confirm│ │
//! │  │  Order   │◄──│  Method  │◄──│          │◄──│   Bill   │◄──│       │ │
//! │  └──────────┘   └──────────┘   └──────────┘   └──────────┘   └───────┘ │
//! │       │                                                          │      │
//! │   back() = Cancelled                                   place_order()    │
//! │                                                                  │      │
//! │  Status:   Draft ─────────────────────────────► Processing ──► Confirmed│
//! │                                                                         │
//! │  While Processing, back() and advance() are rejected.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Split Synchronisation
//! The split ledger holds its own copy of the order total. Whenever the tip
//! or the items change while the bill is split, the session pushes the new
//! total into the ledger, which rebalances everyone equally.

use std::sync::{Arc, Mutex, PoisonError};

use bistro_core::totals::tip_amount;
use bistro_core::{
    CoreError, CoreResult, LineItem, Money, OrderTotals, PaymentMethod, Rate, SplitLedger,
    SplitParticipant, TipPolicy, MIN_SPLIT_PARTICIPANTS,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Steps & Status
// =============================================================================

/// One page of the checkout wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutStep {
    ReviewOrder,
    PaymentMethod,
    AddTip,
    SplitBill,
    Confirmation,
}

impl CheckoutStep {
    /// Every step, in wizard order.
    pub const ALL: [CheckoutStep; 5] = [
        CheckoutStep::ReviewOrder,
        CheckoutStep::PaymentMethod,
        CheckoutStep::AddTip,
        CheckoutStep::SplitBill,
        CheckoutStep::Confirmation,
    ];

    /// Heading shown above the step.
    pub fn title(&self) -> &'static str {
        match self {
            CheckoutStep::ReviewOrder => "Review Order",
            CheckoutStep::PaymentMethod => "Payment Method",
            CheckoutStep::AddTip => "Add Tip",
            CheckoutStep::SplitBill => "Split Bill",
            CheckoutStep::Confirmation => "Confirmation",
        }
    }

    /// Zero-based position (drives the progress bar).
    pub fn index(&self) -> usize {
        match self {
            CheckoutStep::ReviewOrder => 0,
            CheckoutStep::PaymentMethod => 1,
            CheckoutStep::AddTip => 2,
            CheckoutStep::SplitBill => 3,
            CheckoutStep::Confirmation => 4,
        }
    }

    /// The following step, or `None` on Confirmation.
    pub fn next(&self) -> Option<CheckoutStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// The preceding step, or `None` on ReviewOrder.
    pub fn prev(&self) -> Option<CheckoutStep> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }
}

/// Where the order is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderStatus {
    /// Being edited in the wizard.
    #[default]
    Draft,
    /// Placed, payment in flight. The wizard is frozen.
    Processing,
    /// Payment accepted.
    Confirmed,
}

impl OrderStatus {
    fn label(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "draft",
            OrderStatus::Processing => "processing",
            OrderStatus::Confirmed => "confirmed",
        }
    }
}

/// Result of moving backwards through the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Now on this step.
    Moved(CheckoutStep),
    /// Backed out of the first step; the caller closes the wizard.
    Cancelled,
}

// =============================================================================
// Receipt
// =============================================================================

/// Snapshot of a placed order.
///
/// Taken at `place_order` so later edits cannot change what was charged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_id: String,
    pub items: Vec<LineItem>,
    pub totals: OrderTotals,
    pub payment_method: PaymentMethod,
    /// Per-person shares, or `None` for a single payer
    pub split: Option<Vec<SplitParticipant>>,
    pub placed_at: DateTime<Utc>,
}

// =============================================================================
// Session
// =============================================================================

/// A checkout in progress.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    items: Vec<LineItem>,
    tax_rate: Rate,
    tip_policy: TipPolicy,
    payment_method: PaymentMethod,
    ledger: SplitLedger,
    step: CheckoutStep,
    status: OrderStatus,
    receipt: Option<OrderReceipt>,
}

impl CheckoutSession {
    /// Starts a checkout over a snapshot of the cart.
    ///
    /// Fails if the items, rate or tip could not produce totals.
    pub fn new(items: Vec<LineItem>, tax_rate: Rate, tip_policy: TipPolicy) -> CoreResult<Self> {
        OrderTotals::compute(&items, tax_rate, &tip_policy)?;

        Ok(CheckoutSession {
            items,
            tax_rate,
            tip_policy,
            payment_method: PaymentMethod::default(),
            ledger: SplitLedger::new(),
            step: CheckoutStep::ReviewOrder,
            status: OrderStatus::Draft,
            receipt: None,
        })
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn tax_rate(&self) -> Rate {
        self.tax_rate
    }

    pub fn tip_policy(&self) -> TipPolicy {
        self.tip_policy
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn ledger(&self) -> &SplitLedger {
        &self.ledger
    }

    /// The receipt, once the order has been placed.
    pub fn receipt(&self) -> Option<&OrderReceipt> {
        self.receipt.as_ref()
    }

    /// Current subtotal, tax, tip and total.
    pub fn totals(&self) -> CoreResult<OrderTotals> {
        OrderTotals::compute(&self.items, self.tax_rate, &self.tip_policy)
    }

    /// What a preset percentage would tip on the current subtotal.
    pub fn tip_preview(&self, percent: i64) -> CoreResult<Money> {
        let subtotal = self.totals()?.subtotal;
        tip_amount(subtotal, &TipPolicy::try_percent(percent)?)
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Moves to the next step.
    ///
    /// Confirmation is the last step; from there the order is placed with
    /// [`place_order`](Self::place_order) instead.
    pub fn advance(&mut self) -> CoreResult<CheckoutStep> {
        self.ensure_draft("change steps")?;
        let next = self.step.next().ok_or(CoreError::InvariantViolation {
            operation: "advance",
            state: "on the final step",
        })?;
        self.step = next;
        Ok(next)
    }

    /// Moves to the previous step, or cancels from the first one.
    pub fn back(&mut self) -> CoreResult<Navigation> {
        self.ensure_draft("change steps")?;
        match self.step.prev() {
            Some(prev) => {
                self.step = prev;
                Ok(Navigation::Moved(prev))
            }
            None => Ok(Navigation::Cancelled),
        }
    }

    // -------------------------------------------------------------------------
    // Payment & tip
    // -------------------------------------------------------------------------

    pub fn set_payment_method(&mut self, method: PaymentMethod) -> CoreResult<()> {
        self.ensure_draft("change the payment method")?;
        self.payment_method = method;
        Ok(())
    }

    /// Picks one of the percentage buttons.
    pub fn select_tip_preset(&mut self, percent: i64) -> CoreResult<OrderTotals> {
        self.apply_tip(TipPolicy::try_percent(percent)?)
    }

    /// Applies the text of the custom tip field.
    ///
    /// An empty field means no tip. A malformed or negative amount is
    /// rejected and the previous tip stays in place.
    pub fn set_custom_tip(&mut self, input: &str) -> CoreResult<OrderTotals> {
        let policy = if input.trim().is_empty() {
            TipPolicy::none()
        } else {
            TipPolicy::parse_custom(input)?
        };
        self.apply_tip(policy)
    }

    fn apply_tip(&mut self, policy: TipPolicy) -> CoreResult<OrderTotals> {
        self.ensure_draft("change the tip")?;
        let totals = OrderTotals::compute(&self.items, self.tax_rate, &policy)?;
        self.sync_split(totals.total)?;
        self.tip_policy = policy;
        Ok(totals)
    }

    /// Replaces the order's items (the cart changed mid-checkout).
    pub fn replace_items(&mut self, items: Vec<LineItem>) -> CoreResult<OrderTotals> {
        self.ensure_draft("change the items")?;
        let totals = OrderTotals::compute(&items, self.tax_rate, &self.tip_policy)?;
        self.sync_split(totals.total)?;
        self.items = items;
        Ok(totals)
    }

    // -------------------------------------------------------------------------
    // Split
    // -------------------------------------------------------------------------

    /// Splits the current total between two people.
    ///
    /// Does nothing if the bill is already split.
    pub fn enable_split(&mut self) -> CoreResult<()> {
        self.ensure_draft("split the bill")?;
        if self.ledger.is_split() {
            return Ok(());
        }
        let total = self.totals()?.total;
        self.ledger.enable_split(total, MIN_SPLIT_PARTICIPANTS)
    }

    /// Back to a single payer.
    pub fn disable_split(&mut self) -> CoreResult<()> {
        self.ensure_draft("stop splitting the bill")?;
        self.ledger.disable_split();
        Ok(())
    }

    /// Mutable access to the ledger for per-person edits.
    pub fn ledger_mut(&mut self) -> CoreResult<&mut SplitLedger> {
        self.ensure_draft("edit the split")?;
        Ok(&mut self.ledger)
    }

    fn sync_split(&mut self, total: Money) -> CoreResult<()> {
        if self.ledger.is_split() {
            self.ledger.update_total(total)?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Order lifecycle
    // -------------------------------------------------------------------------

    /// Places the order from the Confirmation step and freezes the wizard.
    pub fn place_order(
        &mut self,
        order_id: String,
        placed_at: DateTime<Utc>,
    ) -> CoreResult<OrderReceipt> {
        self.ensure_draft("place the order")?;
        if !self.step.is_last() {
            return Err(CoreError::InvariantViolation {
                operation: "place the order",
                state: "not on the confirmation step",
            });
        }

        let receipt = OrderReceipt {
            order_id,
            items: self.items.clone(),
            totals: self.totals()?,
            payment_method: self.payment_method,
            split: self
                .ledger
                .is_split()
                .then(|| self.ledger.participants().to_vec()),
            placed_at,
        };

        self.status = OrderStatus::Processing;
        self.receipt = Some(receipt.clone());
        Ok(receipt)
    }

    /// Marks a processing order as confirmed.
    pub fn confirm(&mut self) -> CoreResult<&OrderReceipt> {
        if self.status != OrderStatus::Processing {
            return Err(CoreError::InvariantViolation {
                operation: "confirm the order",
                state: self.status.label(),
            });
        }
        let receipt = self.receipt.as_ref().ok_or(CoreError::InvariantViolation {
            operation: "confirm the order",
            state: "missing its receipt",
        })?;
        self.status = OrderStatus::Confirmed;
        Ok(receipt)
    }

    fn ensure_draft(&self, operation: &'static str) -> CoreResult<()> {
        match self.status {
            OrderStatus::Draft => Ok(()),
            other => Err(CoreError::InvariantViolation {
                operation,
                state: other.label(),
            }),
        }
    }
}

// =============================================================================
// Shared State
// =============================================================================

/// Shared checkout state. `None` when no checkout is open.
#[derive(Debug, Clone, Default)]
pub struct CheckoutState {
    session: Arc<Mutex<Option<CheckoutSession>>>,
}

impl CheckoutState {
    pub fn new() -> Self {
        CheckoutState::default()
    }

    /// Executes a function with read access to the session slot.
    pub fn with_checkout<F, R>(&self, f: F) -> R
    where
        F: FnOnce(Option<&CheckoutSession>) -> R,
    {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(session.as_ref())
    }

    /// Executes a function with write access to the session slot.
    pub fn with_checkout_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Option<CheckoutSession>) -> R,
    {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_items() -> Vec<LineItem> {
        vec![
            LineItem::new("1", "Margherita Pizza", Money::from_cents(1299), 1),
            LineItem::new("2", "Caesar Salad", Money::from_cents(899), 1)
                .with_customizations(["No croutons"]),
            LineItem::new("3", "Garlic Bread", Money::from_cents(499), 2),
        ]
    }

    fn session() -> CheckoutSession {
        CheckoutSession::new(demo_items(), Rate::from_bps(800), TipPolicy::percent(15)).unwrap()
    }

    fn to_confirmation(s: &mut CheckoutSession) {
        while !s.step().is_last() {
            s.advance().unwrap();
        }
    }

    #[test]
    fn test_step_order() {
        assert_eq!(CheckoutStep::ReviewOrder.next(), Some(CheckoutStep::PaymentMethod));
        assert_eq!(CheckoutStep::Confirmation.next(), None);
        assert_eq!(CheckoutStep::ReviewOrder.prev(), None);
        assert_eq!(CheckoutStep::SplitBill.prev(), Some(CheckoutStep::AddTip));
        for (i, step) in CheckoutStep::ALL.iter().enumerate() {
            assert_eq!(step.index(), i);
        }
    }

    #[test]
    fn test_initial_totals() {
        let s = session();
        let totals = s.totals().unwrap();
        assert_eq!(totals.subtotal, Money::from_cents(3196));
        assert_eq!(totals.tax, Money::from_cents(256));
        assert_eq!(totals.tip, Money::from_cents(479));
        assert_eq!(totals.total, Money::from_cents(3931));
        assert_eq!(s.status(), OrderStatus::Draft);
        assert_eq!(s.payment_method(), PaymentMethod::CreditCard);
    }

    #[test]
    fn test_back_from_first_step_cancels() {
        let mut s = session();
        assert_eq!(s.back().unwrap(), Navigation::Cancelled);

        s.advance().unwrap();
        assert_eq!(s.back().unwrap(), Navigation::Moved(CheckoutStep::ReviewOrder));
    }

    #[test]
    fn test_cannot_advance_past_confirmation() {
        let mut s = session();
        to_confirmation(&mut s);
        assert!(matches!(
            s.advance(),
            Err(CoreError::InvariantViolation { .. })
        ));
    }

    #[test]
    fn test_tip_presets_and_custom() {
        let mut s = session();
        assert_eq!(s.tip_preview(20).unwrap(), Money::from_cents(639));

        let totals = s.select_tip_preset(20).unwrap();
        assert_eq!(totals.tip, Money::from_cents(639));

        let totals = s.set_custom_tip("6.00").unwrap();
        assert_eq!(totals.tip, Money::from_cents(600));
        assert_eq!(s.tip_policy(), TipPolicy::FixedAmount(Money::from_cents(600)));

        let totals = s.set_custom_tip("  ").unwrap();
        assert!(totals.tip.is_zero());
    }

    #[test]
    fn test_bad_custom_tip_keeps_previous() {
        let mut s = session();
        assert!(matches!(
            s.set_custom_tip("-5"),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(s.set_custom_tip("abc").is_err());
        assert_eq!(s.tip_policy(), TipPolicy::percent(15));
    }

    #[test]
    fn test_oversized_tip_percent_rejected() {
        let mut s = session();
        assert!(matches!(
            s.select_tip_preset(i64::MAX),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            s.tip_preview(i64::MAX),
            Err(CoreError::InvalidInput(_))
        ));
        assert_eq!(s.tip_policy(), TipPolicy::percent(15));
    }

    #[test]
    fn test_split_follows_tip_changes() {
        let mut s = session();
        s.enable_split().unwrap();
        let amounts: Vec<_> = s.ledger().participants().iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![Money::from_cents(1966), Money::from_cents(1965)]);

        // enabling again leaves the ledger alone
        s.ledger_mut().unwrap().add_participant().unwrap();
        s.enable_split().unwrap();
        assert_eq!(s.ledger().len(), 3);

        let totals = s.select_tip_preset(10).unwrap();
        assert_eq!(s.ledger().total(), Some(totals.total));
        assert!(s.ledger().remainder().is_zero());

        s.disable_split().unwrap();
        assert!(!s.ledger().is_split());
    }

    #[test]
    fn test_replace_items_resyncs_split() {
        let mut s = session();
        s.enable_split().unwrap();

        let totals = s
            .replace_items(vec![LineItem::new("1", "Margherita Pizza", Money::from_cents(1299), 2)])
            .unwrap();
        assert_eq!(s.items().len(), 1);
        assert_eq!(s.ledger().total(), Some(totals.total));

        let dup = vec![
            LineItem::new("1", "A", Money::from_cents(100), 1),
            LineItem::new("1", "B", Money::from_cents(100), 1),
        ];
        assert!(s.replace_items(dup).is_err());
        assert_eq!(s.items().len(), 1);
    }

    #[test]
    fn test_place_order_only_from_confirmation() {
        let mut s = session();
        let now = Utc::now();
        assert!(s.place_order("o-1".to_string(), now).is_err());

        s.advance().unwrap();
        s.set_payment_method(PaymentMethod::PayPal).unwrap();
        s.advance().unwrap();
        s.advance().unwrap();
        s.enable_split().unwrap();
        s.advance().unwrap();

        let receipt = s.place_order("o-1".to_string(), now).unwrap();
        assert_eq!(receipt.totals.total, Money::from_cents(3931));
        assert_eq!(receipt.payment_method, PaymentMethod::PayPal);
        assert_eq!(receipt.split.as_ref().map(Vec::len), Some(2));
        assert_eq!(s.status(), OrderStatus::Processing);
    }

    #[test]
    fn test_processing_freezes_the_wizard() {
        let mut s = session();
        to_confirmation(&mut s);
        s.place_order("o-2".to_string(), Utc::now()).unwrap();

        assert!(s.back().is_err());
        assert!(s.advance().is_err());
        assert!(s.select_tip_preset(20).is_err());
        assert!(s.ledger_mut().is_err());
        assert!(s.place_order("o-3".to_string(), Utc::now()).is_err());

        let receipt = s.confirm().unwrap();
        assert_eq!(receipt.order_id, "o-2");
        assert!(receipt.split.is_none());
        assert_eq!(s.status(), OrderStatus::Confirmed);
        assert!(s.confirm().is_err());
    }

    #[test]
    fn test_checkout_state_slot() {
        let state = CheckoutState::new();
        assert!(state.with_checkout(|s| s.is_none()));

        state.with_checkout_mut(|slot| *slot = Some(session()));
        assert_eq!(
            state.clone().with_checkout(|s| s.map(|s| s.step())),
            Some(CheckoutStep::ReviewOrder)
        );
    }
}
