//! # Checkout
//!
//! Turns a cart into committed bookings.
//!
//! ```text
//! Idle --submit--> AwaitingPayment --confirm_payment--> Committing --> Done | Failed
//! Idle --submit (no payment gateway)--> Committing --> Done | Failed
//! ```
//!
//! Any state but `Done` and `Failed` can be cancelled. A checkout waiting for
//! payment is written to the [`CheckoutStore`] so a later request, possibly
//! after a restart, can resume it with `confirm_payment`. That entry is
//! removed on success and on every terminal failure; it survives retryable
//! failures so the caller can try again.
//!
//! Each cart item is a separate `create_booking` request. When one of them
//! fails the bookings already created stay in place.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    cart::{BookingCart, CartItem},
    collaborators::{
        BookingStorage, CheckoutStore, CollaboratorError, Identity, IdentityProvider,
        PaymentGateway,
    },
    errors::{BookingError, BookingResult},
    models::payment::{CreateOrderRequest, PaymentMode},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStatus {
    Pending,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    SlotNoLongerAvailable,
    PaymentDeclined,
    Network,
    Rejected,
    Timeout,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutFailure {
    pub reason: FailureReason,
    pub message: String,
    pub retryable: bool,
}

impl CheckoutFailure {
    pub fn new(reason: FailureReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
            retryable: false,
        }
    }

    fn from_collaborator(err: &CollaboratorError) -> Self {
        match err {
            CollaboratorError::Conflict(message) => Self {
                reason: FailureReason::SlotNoLongerAvailable,
                message: message.clone(),
                retryable: false,
            },
            CollaboratorError::Transient(message) => Self {
                reason: FailureReason::Network,
                message: message.clone(),
                retryable: true,
            },
            CollaboratorError::Rejected(message) => Self {
                reason: FailureReason::Rejected,
                message: message.clone(),
                retryable: false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutResult {
    pub status: CheckoutStatus,
    pub booking_ids: Vec<Uuid>,
    pub error: Option<CheckoutFailure>,
    pub payment_redirect: Option<String>,
}

impl CheckoutResult {
    fn pending(payment_redirect: Option<String>) -> Self {
        Self {
            status: CheckoutStatus::Pending,
            booking_ids: Vec::new(),
            error: None,
            payment_redirect,
        }
    }

    fn success(booking_ids: Vec<Uuid>) -> Self {
        Self {
            status: CheckoutStatus::Success,
            booking_ids,
            error: None,
            payment_redirect: None,
        }
    }

    fn failed(failure: CheckoutFailure, booking_ids: Vec<Uuid>) -> Self {
        Self {
            status: CheckoutStatus::Failed,
            booking_ids,
            error: Some(failure),
            payment_redirect: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedItem {
    pub item_id: Uuid,
    pub booking_id: Uuid,
}

/// The durable record of a checkout waiting on the payment provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingCheckout {
    pub order_id: String,
    pub user_id: String,
    pub items: Vec<CartItem>,
    pub amount: Decimal,
    #[serde(default)]
    pub payment_confirmed: bool,
    #[serde(default)]
    pub committed: Vec<CommittedItem>,
    pub created_at: DateTime<Utc>,
}

impl PendingCheckout {
    fn booking_ids(&self) -> Vec<Uuid> {
        self.committed.iter().map(|c| c.booking_id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheckoutState {
    Idle,
    AwaitingPayment(PendingCheckout),
    Committing,
    Done { booking_ids: Vec<Uuid> },
    Failed(CheckoutFailure),
}

impl CheckoutState {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, CheckoutState::AwaitingPayment(_) | CheckoutState::Committing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutState::Done { .. } | CheckoutState::Failed(_))
    }
}

#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    pub payment_mode: PaymentMode,
    /// How long a checkout may wait for payment before confirming fails.
    pub payment_timeout: Duration,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            payment_mode: PaymentMode::default(),
            payment_timeout: Duration::minutes(30),
        }
    }
}

struct CommitOutcome {
    committed: Vec<CommittedItem>,
    failure: Option<CheckoutFailure>,
}

pub struct CheckoutCoordinator {
    storage: Arc<dyn BookingStorage>,
    payment: Option<Arc<dyn PaymentGateway>>,
    store: Arc<dyn CheckoutStore>,
    config: CheckoutConfig,
    state: CheckoutState,
}

impl CheckoutCoordinator {
    pub fn new(
        storage: Arc<dyn BookingStorage>,
        store: Arc<dyn CheckoutStore>,
        config: CheckoutConfig,
    ) -> Self {
        Self {
            storage,
            payment: None,
            store,
            config,
            state: CheckoutState::Idle,
        }
    }

    /// Requires payment before bookings are created.
    pub fn with_payment_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.payment = Some(gateway);
        self
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Starts a checkout for everything in `cart`.
    ///
    /// With a payment gateway this creates an order and returns a pending
    /// result carrying the provider's redirect; otherwise bookings are created
    /// right away. Collaborator failures come back as a failed result, not as
    /// an error.
    ///
    /// # Errors
    ///
    /// * `BookingError::AlreadyInProgress` - a checkout is awaiting payment or
    ///   committing, here or in the durable store
    /// * `BookingError::Validation` - the cart is empty
    pub async fn submit(
        &mut self,
        cart: &mut BookingCart,
        identity: &dyn IdentityProvider,
    ) -> BookingResult<CheckoutResult> {
        if self.state.is_in_progress() {
            return Err(BookingError::AlreadyInProgress);
        }
        if cart.is_empty() {
            return Err(BookingError::Validation(
                "Cannot check out an empty cart".to_string(),
            ));
        }

        let identity = match identity.current_identity().await {
            Ok(identity) => identity,
            Err(err) => return Ok(self.fail(CheckoutFailure::from_collaborator(&err), Vec::new())),
        };

        match self.store.load(&identity.user_id).await {
            Ok(Some(pending)) => {
                warn!(
                    "User {} already has order {} awaiting payment",
                    identity.user_id, pending.order_id
                );
                self.state = CheckoutState::AwaitingPayment(pending);
                return Err(BookingError::AlreadyInProgress);
            }
            Ok(None) => {}
            Err(err) => return Ok(self.fail(CheckoutFailure::from_collaborator(&err), Vec::new())),
        }

        let Some(gateway) = self.payment.clone() else {
            return Ok(self.commit_cart(cart, &identity).await);
        };

        let request = CreateOrderRequest {
            amount: cart.total(),
            items: cart.items().iter().map(Into::into).collect(),
            payment_mode: self.config.payment_mode,
        };
        let order = match gateway.create_order(&request, &identity).await {
            Ok(order) => order,
            Err(err) => return Ok(self.fail(CheckoutFailure::from_collaborator(&err), Vec::new())),
        };

        let pending = PendingCheckout {
            order_id: order.order_id,
            user_id: identity.user_id.clone(),
            items: cart.items().to_vec(),
            amount: request.amount,
            payment_confirmed: false,
            committed: Vec::new(),
            created_at: Utc::now(),
        };
        if let Err(err) = self.store.save(&pending).await {
            return Ok(self.fail(CheckoutFailure::from_collaborator(&err), Vec::new()));
        }

        info!(
            "Order {} for user {} awaiting payment of {}",
            pending.order_id, pending.user_id, pending.amount
        );
        self.state = CheckoutState::AwaitingPayment(pending);
        Ok(CheckoutResult::pending(order.redirect_url))
    }

    /// Resumes a checkout once the payment provider has redirected back.
    ///
    /// The pending order comes from this coordinator or, after a restart, from
    /// the durable store. A declined payment fails the checkout but leaves the
    /// cart untouched so the user can submit again.
    ///
    /// # Errors
    ///
    /// * `BookingError::AlreadyInProgress` - bookings are being committed
    /// * `BookingError::InvalidState` - nothing is awaiting payment
    /// * `BookingError::Validation` - `transaction_id` is not the pending order
    pub async fn confirm_payment(
        &mut self,
        transaction_id: &str,
        cart: &mut BookingCart,
        identity: &dyn IdentityProvider,
    ) -> BookingResult<CheckoutResult> {
        if matches!(self.state, CheckoutState::Committing) {
            return Err(BookingError::AlreadyInProgress);
        }

        let identity = match identity.current_identity().await {
            Ok(identity) => identity,
            Err(err) => return Ok(self.fail(CheckoutFailure::from_collaborator(&err), Vec::new())),
        };

        let mut pending = match std::mem::replace(&mut self.state, CheckoutState::Idle) {
            CheckoutState::AwaitingPayment(pending) => pending,
            previous => match self.store.load(&identity.user_id).await {
                Ok(Some(pending)) => pending,
                Ok(None) => {
                    self.state = previous;
                    return Err(BookingError::InvalidState(
                        "No checkout is awaiting payment".to_string(),
                    ));
                }
                Err(err) => {
                    return Ok(self.fail(CheckoutFailure::from_collaborator(&err), Vec::new()));
                }
            },
        };

        if pending.order_id != transaction_id {
            let message = format!(
                "Transaction {transaction_id} does not match pending order {}",
                pending.order_id
            );
            self.state = CheckoutState::AwaitingPayment(pending);
            return Err(BookingError::Validation(message));
        }

        if !pending.payment_confirmed {
            if Utc::now() - pending.created_at > self.config.payment_timeout {
                self.clear_store(&pending.user_id).await;
                let failure = CheckoutFailure::new(
                    FailureReason::Timeout,
                    format!("Order {} was not paid in time", pending.order_id),
                );
                return Ok(self.fail(failure, Vec::new()));
            }

            let Some(gateway) = self.payment.clone() else {
                self.state = CheckoutState::AwaitingPayment(pending);
                return Err(BookingError::InvalidState(
                    "No payment gateway is configured".to_string(),
                ));
            };

            match gateway.confirm_order(transaction_id, &identity).await {
                Ok(confirmation) if confirmation.success => {
                    pending.payment_confirmed = true;
                    if let Err(err) = self.store.save(&pending).await {
                        warn!("Could not record payment of order {}: {}", pending.order_id, err);
                    }
                }
                Ok(confirmation) => {
                    self.clear_store(&pending.user_id).await;
                    let message = confirmation
                        .reason
                        .unwrap_or_else(|| "Payment was declined".to_string());
                    return Ok(self.fail(
                        CheckoutFailure::new(FailureReason::PaymentDeclined, message),
                        Vec::new(),
                    ));
                }
                Err(err) => {
                    if !err.is_retryable() {
                        self.clear_store(&pending.user_id).await;
                    }
                    return Ok(self.fail(CheckoutFailure::from_collaborator(&err), Vec::new()));
                }
            }
        }

        self.state = CheckoutState::Committing;
        let outcome = self
            .commit(&identity, &pending.items, std::mem::take(&mut pending.committed))
            .await;
        pending.committed = outcome.committed;
        let booking_ids = pending.booking_ids();

        match outcome.failure {
            None => {
                self.clear_store(&pending.user_id).await;
                // Only what was paid for; items added since the order stay.
                for item in &pending.items {
                    cart.remove(item.id);
                }
                info!(
                    "Order {} committed as {} bookings",
                    pending.order_id,
                    booking_ids.len()
                );
                self.state = CheckoutState::Done {
                    booking_ids: booking_ids.clone(),
                };
                Ok(CheckoutResult::success(booking_ids))
            }
            Some(failure) if failure.retryable => {
                if let Err(err) = self.store.save(&pending).await {
                    warn!("Could not record progress of order {}: {}", pending.order_id, err);
                }
                Ok(self.fail(failure, booking_ids))
            }
            Some(failure) => {
                self.clear_store(&pending.user_id).await;
                for committed in &pending.committed {
                    cart.remove(committed.item_id);
                }
                Ok(self.fail(failure, booking_ids))
            }
        }
    }

    /// Abandons the current checkout and drops its durable record.
    ///
    /// A checkout that failed with a retryable error can still be resumed,
    /// so it can also be cancelled, as can one only known from the store.
    ///
    /// # Errors
    ///
    /// * `BookingError::InvalidState` - the checkout already finished and
    ///   nothing is left to resume
    pub async fn cancel(&mut self, identity: &dyn IdentityProvider) -> BookingResult<CheckoutResult> {
        let identity = match identity.current_identity().await {
            Ok(identity) => Some(identity),
            Err(err) => {
                warn!("Cancelling checkout without identity: {}", err);
                None
            }
        };

        let resumable = match &self.state {
            CheckoutState::Done { .. } => false,
            CheckoutState::Failed(failure) => failure.retryable,
            _ => true,
        };
        let stored = match &identity {
            Some(identity) => matches!(self.store.load(&identity.user_id).await, Ok(Some(_))),
            None => false,
        };
        if !resumable && !stored {
            return Err(BookingError::InvalidState(
                "Checkout has already finished".to_string(),
            ));
        }

        if let Some(identity) = &identity {
            self.clear_store(&identity.user_id).await;
        }

        Ok(self.fail(
            CheckoutFailure::new(FailureReason::Cancelled, "Checkout was cancelled"),
            Vec::new(),
        ))
    }

    async fn commit_cart(&mut self, cart: &mut BookingCart, identity: &Identity) -> CheckoutResult {
        self.state = CheckoutState::Committing;
        let outcome = self.commit(identity, cart.items(), Vec::new()).await;
        let booking_ids: Vec<Uuid> = outcome.committed.iter().map(|c| c.booking_id).collect();

        match outcome.failure {
            None => {
                cart.clear();
                info!(
                    "Cart of user {} committed as {} bookings",
                    identity.user_id,
                    booking_ids.len()
                );
                self.state = CheckoutState::Done {
                    booking_ids: booking_ids.clone(),
                };
                CheckoutResult::success(booking_ids)
            }
            Some(failure) => {
                for committed in &outcome.committed {
                    cart.remove(committed.item_id);
                }
                self.fail(failure, booking_ids)
            }
        }
    }

    /// Creates a booking per item, skipping items in `committed`, and stops
    /// at the first failure.
    async fn commit(
        &self,
        identity: &Identity,
        items: &[CartItem],
        mut committed: Vec<CommittedItem>,
    ) -> CommitOutcome {
        for item in items {
            if committed.iter().any(|c| c.item_id == item.id) {
                continue;
            }

            let request = item.booking_request(&identity.user_id);
            match self.storage.create_booking(&request, identity).await {
                Ok(response) => committed.push(CommittedItem {
                    item_id: item.id,
                    booking_id: response.booking_id,
                }),
                Err(err) => {
                    warn!(
                        "Booking {} on {} for court {} failed: {}",
                        item.range, item.date, item.court_id, err
                    );
                    return CommitOutcome {
                        committed,
                        failure: Some(CheckoutFailure::from_collaborator(&err)),
                    };
                }
            }
        }

        CommitOutcome {
            committed,
            failure: None,
        }
    }

    async fn clear_store(&self, user_id: &str) {
        if let Err(err) = self.store.clear(user_id).await {
            warn!("Could not clear pending checkout of user {}: {}", user_id, err);
        }
    }

    fn fail(&mut self, failure: CheckoutFailure, booking_ids: Vec<Uuid>) -> CheckoutResult {
        warn!(
            "Checkout failed ({:?}, retryable: {}): {}",
            failure.reason, failure.retryable, failure.message
        );
        self.state = CheckoutState::Failed(failure.clone());
        CheckoutResult::failed(failure, booking_ids)
    }
}
