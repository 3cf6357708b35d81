//! # Collaborators
//!
//! Interfaces to the services the booking core depends on but does not
//! implement: storage, payment, identity, and the durable store that carries
//! an in-flight checkout across a payment redirect or a restart.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    checkout::PendingCheckout,
    models::{
        booking::{BookedRange, CreateBookingRequest, CreateBookingResponse},
        payment::{CreateOrderRequest, OrderConfirmation, PaymentOrder},
        slot::SlotTemplate,
    },
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The write lost a race, e.g. the slot was booked by someone else.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Temporarily unavailable: {0}")]
    Transient(String),

    #[error("Rejected: {0}")]
    Rejected(String),
}

impl CollaboratorError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, CollaboratorError::Transient(_))
    }
}

/// The signed-in user and the credential attached to outgoing requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub access_token: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_identity(&self) -> Result<Identity, CollaboratorError>;
}

#[async_trait]
impl IdentityProvider for Identity {
    async fn current_identity(&self) -> Result<Identity, CollaboratorError> {
        Ok(self.clone())
    }
}

#[async_trait]
pub trait BookingStorage: Send + Sync {
    async fn list_slot_templates(
        &self,
        court_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<SlotTemplate>, CollaboratorError>;

    async fn list_booked_ranges(
        &self,
        court_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<BookedRange>, CollaboratorError>;

    /// Creates one booking. Must fail with [`CollaboratorError::Conflict`]
    /// when the range overlaps an existing booking.
    async fn create_booking(
        &self,
        request: &CreateBookingRequest,
        identity: &Identity,
    ) -> Result<CreateBookingResponse, CollaboratorError>;
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(
        &self,
        request: &CreateOrderRequest,
        identity: &Identity,
    ) -> Result<PaymentOrder, CollaboratorError>;

    async fn confirm_order(
        &self,
        order_id: &str,
        identity: &Identity,
    ) -> Result<OrderConfirmation, CollaboratorError>;
}

/// Durable storage for the one in-flight checkout of each user.
#[async_trait]
pub trait CheckoutStore: Send + Sync {
    async fn save(&self, pending: &PendingCheckout) -> Result<(), CollaboratorError>;

    async fn load(&self, user_id: &str) -> Result<Option<PendingCheckout>, CollaboratorError>;

    async fn clear(&self, user_id: &str) -> Result<(), CollaboratorError>;
}

/// Process-local [`CheckoutStore`].
///
/// Entries are kept as JSON, the same form a durable store persists.
#[derive(Debug, Default)]
pub struct MemoryCheckoutStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCheckoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, CollaboratorError> {
        self.entries
            .lock()
            .map_err(|_| CollaboratorError::Rejected("checkout store lock poisoned".to_string()))
    }
}

#[async_trait]
impl CheckoutStore for MemoryCheckoutStore {
    async fn save(&self, pending: &PendingCheckout) -> Result<(), CollaboratorError> {
        let payload = serde_json::to_string(pending)
            .map_err(|e| CollaboratorError::Rejected(format!("Cannot encode checkout: {e}")))?;
        self.entries()?.insert(pending.user_id.clone(), payload);
        Ok(())
    }

    async fn load(&self, user_id: &str) -> Result<Option<PendingCheckout>, CollaboratorError> {
        let entries = self.entries()?;
        entries
            .get(user_id)
            .map(|payload| {
                serde_json::from_str(payload)
                    .map_err(|e| CollaboratorError::Rejected(format!("Cannot decode checkout: {e}")))
            })
            .transpose()
    }

    async fn clear(&self, user_id: &str) -> Result<(), CollaboratorError> {
        self.entries()?.remove(user_id);
        Ok(())
    }
}
