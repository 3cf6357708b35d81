use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;
use uuid::Uuid;

use crate::{
    collaborators::{
        BookingStorage, CollaboratorError, Identity, IdentityProvider, PaymentGateway,
    },
    models::{
        booking::{BookedRange, CreateBookingRequest, CreateBookingResponse},
        payment::{CreateOrderRequest, OrderConfirmation, PaymentOrder},
        slot::SlotTemplate,
    },
};

// Mock collaborators for testing
mock! {
    pub Storage {}

    #[async_trait]
    impl BookingStorage for Storage {
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

        async fn create_booking(
            &self,
            request: &CreateBookingRequest,
            identity: &Identity,
        ) -> Result<CreateBookingResponse, CollaboratorError>;
    }
}

mock! {
    pub Payment {}

    #[async_trait]
    impl PaymentGateway for Payment {
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
}

mock! {
    pub Session {}

    #[async_trait]
    impl IdentityProvider for Session {
        async fn current_identity(&self) -> Result<Identity, CollaboratorError>;
    }
}
