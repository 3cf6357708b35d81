pub mod booking;
pub mod court;
pub mod pending_checkout;
pub mod slot_template;
