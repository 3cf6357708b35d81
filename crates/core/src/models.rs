pub mod booking;
pub mod court;
pub mod payment;
pub mod slot;
