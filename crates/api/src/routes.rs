pub mod availability;
pub mod booking;
pub mod cart;
pub mod checkout;
pub mod court;
pub mod health;
