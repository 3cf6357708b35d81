//! # Courtside Core
//!
//! Domain logic for court bookings: time-of-day arithmetic, availability of
//! bookable units, the session cart and the checkout state machine. Storage,
//! payment and identity are reached only through the traits in
//! [`collaborators`].

pub mod availability;
pub mod cart;
pub mod checkout;
pub mod collaborators;
pub mod errors;
pub mod mock;
pub mod models;
pub mod time_range;

pub use errors::{BookingError, BookingResult};
pub use time_range::{TimeOfDay, TimeRange};
