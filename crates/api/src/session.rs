//! Per-user cart and checkout.
//!
//! Each authenticated user gets one [`Session`], created on first use and
//! kept for the life of the process. A session is locked for the whole of a
//! request, so a second checkout from another tab waits and then sees the
//! first one in progress.

use std::{collections::HashMap, sync::Arc};

use courtside_core::{cart::BookingCart, checkout::CheckoutCoordinator};
use tokio::sync::Mutex;

pub struct Session {
    pub cart: BookingCart,
    pub checkout: CheckoutCoordinator,
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session of `user_id`, building it with `create` if this is
    /// the user's first request.
    pub async fn get_or_create(
        &self,
        user_id: &str,
        create: impl FnOnce() -> Session,
    ) -> Arc<Mutex<Session>> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(create())))
            .clone()
    }
}
