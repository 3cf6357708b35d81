use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/checkout",
            get(handlers::checkout::get_status).post(handlers::checkout::submit),
        )
        .route("/api/checkout/confirm", post(handlers::checkout::confirm))
        .route("/api/checkout/cancel", post(handlers::checkout::cancel))
}
