use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/courts", post(handlers::court::create_court))
        .route("/api/courts/:id", get(handlers::court::get_court))
        .route(
            "/api/courts/:id/templates",
            post(handlers::court::create_template).get(handlers::court::list_templates),
        )
}
