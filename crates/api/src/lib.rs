//! # Courtside API
//!
//! The web server for the Courtside court booking service. Sellers publish
//! courts and slot templates; players browse availability, fill a cart and
//! check out, optionally through an external payment provider.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Turn requests into calls on the booking core
//! - **Middleware**: Authentication and error mapping
//! - **Session**: One cart and checkout per signed-in user
//! - **Payment**: HTTP client for the payment provider
//! - **Config**: Environment configuration

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
pub mod payment;
/// Route definitions and API endpoint structure
pub mod routes;
pub mod session;

use std::{sync::Arc, time::Duration};

use axum::{http::HeaderValue, Router};
use courtside_core::{
    checkout::{CheckoutConfig, CheckoutCoordinator},
    collaborators::{BookingStorage, CheckoutStore, PaymentGateway},
    cart::BookingCart,
};
use courtside_db::{PgBookingStorage, PgCheckoutStore};
use eyre::Result;
use sqlx::PgPool;
use tokio::{net::TcpListener, sync::Mutex};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::{
    payment::HttpPaymentGateway,
    session::{Session, SessionRegistry},
};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// PostgreSQL connection pool for catalogue queries
    pub db_pool: PgPool,
    pub storage: Arc<dyn BookingStorage>,
    pub payment: Option<Arc<dyn PaymentGateway>>,
    pub checkout_store: Arc<dyn CheckoutStore>,
    pub checkout_config: CheckoutConfig,
    pub jwt_secret: String,
    pub sessions: SessionRegistry,
}

impl ApiState {
    pub fn new(
        db_pool: PgPool,
        storage: Arc<dyn BookingStorage>,
        checkout_store: Arc<dyn CheckoutStore>,
        checkout_config: CheckoutConfig,
        jwt_secret: impl Into<String>,
    ) -> Self {
        Self {
            db_pool,
            storage,
            payment: None,
            checkout_store,
            checkout_config,
            jwt_secret: jwt_secret.into(),
            sessions: SessionRegistry::new(),
        }
    }

    pub fn with_payment_gateway(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.payment = Some(gateway);
        self
    }

    /// The session of `user_id`, created with an empty cart on first use.
    pub async fn session(&self, user_id: &str) -> Arc<Mutex<Session>> {
        self.sessions
            .get_or_create(user_id, || {
                let mut checkout = CheckoutCoordinator::new(
                    self.storage.clone(),
                    self.checkout_store.clone(),
                    self.checkout_config.clone(),
                );
                if let Some(gateway) = &self.payment {
                    checkout = checkout.with_payment_gateway(gateway.clone());
                }
                Session {
                    cart: BookingCart::new(),
                    checkout,
                }
            })
            .await
    }
}

/// Builds the router with every endpoint attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::court::routes())
        .merge(routes::availability::routes())
        .merge(routes::cart::routes())
        .merge(routes::checkout::routes())
        .merge(routes::booking::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the API server with the provided configuration and database connection
///
/// Installs logging, wires the PostgreSQL-backed collaborators and the
/// payment provider (when configured), then serves until shutdown.
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut state = ApiState::new(
        db_pool.clone(),
        Arc::new(PgBookingStorage::new(db_pool.clone())),
        Arc::new(PgCheckoutStore::new(db_pool)),
        config.checkout_config(),
        config.jwt_secret.clone(),
    );
    match &config.payment {
        Some(payment) => {
            info!("Checkout requires payment through {}", payment.base_url);
            state = state.with_payment_gateway(Arc::new(HttpPaymentGateway::new(payment)));
        }
        None => info!("No payment provider configured; bookings are committed directly"),
    }

    let app = app(Arc::new(state));

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;
        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
            .into_inner(),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
