//! HTTP client for the external payment provider.
//!
//! The provider exposes two endpoints:
//!
//! - `POST {base}/orders` takes a [`CreateOrderRequest`] and answers with a
//!   [`PaymentOrder`]
//! - `POST {base}/orders/{order_id}/confirm` answers with an
//!   [`OrderConfirmation`]

use async_trait::async_trait;
use courtside_core::{
    collaborators::{CollaboratorError, Identity, PaymentGateway},
    models::payment::{CreateOrderRequest, OrderConfirmation, PaymentOrder},
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::PaymentApiConfig;

/// Header carrying the end user's id on every provider call.
pub const USER_ID_HEADER: &str = "X-User-Id";

#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpPaymentGateway {
    pub fn new(config: &PaymentApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&CreateOrderRequest>,
        identity: &Identity,
    ) -> Result<T, CollaboratorError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {} for user {}", url, identity.user_id);

        let mut request = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header(USER_ID_HEADER, &identity.user_id);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, text));
        }

        response.json::<T>().await.map_err(|e| {
            CollaboratorError::Rejected(format!("Unreadable payment provider response: {e}"))
        })
    }
}

/// Maps a non-success response from the provider.
///
/// Server errors and throttling can be retried; a conflict means the order
/// changed underneath us; anything else is a rejection.
pub fn status_error(status: StatusCode, body: String) -> CollaboratorError {
    let message = if body.is_empty() {
        format!("Payment provider answered {status}")
    } else {
        format!("Payment provider answered {status}: {body}")
    };

    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        CollaboratorError::Transient(message)
    } else if status == StatusCode::CONFLICT {
        CollaboratorError::Conflict(message)
    } else {
        CollaboratorError::Rejected(message)
    }
}

fn transport_error(err: reqwest::Error) -> CollaboratorError {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        CollaboratorError::Transient(format!("Payment provider unreachable: {err}"))
    } else {
        CollaboratorError::Rejected(format!("Payment request failed: {err}"))
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_order(
        &self,
        request: &CreateOrderRequest,
        identity: &Identity,
    ) -> Result<PaymentOrder, CollaboratorError> {
        self.post("/orders", Some(request), identity).await
    }

    async fn confirm_order(
        &self,
        order_id: &str,
        identity: &Identity,
    ) -> Result<OrderConfirmation, CollaboratorError> {
        self.post(&format!("/orders/{order_id}/confirm"), None, identity)
            .await
    }
}
