//! # Authentication Module
//!
//! Bearer-token authentication. Tokens are HS256 JWTs issued by the identity
//! provider; the `sub` claim is the user id.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use courtside_core::{
    collaborators::Identity,
    errors::{BookingError, BookingResult},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// Verifies `token` and returns the identity it was issued for.
///
/// The raw token is kept as the identity's access token so collaborators can
/// forward it.
pub fn decode_identity(token: &str, secret: &str) -> BookingResult<Identity> {
    let claims = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| BookingError::Authentication(format!("Invalid token: {e}")))?
    .claims;

    if claims.sub.is_empty() {
        return Err(BookingError::Authentication(
            "Token has no subject".to_string(),
        ));
    }

    Ok(Identity {
        user_id: claims.sub,
        access_token: token.to_string(),
    })
}

/// Signs a token for `user_id` valid for `ttl`.
pub fn issue_token(user_id: &str, secret: &str, ttl: Duration) -> BookingResult<String> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + ttl).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| BookingError::Internal(Box::new(e)))
}

/// Extractor for the caller's identity.
///
/// Rejects the request with `401 Unauthorized` when the `Authorization`
/// header is missing or the token does not verify.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| {
                BookingError::Authentication("Missing bearer token".to_string())
            })?;

        Ok(AuthenticatedUser(decode_identity(token.trim(), &state.jwt_secret)?))
    }
}
