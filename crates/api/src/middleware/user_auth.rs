//! Session token authentication.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::jwt::{extract_user_id, JwtConfig, JwtError};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Identity proven by a valid session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAuth {
    pub user_id: Uuid,
    /// Session identifier (`jti` claim).
    pub jti: String,
}

impl UserAuth {
    pub fn validate(jwt: &JwtConfig, token: &str) -> Result<Self, JwtError> {
        let claims = jwt.validate_token(token)?;
        let user_id = extract_user_id(&claims)?;
        Ok(Self {
            user_id,
            jti: claims.jti,
        })
    }

    /// Authenticates from the `Authorization: Bearer` header.
    pub fn from_headers(jwt: &JwtConfig, headers: &HeaderMap) -> Result<Self, ApiError> {
        let token = bearer_token(headers).ok_or_else(|| {
            ApiError::Unauthorized("Missing or invalid Authorization header".to_string())
        })?;

        Self::validate(jwt, token).map_err(|e| {
            tracing::debug!(error = %e, "Session token rejected");
            ApiError::Unauthorized("Invalid or expired token".to_string())
        })
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Rejects the request with 401 unless it carries a valid session token.
/// On success the [`UserAuth`] is stored in the request extensions.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match UserAuth::from_headers(&state.jwt, req.headers()) {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}
