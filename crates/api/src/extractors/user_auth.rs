//! Extractor for the authenticated caller.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;

/// Reuses the identity stored by `require_user_auth`, otherwise validates the
/// bearer token itself.
#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<UserAuth>() {
            return Ok(auth.clone());
        }
        UserAuth::from_headers(&state.jwt, &parts.headers)
    }
}
