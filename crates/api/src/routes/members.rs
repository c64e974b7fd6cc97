//! Member profile endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::{CreateMemberRequest, Member};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;
use crate::services::MemberService;

/// GET /api/v1/members/me
pub async fn get_current_member(
    State(state): State<AppState>,
    auth: UserAuth,
) -> Result<Json<Member>, ApiError> {
    let member = MemberService::new(state.pool.clone())
        .get_current(auth.user_id)
        .await?;
    Ok(Json(member))
}

/// POST /api/v1/members
pub async fn create_member(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateMemberRequest>,
) -> Result<(StatusCode, Json<Member>), ApiError> {
    request.validate()?;
    let member = MemberService::new(state.pool.clone())
        .create(auth.user_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(member)))
}
