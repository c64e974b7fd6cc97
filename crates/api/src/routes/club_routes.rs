//! Route library endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{CreateRouteRequest, ListRoutesResponse, RouteResponse, SearchRoutesQuery};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;
use crate::services::RouteService;

/// POST /api/v1/routes
pub async fn create_route(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateRouteRequest>,
) -> Result<(StatusCode, Json<RouteResponse>), ApiError> {
    request.validate()?;
    let route = RouteService::new(state.pool.clone())
        .create(auth.user_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(route)))
}

/// GET /api/v1/routes
pub async fn list_routes(
    State(state): State<AppState>,
) -> Result<Json<ListRoutesResponse>, ApiError> {
    Ok(Json(RouteService::new(state.pool.clone()).list().await?))
}

/// GET /api/v1/routes/search?search_term=&difficulty=&route_type=
pub async fn search_routes(
    State(state): State<AppState>,
    Query(query): Query<SearchRoutesQuery>,
) -> Result<Json<ListRoutesResponse>, ApiError> {
    Ok(Json(RouteService::new(state.pool.clone()).search(&query).await?))
}

/// GET /api/v1/routes/:route_id
pub async fn get_route(
    State(state): State<AppState>,
    Path(route_id): Path<Uuid>,
) -> Result<Json<RouteResponse>, ApiError> {
    Ok(Json(RouteService::new(state.pool.clone()).get(route_id).await?))
}
