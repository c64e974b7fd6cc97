//! Event endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    CreateEventRequest, CreateEventResponse, DeleteEventQuery, DeleteEventResponse, EventDetail,
    ListEventsResponse, RegistrationResponse, UpdateEventRequest, UpdateEventResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;
use crate::services::{EventService, RegistrationService};

fn event_service(state: &AppState) -> EventService {
    EventService::new(state.pool.clone(), &state.config.events)
}

/// POST /api/v1/events
///
/// Creates a single event, or a weekly series when `repeat_interval` and
/// `number_of_recurrences > 1` are given.
pub async fn create_event(
    State(state): State<AppState>,
    auth: UserAuth,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<CreateEventResponse>), ApiError> {
    request.validate()?;
    let response = event_service(&state).create(auth.user_id, &request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/events
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<ListEventsResponse>, ApiError> {
    Ok(Json(event_service(&state).list().await?))
}

/// GET /api/v1/events/upcoming
pub async fn list_upcoming_events(
    State(state): State<AppState>,
) -> Result<Json<ListEventsResponse>, ApiError> {
    Ok(Json(event_service(&state).upcoming().await?))
}

/// GET /api/v1/events/:event_id
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventDetail>, ApiError> {
    Ok(Json(event_service(&state).get(event_id).await?))
}

/// GET /api/v1/routes/:route_id/events
pub async fn list_route_events(
    State(state): State<AppState>,
    Path(route_id): Path<Uuid>,
) -> Result<Json<ListEventsResponse>, ApiError> {
    Ok(Json(event_service(&state).by_route(route_id).await?))
}

/// PATCH /api/v1/events/:event_id
///
/// Absent fields are unchanged; `null` clears nullable fields.
pub async fn update_event(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(event_id): Path<Uuid>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<UpdateEventResponse>, ApiError> {
    request.validate()?;
    let response = event_service(&state)
        .update(auth.user_id, event_id, &request)
        .await?;
    Ok(Json(response))
}

/// DELETE /api/v1/events/:event_id?delete_future_events=true
pub async fn delete_event(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(event_id): Path<Uuid>,
    Query(query): Query<DeleteEventQuery>,
) -> Result<Json<DeleteEventResponse>, ApiError> {
    let response = event_service(&state)
        .delete(auth.user_id, event_id, query.delete_future_events)
        .await?;
    Ok(Json(response))
}

/// POST /api/v1/events/:event_id/join
pub async fn join_event(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(event_id): Path<Uuid>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    let response = RegistrationService::new(state.pool.clone())
        .join(auth.user_id, event_id)
        .await?;
    Ok(Json(response))
}

/// POST /api/v1/events/:event_id/leave
pub async fn leave_event(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(event_id): Path<Uuid>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    let response = RegistrationService::new(state.pool.clone())
        .leave(auth.user_id, event_id)
        .await?;
    Ok(Json(response))
}

/// GET /api/v1/events/:event_id/registration
pub async fn get_registration(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(event_id): Path<Uuid>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    let response = RegistrationService::new(state.pool.clone())
        .status(auth.user_id, event_id)
        .await?;
    Ok(Json(response))
}
