//! Join and leave on behalf of the authenticated member.

use domain::models::{RegistrationResponse, RegistrationState};
use domain::services::{can_participate, RegistrationError};
use persistence::repositories::{RegistrationRepository, RosterError};
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::metrics::{record_join, record_leave};
use crate::services::Caller;

#[derive(Debug, Error)]
pub enum RegistrationServiceError {
    #[error("Unknown user")]
    UnknownCaller,

    #[error("Only club members can register for events")]
    Forbidden,

    #[error("Event not found")]
    EventNotFound,

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<RosterError> for RegistrationServiceError {
    fn from(err: RosterError) -> Self {
        match err {
            RosterError::EventNotFound => Self::EventNotFound,
            RosterError::Registration(e) => Self::Registration(e),
            RosterError::Database(e) => Self::Database(e),
        }
    }
}

impl From<RegistrationServiceError> for ApiError {
    fn from(err: RegistrationServiceError) -> Self {
        match err {
            RegistrationServiceError::UnknownCaller => ApiError::Unauthorized(err.to_string()),
            RegistrationServiceError::Forbidden => ApiError::Forbidden(err.to_string()),
            RegistrationServiceError::EventNotFound => ApiError::NotFound(err.to_string()),
            RegistrationServiceError::Registration(e) => ApiError::BadRequest(e.to_string()),
            RegistrationServiceError::Database(e) => ApiError::from(e),
        }
    }
}

#[derive(Clone)]
pub struct RegistrationService {
    pool: PgPool,
    registrations: RegistrationRepository,
}

impl RegistrationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            registrations: RegistrationRepository::new(pool.clone()),
            pool,
        }
    }

    async fn member(&self, user_id: Uuid) -> Result<Caller, RegistrationServiceError> {
        let caller = Caller::load(&self.pool, user_id)
            .await?
            .ok_or(RegistrationServiceError::UnknownCaller)?;
        if !can_participate(caller.role()) {
            return Err(RegistrationServiceError::Forbidden);
        }
        Ok(caller)
    }

    /// Registers the caller as a participant, or on the waiting list when full.
    pub async fn join(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<RegistrationResponse, RegistrationServiceError> {
        self.member(user_id).await?;

        let state = self.registrations.join(event_id, user_id).await?;

        record_join(state);
        info!(event_id = %event_id, user_id = %user_id, state = %state, "Joined event");

        Ok(RegistrationResponse {
            event_id,
            status: state,
            promoted_user_id: None,
        })
    }

    /// Removes the caller; a freed seat goes to the head of the waiting list.
    pub async fn leave(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<RegistrationResponse, RegistrationServiceError> {
        self.member(user_id).await?;

        let plan = self.registrations.leave(event_id, user_id).await?;

        record_leave(plan.promoted.is_some());
        info!(
            event_id = %event_id,
            user_id = %user_id,
            left_from = %plan.left_from,
            promoted_user_id = ?plan.promoted,
            "Left event"
        );

        Ok(RegistrationResponse {
            event_id,
            status: RegistrationState::None,
            promoted_user_id: plan.promoted,
        })
    }

    /// The caller's current state on the event.
    pub async fn status(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<RegistrationResponse, RegistrationServiceError> {
        let roster = self
            .registrations
            .find_roster(event_id)
            .await?
            .ok_or(RegistrationServiceError::EventNotFound)?;

        Ok(RegistrationResponse {
            event_id,
            status: roster.state_of(user_id),
            promoted_user_id: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_roster_error_conversion() {
        assert!(matches!(
            RegistrationServiceError::from(RosterError::EventNotFound),
            RegistrationServiceError::EventNotFound
        ));
        assert!(matches!(
            RegistrationServiceError::from(RosterError::Registration(
                RegistrationError::AlreadyRegistered
            )),
            RegistrationServiceError::Registration(RegistrationError::AlreadyRegistered)
        ));
    }

    #[test]
    fn test_invalid_transitions_are_bad_requests() {
        for err in [RegistrationError::AlreadyRegistered, RegistrationError::NotRegistered] {
            let message = err.to_string();
            let api = ApiError::from(RegistrationServiceError::Registration(err));
            match &api {
                ApiError::BadRequest(msg) => assert_eq!(msg, &message),
                other => panic!("Expected BadRequest, got {:?}", other),
            }
            assert_eq!(api.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_forbidden_and_not_found() {
        let forbidden = ApiError::from(RegistrationServiceError::Forbidden).into_response();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
        let missing = ApiError::from(RegistrationServiceError::EventNotFound).into_response();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
