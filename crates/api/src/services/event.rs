//! Event lifecycle: creation of single events and series, partial updates,
//! deletion (optionally of the remaining series) and roster-enriched reads.

use std::collections::HashMap;

use domain::models::{
    CreateEventRequest, CreateEventResponse, DeleteEventResponse, EventAttendee, EventDetail,
    ListEventsResponse, UpdateEventRequest, UpdateEventResponse,
};
use domain::services::{can_manage_event, can_participate, occurrence_dates, RecurrenceError};
use persistence::entities::{EventWithRelationsEntity, RegistrationStateDb};
use persistence::repositories::{EventRepository, RouteRepository};
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config::EventsConfig;
use crate::error::ApiError;
use crate::middleware::metrics::{
    record_events_created, record_events_deleted, record_promotions,
};
use crate::services::Caller;

#[derive(Debug, Error)]
pub enum EventServiceError {
    #[error("Unknown user")]
    UnknownCaller,

    #[error("User not found")]
    OrganizerNotFound,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("Event not found")]
    EventNotFound,

    #[error("Route not found")]
    RouteNotFound,

    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<EventServiceError> for ApiError {
    fn from(err: EventServiceError) -> Self {
        match err {
            EventServiceError::UnknownCaller => ApiError::Unauthorized(err.to_string()),
            EventServiceError::OrganizerNotFound
            | EventServiceError::EventNotFound
            | EventServiceError::RouteNotFound => ApiError::NotFound(err.to_string()),
            EventServiceError::Forbidden(msg) => ApiError::Forbidden(msg.to_string()),
            EventServiceError::InvalidRequest(msg) => ApiError::BadRequest(msg),
            EventServiceError::Recurrence(e) => ApiError::BadRequest(e.to_string()),
            EventServiceError::Database(e) => ApiError::from(e),
        }
    }
}

/// Event operations over the events, routes and registrations tables.
#[derive(Clone)]
pub struct EventService {
    pool: PgPool,
    events: EventRepository,
    routes: RouteRepository,
    max_occurrences: u32,
    upcoming_limit: i64,
}

impl EventService {
    pub fn new(pool: PgPool, config: &EventsConfig) -> Self {
        Self {
            events: EventRepository::new(pool.clone()),
            routes: RouteRepository::new(pool.clone()),
            pool,
            max_occurrences: config.max_occurrences,
            upcoming_limit: config.upcoming_limit,
        }
    }

    /// Creates one event, or `number_of_recurrences` events spaced
    /// `repeat_interval` weeks apart. The request must already be validated.
    pub async fn create(
        &self,
        organizer_id: Uuid,
        request: &CreateEventRequest,
    ) -> Result<CreateEventResponse, EventServiceError> {
        let organizer = Caller::load(&self.pool, organizer_id)
            .await?
            .ok_or(EventServiceError::OrganizerNotFound)?;
        if !can_participate(organizer.role()) {
            return Err(EventServiceError::Forbidden(
                "Only club members can organize events",
            ));
        }

        if let Some(route_id) = request.route_id {
            if !self.routes.exists(route_id).await? {
                return Err(EventServiceError::RouteNotFound);
            }
        }

        let recurrence = request.recurrence();
        let dates = occurrence_dates(request.date, recurrence, self.max_occurrences)?;
        let new_event = request.to_new_event(organizer_id);
        let ids = self.events.create_series(&new_event, &dates).await?;
        let Some(&first_id) = ids.first() else {
            return Err(EventServiceError::InvalidRequest(
                "No occurrences to create".to_string(),
            ));
        };

        record_events_created(ids.len());
        info!(
            organizer_id = %organizer_id,
            event_id = %first_id,
            count = ids.len(),
            route_id = ?request.route_id,
            "Event created"
        );

        Ok(match recurrence {
            Some(_) => CreateEventResponse::Series {
                count: ids.len(),
                event_ids: ids,
            },
            None => CreateEventResponse::Single { event_id: first_id },
        })
    }

    /// Applies a partial update on behalf of the organizer or an admin.
    pub async fn update(
        &self,
        caller_id: Uuid,
        event_id: Uuid,
        patch: &UpdateEventRequest,
    ) -> Result<UpdateEventResponse, EventServiceError> {
        if patch.is_empty() {
            return Err(EventServiceError::InvalidRequest(
                "No fields to update".to_string(),
            ));
        }
        patch
            .validate_nested()
            .map_err(EventServiceError::InvalidRequest)?;

        let caller = Caller::load(&self.pool, caller_id)
            .await?
            .ok_or(EventServiceError::UnknownCaller)?;
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventServiceError::EventNotFound)?;
        if !can_manage_event(caller.id(), caller.role(), event.organizer_id) {
            return Err(EventServiceError::Forbidden(
                "Only the organizer or an admin can edit this event",
            ));
        }

        if let Some((_, Some(new_route))) = patch.route_change(event.route_id) {
            if !self.routes.exists(new_route).await? {
                return Err(EventServiceError::RouteNotFound);
            }
        }

        let updated = self
            .events
            .update(event_id, patch)
            .await?
            .ok_or(EventServiceError::EventNotFound)?;

        record_promotions(updated.promoted.len());
        info!(
            event_id = %event_id,
            caller_id = %caller_id,
            route_changed = patch.route_change(event.route_id).is_some(),
            status = %domain::models::EventStatus::from(updated.event.status),
            promoted = updated.promoted.len(),
            "Event updated"
        );

        Ok(UpdateEventResponse { event_id })
    }

    /// Deletes the event and, when asked, the later live occurrences of its series.
    pub async fn delete(
        &self,
        caller_id: Uuid,
        event_id: Uuid,
        delete_future_events: bool,
    ) -> Result<DeleteEventResponse, EventServiceError> {
        let caller = Caller::load(&self.pool, caller_id)
            .await?
            .ok_or(EventServiceError::UnknownCaller)?;
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(EventServiceError::EventNotFound)?;
        if !can_manage_event(caller.id(), caller.role(), event.organizer_id) {
            return Err(EventServiceError::Forbidden(
                "Only the organizer or an admin can delete this event",
            ));
        }

        let deleted_count = self
            .events
            .delete(event_id, delete_future_events)
            .await?
            .ok_or(EventServiceError::EventNotFound)?;

        record_events_deleted(deleted_count);
        info!(
            event_id = %event_id,
            caller_id = %caller_id,
            deleted_count,
            delete_future_events,
            "Event deleted"
        );

        Ok(DeleteEventResponse {
            success: true,
            deleted_count,
        })
    }

    pub async fn get(&self, event_id: Uuid) -> Result<EventDetail, EventServiceError> {
        let row = self
            .events
            .find_with_relations(event_id)
            .await?
            .ok_or(EventServiceError::EventNotFound)?;
        let mut details = self.with_rosters(vec![row]).await?;
        details.pop().ok_or(EventServiceError::EventNotFound)
    }

    pub async fn list(&self) -> Result<ListEventsResponse, EventServiceError> {
        let rows = self.events.list_all().await?;
        self.respond(rows).await
    }

    /// Events dated now or later, soonest first, capped by `events.upcoming_limit`.
    pub async fn upcoming(&self) -> Result<ListEventsResponse, EventServiceError> {
        let rows = self
            .events
            .list_upcoming(chrono::Utc::now(), self.upcoming_limit)
            .await?;
        self.respond(rows).await
    }

    pub async fn by_route(&self, route_id: Uuid) -> Result<ListEventsResponse, EventServiceError> {
        let rows = self.events.list_by_route(route_id).await?;
        self.respond(rows).await
    }

    async fn respond(
        &self,
        rows: Vec<EventWithRelationsEntity>,
    ) -> Result<ListEventsResponse, EventServiceError> {
        let data = self.with_rosters(rows).await?;
        Ok(ListEventsResponse {
            count: data.len(),
            data,
        })
    }

    /// Attaches participants and waiting lists, preserving row order.
    async fn with_rosters(
        &self,
        rows: Vec<EventWithRelationsEntity>,
    ) -> Result<Vec<EventDetail>, EventServiceError> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.event.id).collect();
        let registrations = self.events.find_registrations(&ids).await?;

        let mut rosters: HashMap<Uuid, (Vec<EventAttendee>, Vec<EventAttendee>)> = HashMap::new();
        for registration in &registrations {
            let (participants, waiting) = rosters.entry(registration.event_id).or_default();
            match registration.state {
                RegistrationStateDb::Participant => participants.push(registration.into()),
                RegistrationStateDb::Waiting => waiting.push(registration.into()),
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let organizer_name = row.organizer_name();
                let route = row.route_summary();
                let (participants, waiting_list) =
                    rosters.remove(&row.event.id).unwrap_or_default();
                EventDetail {
                    event: row.event.into(),
                    organizer_name,
                    route,
                    participant_count: participants.len(),
                    waiting_list_count: waiting_list.len(),
                    participants,
                    waiting_list,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    fn status_of(err: EventServiceError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(status_of(EventServiceError::UnknownCaller), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(EventServiceError::OrganizerNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(EventServiceError::EventNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(EventServiceError::RouteNotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(EventServiceError::Forbidden("nope")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(EventServiceError::Recurrence(RecurrenceError::InvalidInterval(3))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(EventServiceError::InvalidRequest("bad".into())),
            StatusCode::BAD_REQUEST
        );
    }
}
