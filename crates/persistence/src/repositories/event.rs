//! Event repository for database operations.
//!
//! Every write that changes which events reference a route adjusts
//! `routes.event_count` on the same transaction.

use chrono::{DateTime, Utc};
use domain::models::{NewEvent, UpdateEventRequest};
use domain::services::route_count;
use sqlx::{PgConnection, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::entities::{
    DeletedEventEntity, DifficultyDb, EventEntity, EventStatusDb, EventTypeDb,
    EventWithRelationsEntity, RegistrationEntity,
};
use crate::metrics::QueryTimer;
use crate::repositories::{RegistrationRepository, RouteRepository};

/// Result of a partial update.
#[derive(Debug)]
pub struct UpdatedEvent {
    pub event: EventEntity,
    /// Waiting users moved up because the capacity was raised or removed.
    pub promoted: Vec<Uuid>,
}

const EVENT_COLUMNS: &str = r#"
    id, title, description, date, start_time, duration, route_id, meeting_point,
    max_participants, difficulty, event_type, external_url, organizer_id, status,
    weather_conditions, notes, created_at, updated_at
"#;

const EVENT_WITH_RELATIONS_SELECT: &str = r#"
    SELECT e.id, e.title, e.description, e.date, e.start_time, e.duration, e.route_id,
           e.meeting_point, e.max_participants, e.difficulty, e.event_type, e.external_url,
           e.organizer_id, e.status, e.weather_conditions, e.notes, e.created_at, e.updated_at,
           r.name AS route_name,
           r.distance AS route_distance,
           r.difficulty AS route_difficulty,
           m.first_name AS organizer_first_name,
           m.last_name AS organizer_last_name,
           u.email AS organizer_email
    FROM events e
    LEFT JOIN routes r ON r.id = e.route_id
    LEFT JOIN users u ON u.id = e.organizer_id
    LEFT JOIN members m ON m.user_id = e.organizer_id
"#;

/// Repository for event database operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one event per date and bump the route count once by the total.
    ///
    /// Returns the new ids in date order.
    pub async fn create_series(
        &self,
        event: &NewEvent,
        dates: &[DateTime<Utc>],
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("create_event_series");
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(dates.len());

        for date in dates {
            let id: Uuid = sqlx::query_scalar(
                r#"
                INSERT INTO events (title, description, date, start_time, duration, route_id,
                                    meeting_point, max_participants, difficulty, event_type,
                                    external_url, organizer_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                RETURNING id
                "#,
            )
            .bind(&event.title)
            .bind(&event.description)
            .bind(date)
            .bind(&event.start_time)
            .bind(event.duration)
            .bind(event.route_id)
            .bind(&event.meeting_point)
            .bind(event.max_participants)
            .bind(DifficultyDb::from(event.difficulty))
            .bind(EventTypeDb::from(event.event_type))
            .bind(&event.external_url)
            .bind(event.organizer_id)
            .fetch_one(&mut *tx)
            .await?;
            ids.push(id);
        }

        let deltas = route_count::for_created(event.route_id, ids.len());
        RouteRepository::apply_event_count_deltas(&mut tx, &deltas).await?;

        tx.commit().await?;
        timer.record();
        Ok(ids)
    }

    /// Find an event row by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let query = format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS);
        let result = sqlx::query_as::<_, EventEntity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    async fn lock_event(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<EventEntity>, sqlx::Error> {
        let query = format!("SELECT {} FROM events WHERE id = $1 FOR UPDATE", EVENT_COLUMNS);
        sqlx::query_as::<_, EventEntity>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Apply a partial update. Absent fields are kept; `Some(None)` clears.
    ///
    /// A route change moves one unit of `event_count` from the old route to
    /// the new one on the same transaction. A capacity change promotes waiting
    /// users into any free seats under the same event lock that join and
    /// leave take. Returns `None` if the event is gone.
    pub async fn update(
        &self,
        id: Uuid,
        patch: &UpdateEventRequest,
    ) -> Result<Option<UpdatedEvent>, sqlx::Error> {
        let timer = QueryTimer::new("update_event");
        let mut tx = self.pool.begin().await?;

        let Some(current) = Self::lock_event(&mut tx, id).await? else {
            return Ok(None);
        };

        let query = format!(
            r#"
            UPDATE events SET
                title = COALESCE($2, title),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                date = COALESCE($5, date),
                start_time = COALESCE($6, start_time),
                duration = CASE WHEN $7 THEN $8 ELSE duration END,
                route_id = CASE WHEN $9 THEN $10 ELSE route_id END,
                meeting_point = COALESCE($11, meeting_point),
                max_participants = CASE WHEN $12 THEN $13 ELSE max_participants END,
                difficulty = COALESCE($14, difficulty),
                event_type = COALESCE($15, event_type),
                external_url = CASE WHEN $16 THEN $17 ELSE external_url END,
                status = COALESCE($18, status),
                weather_conditions = CASE WHEN $19 THEN $20 ELSE weather_conditions END,
                notes = CASE WHEN $21 THEN $22 ELSE notes END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        );

        let updated = sqlx::query_as::<_, EventEntity>(&query)
            .bind(id)
            .bind(&patch.title)
            .bind(patch.description.is_some())
            .bind(patch.description.clone().flatten())
            .bind(patch.date)
            .bind(&patch.start_time)
            .bind(patch.duration.is_some())
            .bind(patch.duration.flatten())
            .bind(patch.route_id.is_some())
            .bind(patch.route_id.flatten())
            .bind(&patch.meeting_point)
            .bind(patch.max_participants.is_some())
            .bind(patch.max_participants.flatten())
            .bind(patch.difficulty.map(DifficultyDb::from))
            .bind(patch.event_type.map(EventTypeDb::from))
            .bind(patch.external_url.is_some())
            .bind(patch.external_url.clone().flatten())
            .bind(patch.status.map(EventStatusDb::from))
            .bind(patch.weather_conditions.is_some())
            .bind(patch.weather_conditions.clone().flatten())
            .bind(patch.notes.is_some())
            .bind(patch.notes.clone().flatten())
            .fetch_one(&mut *tx)
            .await?;

        if let Some((old, new)) = patch.route_change(current.route_id) {
            let deltas = route_count::for_route_change(old, new);
            RouteRepository::apply_event_count_deltas(&mut tx, &deltas).await?;
        }

        let promoted = match patch.max_participants {
            Some(_) => {
                RegistrationRepository::fill_free_seats(&mut tx, id, updated.max_participants)
                    .await?
            }
            None => Vec::new(),
        };

        tx.commit().await?;
        timer.record();
        Ok(Some(UpdatedEvent {
            event: updated,
            promoted,
        }))
    }

    /// Delete an event and, optionally, the later live occurrences of its series.
    ///
    /// Series membership is the tuple (title, organizer, start time, meeting
    /// point, route) as read at the start of the call. The anchor and its
    /// siblings are locked together in id order, so overlapping series
    /// deletions queue behind each other instead of deadlocking. Route counts
    /// drop by the rows actually deleted per route. Returns `None` if the event
    /// is gone, otherwise the number of deleted rows.
    pub async fn delete(
        &self,
        id: Uuid,
        delete_future_events: bool,
    ) -> Result<Option<u64>, sqlx::Error> {
        let timer = QueryTimer::new("delete_event");
        let mut tx = self.pool.begin().await?;

        let query = format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS);
        let Some(anchor) = sqlx::query_as::<_, EventEntity>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        // Rows changed by a concurrent writer are re-checked against the
        // predicate once their lock is granted.
        let locked: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id FROM events
            WHERE id = $1
               OR ($2
                   AND title = $3
                   AND organizer_id = $4
                   AND start_time = $5
                   AND meeting_point = $6
                   AND route_id IS NOT DISTINCT FROM $7
                   AND date > $8
                   AND status <> 'cancelled')
            ORDER BY id
            FOR UPDATE
            "#,
        )
        .bind(anchor.id)
        .bind(delete_future_events)
        .bind(&anchor.title)
        .bind(anchor.organizer_id)
        .bind(&anchor.start_time)
        .bind(&anchor.meeting_point)
        .bind(anchor.route_id)
        .bind(anchor.date)
        .fetch_all(&mut *tx)
        .await?;

        if !locked.contains(&anchor.id) {
            return Ok(None);
        }

        let deleted = sqlx::query_as::<_, DeletedEventEntity>(
            "DELETE FROM events WHERE id = ANY($1) RETURNING id, route_id",
        )
        .bind(&locked)
        .fetch_all(&mut *tx)
        .await?;

        debug!(
            event_id = %anchor.id,
            deleted = deleted.len(),
            series = delete_future_events,
            "Deleting events"
        );
        let deltas = route_count::for_deleted(deleted.iter().map(|row| row.route_id));
        RouteRepository::apply_event_count_deltas(&mut tx, &deltas).await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(deleted.len() as u64))
    }

    /// Find an event with its route summary and organizer name sources.
    pub async fn find_with_relations(
        &self,
        id: Uuid,
    ) -> Result<Option<EventWithRelationsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_with_relations");
        let query = format!("{} WHERE e.id = $1", EVENT_WITH_RELATIONS_SELECT);
        let result = sqlx::query_as::<_, EventWithRelationsEntity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List all events by date.
    pub async fn list_all(&self) -> Result<Vec<EventWithRelationsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events");
        let query = format!("{} ORDER BY e.date ASC", EVENT_WITH_RELATIONS_SELECT);
        let result = sqlx::query_as::<_, EventWithRelationsEntity>(&query)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List the next `limit` events on or after `now`.
    pub async fn list_upcoming(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<EventWithRelationsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_upcoming_events");
        let query = format!(
            "{} WHERE e.date >= $1 ORDER BY e.date ASC LIMIT $2",
            EVENT_WITH_RELATIONS_SELECT
        );
        let result = sqlx::query_as::<_, EventWithRelationsEntity>(&query)
            .bind(now)
            .bind(limit)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List the events scheduled on a route by date.
    pub async fn list_by_route(
        &self,
        route_id: Uuid,
    ) -> Result<Vec<EventWithRelationsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events_by_route");
        let query = format!(
            "{} WHERE e.route_id = $1 ORDER BY e.date ASC",
            EVENT_WITH_RELATIONS_SELECT
        );
        let result = sqlx::query_as::<_, EventWithRelationsEntity>(&query)
            .bind(route_id)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Load the rosters of several events with attendee name sources.
    ///
    /// Rows are ordered by event, then state, then registration order.
    pub async fn find_registrations(
        &self,
        event_ids: &[Uuid],
    ) -> Result<Vec<RegistrationEntity>, sqlx::Error> {
        if event_ids.is_empty() {
            return Ok(Vec::new());
        }

        let timer = QueryTimer::new("find_event_registrations");
        let result = sqlx::query_as::<_, RegistrationEntity>(
            r#"
            SELECT er.event_id, er.user_id, er.state, er.position, er.registered_at,
                   m.first_name, m.last_name, u.email
            FROM event_registrations er
            JOIN users u ON u.id = er.user_id
            LEFT JOIN members m ON m.user_id = er.user_id
            WHERE er.event_id = ANY($1)
            ORDER BY er.event_id, er.state, er.position
            "#,
        )
        .bind(event_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
