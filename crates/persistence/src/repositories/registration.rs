//! Registration repository: join, leave and waiting-list promotion.
//!
//! Each operation locks the event row, loads the roster, lets the domain
//! [`Roster`] decide and writes the result on the same transaction, so
//! concurrent registrations for one event are serialized.

use domain::models::RegistrationState;
use domain::services::{LeavePlan, RegistrationError, Roster};
use sqlx::{PgConnection, PgPool};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::entities::RegistrationStateDb;
use crate::metrics::QueryTimer;

/// Failure of a registration write.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Event not found")]
    EventNotFound,

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Repository for event registrations.
#[derive(Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    /// Creates a new RegistrationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load an event's roster. `None` if the event does not exist.
    pub async fn find_roster(&self, event_id: Uuid) -> Result<Option<Roster>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_roster");
        let mut conn = self.pool.acquire().await?;
        let max: Option<Option<i32>> =
            sqlx::query_scalar::<_, Option<i32>>("SELECT max_participants FROM events WHERE id = $1")
                .bind(event_id)
                .fetch_optional(&mut *conn)
                .await?;
        let result = match max {
            Some(max) => Some(Self::load_roster(&mut conn, event_id, max).await?),
            None => None,
        };
        timer.record();
        Ok(result)
    }

    async fn lock_roster(
        conn: &mut PgConnection,
        event_id: Uuid,
    ) -> Result<Roster, RosterError> {
        let max: Option<i32> = sqlx::query_scalar::<_, Option<i32>>(
            "SELECT max_participants FROM events WHERE id = $1 FOR UPDATE",
        )
        .bind(event_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(RosterError::EventNotFound)?;

        Ok(Self::load_roster(conn, event_id, max).await?)
    }

    pub(crate) async fn load_roster(
        conn: &mut PgConnection,
        event_id: Uuid,
        max_participants: Option<i32>,
    ) -> Result<Roster, sqlx::Error> {
        let rows: Vec<(Uuid, RegistrationStateDb)> = sqlx::query_as(
            r#"
            SELECT user_id, state
            FROM event_registrations
            WHERE event_id = $1
            ORDER BY position
            "#,
        )
        .bind(event_id)
        .fetch_all(conn)
        .await?;

        let mut roster = Roster::new(max_participants);
        for (user_id, state) in rows {
            match state {
                RegistrationStateDb::Participant => roster.participants.push(user_id),
                RegistrationStateDb::Waiting => roster.waiting_list.push(user_id),
            }
        }
        Ok(roster)
    }

    /// Register a user as participant, or on the waiting list when full.
    pub async fn join(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<RegistrationState, RosterError> {
        let timer = QueryTimer::new("join_event");
        let mut tx = self.pool.begin().await?;

        let roster = Self::lock_roster(&mut tx, event_id).await?;
        let state = roster.plan_join(user_id)?;
        let state_db = match state {
            RegistrationState::Participant => RegistrationStateDb::Participant,
            _ => RegistrationStateDb::Waiting,
        };

        sqlx::query(
            r#"
            INSERT INTO event_registrations (event_id, user_id, state)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .bind(state_db)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO event_participations (event_id, user_id, status)
            VALUES ($1, $2, 'registered')
            ON CONFLICT (event_id, user_id)
            DO UPDATE SET status = 'registered', updated_at = NOW()
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(state)
    }

    /// Remove a user; a departing participant frees a seat for the head of
    /// the waiting list, who moves to the end of the participants.
    pub async fn leave(&self, event_id: Uuid, user_id: Uuid) -> Result<LeavePlan, RosterError> {
        let timer = QueryTimer::new("leave_event");
        let mut tx = self.pool.begin().await?;

        let roster = Self::lock_roster(&mut tx, event_id).await?;
        let plan = roster.plan_leave(user_id)?;

        sqlx::query("DELETE FROM event_registrations WHERE event_id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if let Some(promoted) = plan.promoted {
            Self::promote(&mut tx, event_id, promoted).await?;
        }

        sqlx::query("DELETE FROM event_participations WHERE event_id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(plan)
    }

    /// Move waiting users into the seats freed by a new `max_participants`.
    ///
    /// The caller holds the event row lock. Returns the promoted users in
    /// promotion order.
    pub(crate) async fn fill_free_seats(
        conn: &mut PgConnection,
        event_id: Uuid,
        max_participants: Option<i32>,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let roster = Self::load_roster(&mut *conn, event_id, max_participants).await?;
        let promoted = roster.plan_capacity_change();
        for user_id in &promoted {
            Self::promote(&mut *conn, event_id, *user_id).await?;
        }
        Ok(promoted)
    }

    /// Waiting to participant, placed after the current participants.
    async fn promote(
        conn: &mut PgConnection,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE event_registrations
            SET state = 'participant',
                position = nextval(pg_get_serial_sequence('event_registrations', 'position'))
            WHERE event_id = $1 AND user_id = $2 AND state = 'waiting'
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .execute(conn)
        .await?;
        debug!(event_id = %event_id, user_id = %user_id, "Promoted from waiting list");
        Ok(())
    }
}
