//! Event registration entities (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{display_name, EventAttendee, ParticipationStatus, RegistrationState};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for registration_state. `None` is represented by the absence of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "registration_state", rename_all = "lowercase")]
pub enum RegistrationStateDb {
    Participant,
    Waiting,
}

impl From<RegistrationStateDb> for RegistrationState {
    fn from(db: RegistrationStateDb) -> Self {
        match db {
            RegistrationStateDb::Participant => RegistrationState::Participant,
            RegistrationStateDb::Waiting => RegistrationState::Waiting,
        }
    }
}

/// Database enum for participation_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "participation_status", rename_all = "lowercase")]
pub enum ParticipationStatusDb {
    Registered,
}

impl From<ParticipationStatusDb> for ParticipationStatus {
    fn from(db: ParticipationStatusDb) -> Self {
        match db {
            ParticipationStatusDb::Registered => ParticipationStatus::Registered,
        }
    }
}

/// Roster row joined with the user's name sources, in registration order.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationEntity {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub state: RegistrationStateDb,
    pub position: i64,
    pub registered_at: DateTime<Utc>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl From<&RegistrationEntity> for EventAttendee {
    fn from(entity: &RegistrationEntity) -> Self {
        Self {
            user_id: entity.user_id,
            name: display_name(
                entity.first_name.as_deref(),
                entity.last_name.as_deref(),
                entity.email.as_deref(),
            ),
        }
    }
}

/// Database row mapping for the event_participations table.
#[derive(Debug, Clone, FromRow)]
pub struct EventParticipationEntity {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: ParticipationStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventParticipationEntity> for domain::models::EventParticipation {
    fn from(entity: EventParticipationEntity) -> Self {
        Self {
            id: entity.id,
            event_id: entity.event_id,
            user_id: entity.user_id,
            status: entity.status.into(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
