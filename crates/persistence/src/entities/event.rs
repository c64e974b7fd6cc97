//! Event entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{display_name, EventStatus, EventType, RouteSummary};
use sqlx::FromRow;
use uuid::Uuid;

use super::route::DifficultyDb;

/// Database enum for event_type that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "event_type", rename_all = "snake_case")]
pub enum EventTypeDb {
    GroupRide,
    Training,
    Race,
    Social,
}

impl From<EventTypeDb> for EventType {
    fn from(db: EventTypeDb) -> Self {
        match db {
            EventTypeDb::GroupRide => EventType::GroupRide,
            EventTypeDb::Training => EventType::Training,
            EventTypeDb::Race => EventType::Race,
            EventTypeDb::Social => EventType::Social,
        }
    }
}

impl From<EventType> for EventTypeDb {
    fn from(event_type: EventType) -> Self {
        match event_type {
            EventType::GroupRide => EventTypeDb::GroupRide,
            EventType::Training => EventTypeDb::Training,
            EventType::Race => EventTypeDb::Race,
            EventType::Social => EventTypeDb::Social,
        }
    }
}

/// Database enum for event_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "lowercase")]
pub enum EventStatusDb {
    Scheduled,
    Cancelled,
    Completed,
}

impl From<EventStatusDb> for EventStatus {
    fn from(db: EventStatusDb) -> Self {
        match db {
            EventStatusDb::Scheduled => EventStatus::Scheduled,
            EventStatusDb::Cancelled => EventStatus::Cancelled,
            EventStatusDb::Completed => EventStatus::Completed,
        }
    }
}

impl From<EventStatus> for EventStatusDb {
    fn from(status: EventStatus) -> Self {
        match status {
            EventStatus::Scheduled => EventStatusDb::Scheduled,
            EventStatus::Cancelled => EventStatusDb::Cancelled,
            EventStatus::Completed => EventStatusDb::Completed,
        }
    }
}

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub duration: Option<i32>,
    pub route_id: Option<Uuid>,
    pub meeting_point: String,
    pub max_participants: Option<i32>,
    pub difficulty: DifficultyDb,
    pub event_type: EventTypeDb,
    pub external_url: Option<String>,
    pub organizer_id: Uuid,
    pub status: EventStatusDb,
    pub weather_conditions: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventEntity> for domain::models::Event {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            date: entity.date,
            start_time: entity.start_time,
            duration: entity.duration,
            route_id: entity.route_id,
            meeting_point: entity.meeting_point,
            max_participants: entity.max_participants,
            difficulty: entity.difficulty.into(),
            event_type: entity.event_type.into(),
            external_url: entity.external_url,
            organizer_id: entity.organizer_id,
            status: entity.status.into(),
            weather_conditions: entity.weather_conditions,
            notes: entity.notes,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Event row joined with its route summary and the organizer's name sources.
#[derive(Debug, Clone, FromRow)]
pub struct EventWithRelationsEntity {
    #[sqlx(flatten)]
    pub event: EventEntity,
    pub route_name: Option<String>,
    pub route_distance: Option<f64>,
    pub route_difficulty: Option<DifficultyDb>,
    pub organizer_first_name: Option<String>,
    pub organizer_last_name: Option<String>,
    pub organizer_email: Option<String>,
}

impl EventWithRelationsEntity {
    pub fn organizer_name(&self) -> String {
        display_name(
            self.organizer_first_name.as_deref(),
            self.organizer_last_name.as_deref(),
            self.organizer_email.as_deref(),
        )
    }

    pub fn route_summary(&self) -> Option<RouteSummary> {
        match (
            self.event.route_id,
            &self.route_name,
            self.route_distance,
            self.route_difficulty,
        ) {
            (Some(id), Some(name), Some(distance), Some(difficulty)) => Some(RouteSummary {
                id,
                name: name.clone(),
                distance,
                difficulty: difficulty.into(),
            }),
            _ => None,
        }
    }
}

/// Route reference of a deleted event row.
#[derive(Debug, Clone, FromRow)]
pub struct DeletedEventEntity {
    pub id: Uuid,
    pub route_id: Option<Uuid>,
}
