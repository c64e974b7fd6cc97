//! Event domain models.
//!
//! Dates travel over the wire as epoch milliseconds. Recurring events created
//! together share title, organizer, start time, meeting point and route; the
//! event repository uses that tuple to find later occurrences of a series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidateUrl};

use super::route::{Difficulty, RouteSummary};

/// Kind of club event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    GroupRide,
    Training,
    Race,
    Social,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::GroupRide => "group_ride",
            EventType::Training => "training",
            EventType::Race => "race",
            EventType::Social => "social",
        }
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "group_ride" => Ok(EventType::GroupRide),
            "training" => Ok(EventType::Training),
            "race" => Ok(EventType::Race),
            "social" => Ok(EventType::Social),
            _ => Err(format!("Invalid event type: {}", s)),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Scheduled,
    Cancelled,
    Completed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Scheduled => "scheduled",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Completed => "completed",
        }
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scheduled" => Ok(EventStatus::Scheduled),
            "cancelled" => Ok(EventStatus::Cancelled),
            "completed" => Ok(EventStatus::Completed),
            _ => Err(format!("Invalid event status: {}", s)),
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scheduled club event (without its roster).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub duration: Option<i32>,
    pub route_id: Option<Uuid>,
    pub meeting_point: String,
    pub max_participants: Option<i32>,
    pub difficulty: Difficulty,
    pub event_type: EventType,
    pub external_url: Option<String>,
    pub organizer_id: Uuid,
    pub status: EventStatus,
    pub weather_conditions: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field values for inserting one or more events; the date is supplied per occurrence.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub start_time: String,
    pub duration: Option<i32>,
    pub route_id: Option<Uuid>,
    pub meeting_point: String,
    pub max_participants: Option<i32>,
    pub difficulty: Difficulty,
    pub event_type: EventType,
    pub external_url: Option<String>,
    pub organizer_id: Uuid,
}

/// Recurrence requested at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recurrence {
    pub interval_weeks: u32,
    pub occurrences: u32,
}

/// Request payload for creating an event or a recurring series.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,

    #[validate(custom(function = "shared::validation::validate_start_time"))]
    pub start_time: String,

    #[validate(range(min = 1, max = 1440, message = "Duration must be between 1 and 1440 minutes"))]
    pub duration: Option<i32>,

    pub route_id: Option<Uuid>,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    #[validate(length(max = 200, message = "Meeting point must be at most 200 characters"))]
    pub meeting_point: String,

    #[validate(range(min = 1, max = 1000, message = "Max participants must be between 1 and 1000"))]
    pub max_participants: Option<i32>,

    pub difficulty: Difficulty,

    pub event_type: EventType,

    #[validate(url(message = "External link must be a valid URL"))]
    pub external_url: Option<String>,

    #[validate(custom(function = "shared::validation::validate_repeat_interval"))]
    pub repeat_interval: Option<u32>,

    pub number_of_recurrences: Option<u32>,
}

impl CreateEventRequest {
    /// Returns the requested recurrence, or `None` for a single event.
    ///
    /// Both the interval and more than one occurrence are needed for a series.
    pub fn recurrence(&self) -> Option<Recurrence> {
        match (self.repeat_interval, self.number_of_recurrences) {
            (Some(interval_weeks), Some(occurrences)) if occurrences > 1 => Some(Recurrence {
                interval_weeks,
                occurrences,
            }),
            _ => None,
        }
    }

    pub fn to_new_event(&self, organizer_id: Uuid) -> NewEvent {
        NewEvent {
            title: self.title.clone(),
            description: self.description.clone(),
            start_time: self.start_time.clone(),
            duration: self.duration,
            route_id: self.route_id,
            meeting_point: self.meeting_point.clone(),
            max_participants: self.max_participants,
            difficulty: self.difficulty,
            event_type: self.event_type,
            external_url: self.external_url.clone(),
            organizer_id,
        }
    }
}

/// Deserializes a present field (including an explicit `null`) as `Some(..)`.
///
/// Combined with `#[serde(default)]` this distinguishes an absent field
/// (`None`) from a cleared one (`Some(None)`).
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Partial update of an event. Absent fields are left unchanged; an explicit
/// `null` clears a nullable field.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "deserialize_present")]
    pub description: Option<Option<String>>,

    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub date: Option<DateTime<Utc>>,

    #[validate(custom(function = "shared::validation::validate_start_time"))]
    pub start_time: Option<String>,

    #[serde(default, deserialize_with = "deserialize_present")]
    pub duration: Option<Option<i32>>,

    #[serde(default, deserialize_with = "deserialize_present")]
    pub route_id: Option<Option<Uuid>>,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    #[validate(length(max = 200, message = "Meeting point must be at most 200 characters"))]
    pub meeting_point: Option<String>,

    #[serde(default, deserialize_with = "deserialize_present")]
    pub max_participants: Option<Option<i32>>,

    pub difficulty: Option<Difficulty>,

    pub event_type: Option<EventType>,

    #[serde(default, deserialize_with = "deserialize_present")]
    pub external_url: Option<Option<String>>,

    pub status: Option<EventStatus>,

    #[serde(default, deserialize_with = "deserialize_present")]
    pub weather_conditions: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_present")]
    pub notes: Option<Option<String>>,
}

impl UpdateEventRequest {
    /// Returns `(old, new)` route ids if the patch moves the event to another route.
    pub fn route_change(&self, current: Option<Uuid>) -> Option<(Option<Uuid>, Option<Uuid>)> {
        match self.route_id {
            Some(new) if new != current => Some((current, new)),
            _ => None,
        }
    }

    /// Checks values nested inside the tri-state fields, with the same rules
    /// as [`CreateEventRequest`].
    pub fn validate_nested(&self) -> Result<(), String> {
        if let Some(Some(description)) = &self.description {
            if description.chars().count() > 2000 {
                return Err("Description must be at most 2000 characters".to_string());
            }
        }
        if let Some(Some(duration)) = self.duration {
            if !(1..=1440).contains(&duration) {
                return Err("Duration must be between 1 and 1440 minutes".to_string());
            }
        }
        if let Some(Some(max)) = self.max_participants {
            if !(1..=1000).contains(&max) {
                return Err("Max participants must be between 1 and 1000".to_string());
            }
        }
        if let Some(Some(url)) = &self.external_url {
            if !url.validate_url() {
                return Err("External link must be a valid URL".to_string());
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.start_time.is_none()
            && self.duration.is_none()
            && self.route_id.is_none()
            && self.meeting_point.is_none()
            && self.max_participants.is_none()
            && self.difficulty.is_none()
            && self.event_type.is_none()
            && self.external_url.is_none()
            && self.status.is_none()
            && self.weather_conditions.is_none()
            && self.notes.is_none()
    }
}

/// Query parameters for deleting an event.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct DeleteEventQuery {
    #[serde(default)]
    pub delete_future_events: bool,
}

/// Response for event creation: a single id or the ids of a whole series.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum CreateEventResponse {
    Single { event_id: Uuid },
    Series { event_ids: Vec<Uuid>, count: usize },
}

/// Response for event updates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateEventResponse {
    pub event_id: Uuid,
}

/// Response for event deletion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DeleteEventResponse {
    pub success: bool,
    pub deleted_count: u64,
}

/// A user on an event roster.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct EventAttendee {
    pub user_id: Uuid,
    pub name: String,
}

/// Event with organizer, route summary and roster, as shown to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub organizer_name: String,
    pub route: Option<RouteSummary>,
    pub participants: Vec<EventAttendee>,
    pub waiting_list: Vec<EventAttendee>,
    pub participant_count: usize,
    pub waiting_list_count: usize,
}

/// Response for listing events.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListEventsResponse {
    pub data: Vec<EventDetail>,
    pub count: usize,
}
