//! Registration state and participation audit records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Where a user stands for a given event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationState {
    None,
    Participant,
    Waiting,
}

impl RegistrationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationState::None => "none",
            RegistrationState::Participant => "participant",
            RegistrationState::Waiting => "waiting",
        }
    }

    pub fn is_registered(&self) -> bool {
        !matches!(self, RegistrationState::None)
    }
}

impl fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status recorded on the participation audit row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipationStatus {
    Registered,
}

/// Audit trail entry for a user's registration on an event.
///
/// Not authoritative for capacity; the event roster is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EventParticipation {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: ParticipationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response for join and leave requests.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RegistrationResponse {
    pub event_id: Uuid,
    /// The caller's state after the operation.
    pub status: RegistrationState,
    /// User moved from the waiting list into the participants, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promoted_user_id: Option<Uuid>,
}
