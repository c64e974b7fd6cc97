//! Registration state machine for a single event.
//!
//! A [`Roster`] is a snapshot of an event's participants and waiting list.
//! `plan_*` methods decide what a join, leave or capacity change does
//! without mutating; the persistence layer executes the plan while holding
//! the event row lock.

use thiserror::Error;
use uuid::Uuid;

use crate::models::RegistrationState;

/// Invalid registration transitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Already registered for this event")]
    AlreadyRegistered,

    #[error("Not registered for this event")]
    NotRegistered,
}

/// Effect of a successful leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeavePlan {
    /// Which list the user was removed from.
    pub left_from: RegistrationState,
    /// Head of the waiting list moved into the participants, if any.
    pub promoted: Option<Uuid>,
}

/// Participants and waiting list of one event, both in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    pub participants: Vec<Uuid>,
    pub waiting_list: Vec<Uuid>,
    pub max_participants: Option<i32>,
}

impl Roster {
    pub fn new(max_participants: Option<i32>) -> Self {
        Self {
            participants: Vec::new(),
            waiting_list: Vec::new(),
            max_participants,
        }
    }

    pub fn state_of(&self, user_id: Uuid) -> RegistrationState {
        if self.participants.contains(&user_id) {
            RegistrationState::Participant
        } else if self.waiting_list.contains(&user_id) {
            RegistrationState::Waiting
        } else {
            RegistrationState::None
        }
    }

    /// True while another participant fits. No limit means unlimited.
    pub fn has_capacity(&self) -> bool {
        match self.max_participants {
            Some(max) => (self.participants.len() as i64) < i64::from(max),
            None => true,
        }
    }

    /// Decides where a joining user lands.
    pub fn plan_join(&self, user_id: Uuid) -> Result<RegistrationState, RegistrationError> {
        if check_is_registered(self, user_id) {
            return Err(RegistrationError::AlreadyRegistered);
        }
        if self.has_capacity() {
            Ok(RegistrationState::Participant)
        } else {
            Ok(RegistrationState::Waiting)
        }
    }

    /// Decides what a leave removes and whom it promotes.
    ///
    /// Only a departing participant frees a seat; leaving the waiting list
    /// never promotes anyone. After a capacity cut the seat is only handed on
    /// once the participants are back under the limit.
    pub fn plan_leave(&self, user_id: Uuid) -> Result<LeavePlan, RegistrationError> {
        match self.state_of(user_id) {
            RegistrationState::None => Err(RegistrationError::NotRegistered),
            RegistrationState::Participant => {
                let remaining = self.participants.len().saturating_sub(1);
                let seat_free = match self.max_participants {
                    Some(max) => (remaining as i64) < i64::from(max),
                    None => true,
                };
                Ok(LeavePlan {
                    left_from: RegistrationState::Participant,
                    promoted: self.waiting_list.first().copied().filter(|_| seat_free),
                })
            }
            RegistrationState::Waiting => Ok(LeavePlan {
                left_from: RegistrationState::Waiting,
                promoted: None,
            }),
        }
    }

    /// Waiting users who move up after the capacity was raised or removed,
    /// head of the list first.
    ///
    /// Lowering the capacity never demotes anyone; the surplus drains as
    /// participants leave.
    pub fn plan_capacity_change(&self) -> Vec<Uuid> {
        let free = match self.max_participants {
            Some(max) => usize::try_from(max)
                .unwrap_or(0)
                .saturating_sub(self.participants.len()),
            None => self.waiting_list.len(),
        };
        self.waiting_list.iter().take(free).copied().collect()
    }
}

/// Returns true if the user is a participant or on the waiting list.
pub fn check_is_registered(roster: &Roster, user_id: Uuid) -> bool {
    roster.state_of(user_id).is_registered()
}
