//! Pure domain logic: recurrence, registration and route counts.
//!
//! Nothing here touches storage; the persistence layer runs these
//! decisions inside its transactions.

pub mod authorization;
pub mod recurrence;
pub mod registration;
pub mod route_count;

pub use authorization::{can_manage_event, can_participate};
pub use recurrence::{occurrence_dates, RecurrenceError};
pub use registration::{check_is_registered, LeavePlan, RegistrationError, Roster};
pub use route_count::RouteCountDelta;
