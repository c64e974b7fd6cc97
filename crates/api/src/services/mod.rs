//! Application services: authorization, orchestration and logging around
//! the repositories.

pub mod caller;
pub mod event;
pub mod member;
pub mod registration;
pub mod route;

pub use caller::Caller;
pub use event::{EventService, EventServiceError};
pub use member::{MemberService, MemberServiceError};
pub use registration::{RegistrationService, RegistrationServiceError};
pub use route::{RouteService, RouteServiceError};
