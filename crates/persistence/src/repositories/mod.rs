//! Repository implementations for database operations.

pub mod event;
pub mod member;
pub mod registration;
pub mod route;
pub mod user;

pub use event::{EventRepository, UpdatedEvent};
pub use member::MemberRepository;
pub use registration::{RegistrationRepository, RosterError};
pub use route::RouteRepository;
pub use user::UserRepository;
