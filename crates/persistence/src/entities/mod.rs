//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod event;
pub mod member;
pub mod registration;
pub mod route;
pub mod user;

pub use event::{
    DeletedEventEntity, EventEntity, EventStatusDb, EventTypeDb, EventWithRelationsEntity,
};
pub use member::{MemberEntity, MembershipTypeDb};
pub use registration::{
    EventParticipationEntity, ParticipationStatusDb, RegistrationEntity, RegistrationStateDb,
};
pub use route::{DifficultyDb, RouteEntity, RouteTypeDb, RouteWithUploaderEntity};
pub use user::{UserEntity, UserRoleDb};
