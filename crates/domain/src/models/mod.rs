//! Domain models for the club.

pub mod event;
pub mod member;
pub mod participation;
pub mod route;
pub mod user;

pub use event::{
    CreateEventRequest, CreateEventResponse, DeleteEventQuery, DeleteEventResponse, Event,
    EventAttendee, EventDetail, EventStatus, EventType, ListEventsResponse, NewEvent, Recurrence,
    UpdateEventRequest, UpdateEventResponse,
};
pub use member::{CreateMemberRequest, Member, MembershipType};
pub use participation::{
    EventParticipation, ParticipationStatus, RegistrationResponse, RegistrationState,
};
pub use route::{
    CreateRouteRequest, Difficulty, ListRoutesResponse, Route, RouteResponse, RouteSummary,
    RouteType, SearchRoutesQuery,
};
pub use user::{display_name, User, UserRole};
