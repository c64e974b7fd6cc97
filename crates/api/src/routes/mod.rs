//! HTTP route handlers.

pub mod club_routes;
pub mod events;
pub mod health;
pub mod members;
