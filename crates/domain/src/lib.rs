//! Domain layer for the clubhouse backend.
//!
//! This crate contains:
//! - Domain models (User, Member, Route, Event, registrations)
//! - Business rules (recurrence, waiting list, route counts, authorization)
//! - Domain error types

pub mod models;
pub mod services;
