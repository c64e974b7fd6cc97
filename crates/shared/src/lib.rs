//! Shared utilities and common types for the Clubhouse backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Session token verification
//! - Common validation logic

pub mod jwt;
pub mod validation;
