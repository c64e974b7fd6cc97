//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref START_TIME_RE: Regex = Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap();
}

/// Week intervals accepted for recurring events.
pub const ALLOWED_REPEAT_INTERVALS: [u32; 4] = [1, 2, 4, 8];

/// Validates a free-text start time in 24h `HH:MM` form.
pub fn validate_start_time(value: &str) -> Result<(), ValidationError> {
    if START_TIME_RE.is_match(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("start_time_format");
        err.message = Some("Start time must be in HH:MM format".into());
        Err(err)
    }
}

/// Validates a recurrence interval in weeks.
pub fn validate_repeat_interval(weeks: u32) -> Result<(), ValidationError> {
    if ALLOWED_REPEAT_INTERVALS.contains(&weeks) {
        Ok(())
    } else {
        let mut err = ValidationError::new("repeat_interval");
        err.message = Some("Repeat interval must be 1, 2, 4 or 8 weeks".into());
        Err(err)
    }
}

/// Validates that a string is not blank after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that a numeric measurement (distance, elevation) is non-negative.
pub fn validate_non_negative(value: f64) -> Result<(), ValidationError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("Value must be a non-negative number".into());
        Err(err)
    }
}
