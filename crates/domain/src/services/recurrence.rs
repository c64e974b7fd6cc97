//! Occurrence dates for recurring event series.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::models::Recurrence;
use shared::validation::ALLOWED_REPEAT_INTERVALS;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("Repeat interval must be 1, 2, 4 or 8 weeks, got {0}")]
    InvalidInterval(u32),

    #[error("Number of recurrences {requested} exceeds the maximum of {max}")]
    TooManyOccurrences { requested: u32, max: u32 },

    #[error("Occurrence date out of range")]
    OutOfRange,
}

/// Returns the dates of every occurrence, starting with `base`.
///
/// The k-th occurrence falls `k * interval_weeks` weeks after `base`; time of
/// day is preserved. Without a recurrence the result is just `[base]`.
pub fn occurrence_dates(
    base: DateTime<Utc>,
    recurrence: Option<Recurrence>,
    max_occurrences: u32,
) -> Result<Vec<DateTime<Utc>>, RecurrenceError> {
    let Some(recurrence) = recurrence else {
        return Ok(vec![base]);
    };

    if !ALLOWED_REPEAT_INTERVALS.contains(&recurrence.interval_weeks) {
        return Err(RecurrenceError::InvalidInterval(recurrence.interval_weeks));
    }
    if recurrence.occurrences > max_occurrences {
        return Err(RecurrenceError::TooManyOccurrences {
            requested: recurrence.occurrences,
            max: max_occurrences,
        });
    }

    (0..recurrence.occurrences.max(1))
        .map(|k| {
            let weeks = i64::from(k) * i64::from(recurrence.interval_weeks);
            base.checked_add_signed(Duration::weeks(weeks))
                .ok_or(RecurrenceError::OutOfRange)
        })
        .collect()
}
