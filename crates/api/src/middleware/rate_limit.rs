//! Per-user rate limiting for authenticated routes.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::{Clock, DefaultClock},
    DefaultKeyedRateLimiter, Quota, RateLimiter,
};
use std::num::NonZeroU32;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::UserAuth;

/// One token bucket per user id.
pub struct RateLimiterState {
    limiter: DefaultKeyedRateLimiter<Uuid>,
    clock: DefaultClock,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// Returns `None` when the limit is zero, which disables limiting.
    pub fn new(rate_limit_per_minute: u32) -> Option<Self> {
        let per_minute = NonZeroU32::new(rate_limit_per_minute)?;
        Some(Self {
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
            clock: DefaultClock::default(),
            rate_limit_per_minute,
        })
    }

    /// `Err` carries the retry delay in whole seconds, at least 1.
    pub fn check(&self, user_id: Uuid) -> Result<(), u64> {
        self.limiter.check_key(&user_id).map_err(|not_until| {
            not_until
                .wait_time_from(self.clock.now())
                .as_secs()
                .max(1)
        })
    }

    pub fn rate_limit_per_minute(&self) -> u32 {
        self.rate_limit_per_minute
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("tracked_users", &self.limiter.len())
            .finish()
    }
}

/// Must run after [`require_user_auth`](crate::middleware::require_user_auth);
/// requests without a [`UserAuth`] extension pass through untouched.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (Some(limiter), Some(auth)) = (
        state.rate_limiter.as_ref(),
        req.extensions().get::<UserAuth>(),
    ) else {
        return next.run(req).await;
    };

    if let Err(retry_after) = limiter.check(auth.user_id) {
        tracing::debug!(user_id = %auth.user_id, retry_after, "Rate limit exceeded");
        return ApiError::RateLimited {
            limit: limiter.rate_limit_per_minute(),
            retry_after,
        }
        .into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_disables_limiting() {
        assert!(RateLimiterState::new(0).is_none());
    }

    #[test]
    fn test_allows_until_quota_exhausted() {
        let state = RateLimiterState::new(3).unwrap();
        let user = Uuid::new_v4();

        for i in 0..3 {
            assert!(state.check(user).is_ok(), "request {} should pass", i);
        }
        let retry = state.check(user).unwrap_err();
        assert!(retry >= 1);
    }

    #[test]
    fn test_users_are_limited_independently() {
        let state = RateLimiterState::new(1).unwrap();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        assert!(state.check(alice).is_ok());
        assert!(state.check(alice).is_err());
        assert!(state.check(bob).is_ok());
    }

    #[test]
    fn test_debug_hides_internals() {
        let state = RateLimiterState::new(100).unwrap();
        state.check(Uuid::new_v4()).unwrap();
        let debug = format!("{:?}", state);
        assert!(debug.contains("rate_limit_per_minute: 100"));
        assert!(debug.contains("tracked_users"));
    }
}
