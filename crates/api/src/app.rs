use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_user_auth,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{club_routes, events, health, members};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

/// Builds the router. Fails only if the session secret is unusable.
pub fn create_app(config: Config, pool: PgPool) -> Result<Router, JwtError> {
    let config = Arc::new(config);
    let jwt = Arc::new(JwtConfig::new(
        &config.session.secret,
        config.session.token_expiry_secs,
        config.session.leeway_secs,
    )?);

    let state = AppState {
        pool,
        config: config.clone(),
        jwt,
        rate_limiter: RateLimiterState::new(config.security.rate_limit_per_minute).map(Arc::new),
    };

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Session token required. Auth runs first (outermost), then rate limiting.
    let protected_routes = Router::new()
        .route("/api/v1/events", post(events::create_event))
        .route(
            "/api/v1/events/:event_id",
            patch(events::update_event).delete(events::delete_event),
        )
        .route("/api/v1/events/:event_id/join", post(events::join_event))
        .route("/api/v1/events/:event_id/leave", post(events::leave_event))
        .route(
            "/api/v1/events/:event_id/registration",
            get(events::get_registration),
        )
        .route("/api/v1/routes", post(club_routes::create_route))
        .route("/api/v1/members", post(members::create_member))
        .route("/api/v1/members/me", get(members::get_current_member))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user_auth));

    let public_routes = Router::new()
        .route("/api/v1/events", get(events::list_events))
        .route("/api/v1/events/upcoming", get(events::list_upcoming_events))
        .route("/api/v1/events/:event_id", get(events::get_event))
        .route("/api/v1/routes", get(club_routes::list_routes))
        .route("/api/v1/routes/search", get(club_routes::search_routes))
        .route("/api/v1/routes/:route_id", get(club_routes::get_route))
        .route(
            "/api/v1/routes/:route_id/events",
            get(events::list_route_events),
        );

    let ops_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Ok(Router::new()
        .merge(ops_routes)
        .merge(public_routes)
        .merge(protected_routes)
        // Bottom layers run first.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(config.server.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state))
}
