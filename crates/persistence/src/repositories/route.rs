//! Route repository for database operations.
//!
//! `adjust_event_count` is the only writer of `routes.event_count`; callers run
//! it on their own transaction so the count moves together with the events.

use domain::models::{CreateRouteRequest, SearchRoutesQuery};
use domain::services::RouteCountDelta;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::{DifficultyDb, RouteEntity, RouteTypeDb, RouteWithUploaderEntity};
use crate::metrics::QueryTimer;

const ROUTE_WITH_UPLOADER_SELECT: &str = r#"
    SELECT r.id, r.name, r.description, r.distance, r.elevation, r.elevation_ascent,
           r.elevation_descent, r.difficulty, r.route_type, r.gpx_object_name, r.gpx_file_name,
           r.start_location, r.end_location, r.tags, r.event_count, r.uploaded_by, r.upload_date,
           m.first_name AS uploader_first_name,
           m.last_name AS uploader_last_name,
           u.email AS uploader_email
    FROM routes r
    LEFT JOIN users u ON u.id = r.uploaded_by
    LEFT JOIN members m ON m.user_id = r.uploaded_by
"#;

/// Repository for route database operations.
#[derive(Clone)]
pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    /// Creates a new RouteRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a route with `event_count = 0`.
    pub async fn create(
        &self,
        uploaded_by: Uuid,
        request: &CreateRouteRequest,
    ) -> Result<RouteEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_route");
        let result = sqlx::query_as::<_, RouteEntity>(
            r#"
            INSERT INTO routes (name, description, distance, elevation, elevation_ascent,
                                elevation_descent, difficulty, route_type, gpx_object_name,
                                gpx_file_name, start_location, end_location, tags, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id, name, description, distance, elevation, elevation_ascent,
                      elevation_descent, difficulty, route_type, gpx_object_name, gpx_file_name,
                      start_location, end_location, tags, event_count, uploaded_by, upload_date
            "#,
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.distance)
        .bind(request.elevation)
        .bind(request.resolved_ascent())
        .bind(request.resolved_descent())
        .bind(DifficultyDb::from(request.difficulty))
        .bind(RouteTypeDb::from(request.route_type))
        .bind(&request.gpx_object_name)
        .bind(&request.gpx_file_name)
        .bind(&request.start_location)
        .bind(&request.end_location)
        .bind(&request.tags)
        .bind(uploaded_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a route by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RouteWithUploaderEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_route_by_id");
        let query = format!("{} WHERE r.id = $1", ROUTE_WITH_UPLOADER_SELECT);
        let result = sqlx::query_as::<_, RouteWithUploaderEntity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("route_exists");
        let result = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM routes WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List all routes, newest upload first.
    pub async fn list(&self) -> Result<Vec<RouteWithUploaderEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_routes");
        let query = format!("{} ORDER BY r.upload_date DESC", ROUTE_WITH_UPLOADER_SELECT);
        let result = sqlx::query_as::<_, RouteWithUploaderEntity>(&query)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Search routes by case-insensitive name fragment, difficulty and type.
    pub async fn search(
        &self,
        query: &SearchRoutesQuery,
    ) -> Result<Vec<RouteWithUploaderEntity>, sqlx::Error> {
        let timer = QueryTimer::new("search_routes");
        let sql = format!(
            r#"{}
            WHERE ($1::TEXT IS NULL OR r.name ILIKE '%' || $1 || '%')
              AND ($2::difficulty IS NULL OR r.difficulty = $2)
              AND ($3::route_type IS NULL OR r.route_type = $3)
            ORDER BY r.upload_date DESC
            "#,
            ROUTE_WITH_UPLOADER_SELECT
        );
        let search_term = query
            .search_term
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty());
        let result = sqlx::query_as::<_, RouteWithUploaderEntity>(&sql)
            .bind(search_term)
            .bind(query.difficulty.map(DifficultyDb::from))
            .bind(query.route_type.map(RouteTypeDb::from))
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Shift a route's cached event count by `delta`. No-op without a route.
    pub async fn adjust_event_count(
        conn: &mut PgConnection,
        route_id: Option<Uuid>,
        delta: i32,
    ) -> Result<(), sqlx::Error> {
        let Some(route_id) = route_id else {
            return Ok(());
        };
        if delta == 0 {
            return Ok(());
        }

        let timer = QueryTimer::new("adjust_route_event_count");
        let result = sqlx::query(
            r#"
            UPDATE routes
            SET event_count = event_count + $2
            WHERE id = $1
            "#,
        )
        .bind(route_id)
        .bind(delta)
        .execute(conn)
        .await;
        timer.record();
        result.map(|_| ())
    }

    /// Apply a batch of per-route deltas, one statement per route.
    pub async fn apply_event_count_deltas(
        conn: &mut PgConnection,
        deltas: &[RouteCountDelta],
    ) -> Result<(), sqlx::Error> {
        for delta in deltas {
            Self::adjust_event_count(&mut *conn, Some(delta.route_id), delta.delta).await?;
        }
        Ok(())
    }
}
