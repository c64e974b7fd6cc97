//! Route library: registration of uploaded GPX routes, lookup and search.

use domain::models::{CreateRouteRequest, ListRoutesResponse, RouteResponse, SearchRoutesQuery};
use domain::services::can_participate;
use persistence::repositories::RouteRepository;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::services::Caller;

#[derive(Debug, Error)]
pub enum RouteServiceError {
    #[error("Unknown user")]
    UnknownCaller,

    #[error("Only club members can upload routes")]
    Forbidden,

    #[error("Route not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<RouteServiceError> for ApiError {
    fn from(err: RouteServiceError) -> Self {
        match err {
            RouteServiceError::UnknownCaller => ApiError::Unauthorized(err.to_string()),
            RouteServiceError::Forbidden => ApiError::Forbidden(err.to_string()),
            RouteServiceError::NotFound => ApiError::NotFound(err.to_string()),
            RouteServiceError::Database(e) => ApiError::from(e),
        }
    }
}

#[derive(Clone)]
pub struct RouteService {
    pool: PgPool,
    routes: RouteRepository,
}

impl RouteService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            routes: RouteRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn create(
        &self,
        uploader_id: Uuid,
        request: &CreateRouteRequest,
    ) -> Result<RouteResponse, RouteServiceError> {
        let caller = Caller::load(&self.pool, uploader_id)
            .await?
            .ok_or(RouteServiceError::UnknownCaller)?;
        if !can_participate(caller.role()) {
            return Err(RouteServiceError::Forbidden);
        }

        let created = self.routes.create(uploader_id, request).await?;
        info!(route_id = %created.id, uploaded_by = %uploader_id, "Route created");

        self.get(created.id).await
    }

    pub async fn get(&self, route_id: Uuid) -> Result<RouteResponse, RouteServiceError> {
        self.routes
            .find_by_id(route_id)
            .await?
            .map(RouteResponse::from)
            .ok_or(RouteServiceError::NotFound)
    }

    pub async fn list(&self) -> Result<ListRoutesResponse, RouteServiceError> {
        let data: Vec<RouteResponse> = self
            .routes
            .list()
            .await?
            .into_iter()
            .map(RouteResponse::from)
            .collect();
        Ok(ListRoutesResponse {
            count: data.len(),
            data,
        })
    }

    pub async fn search(
        &self,
        query: &SearchRoutesQuery,
    ) -> Result<ListRoutesResponse, RouteServiceError> {
        let data: Vec<RouteResponse> = self
            .routes
            .search(query)
            .await?
            .into_iter()
            .map(RouteResponse::from)
            .collect();
        Ok(ListRoutesResponse {
            count: data.len(),
            data,
        })
    }
}
