//! Route entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{display_name, Difficulty, RouteResponse, RouteType};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for difficulty, shared by routes and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "difficulty", rename_all = "lowercase")]
pub enum DifficultyDb {
    Easy,
    Moderate,
    Hard,
    Expert,
}

impl From<DifficultyDb> for Difficulty {
    fn from(db: DifficultyDb) -> Self {
        match db {
            DifficultyDb::Easy => Difficulty::Easy,
            DifficultyDb::Moderate => Difficulty::Moderate,
            DifficultyDb::Hard => Difficulty::Hard,
            DifficultyDb::Expert => Difficulty::Expert,
        }
    }
}

impl From<Difficulty> for DifficultyDb {
    fn from(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => DifficultyDb::Easy,
            Difficulty::Moderate => DifficultyDb::Moderate,
            Difficulty::Hard => DifficultyDb::Hard,
            Difficulty::Expert => DifficultyDb::Expert,
        }
    }
}

/// Database enum for route_type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "route_type", rename_all = "lowercase")]
pub enum RouteTypeDb {
    Road,
    Mountain,
    Gravel,
    Mixed,
}

impl From<RouteTypeDb> for RouteType {
    fn from(db: RouteTypeDb) -> Self {
        match db {
            RouteTypeDb::Road => RouteType::Road,
            RouteTypeDb::Mountain => RouteType::Mountain,
            RouteTypeDb::Gravel => RouteType::Gravel,
            RouteTypeDb::Mixed => RouteType::Mixed,
        }
    }
}

impl From<RouteType> for RouteTypeDb {
    fn from(route_type: RouteType) -> Self {
        match route_type {
            RouteType::Road => RouteTypeDb::Road,
            RouteType::Mountain => RouteTypeDb::Mountain,
            RouteType::Gravel => RouteTypeDb::Gravel,
            RouteType::Mixed => RouteTypeDb::Mixed,
        }
    }
}

/// Database row mapping for the routes table.
#[derive(Debug, Clone, FromRow)]
pub struct RouteEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub distance: f64,
    pub elevation: f64,
    pub elevation_ascent: f64,
    pub elevation_descent: f64,
    pub difficulty: DifficultyDb,
    pub route_type: RouteTypeDb,
    pub gpx_object_name: Option<String>,
    pub gpx_file_name: Option<String>,
    pub start_location: String,
    pub end_location: Option<String>,
    pub tags: Vec<String>,
    pub event_count: i32,
    pub uploaded_by: Uuid,
    pub upload_date: DateTime<Utc>,
}

impl From<RouteEntity> for domain::models::Route {
    fn from(entity: RouteEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            distance: entity.distance,
            elevation: entity.elevation,
            elevation_ascent: entity.elevation_ascent,
            elevation_descent: entity.elevation_descent,
            difficulty: entity.difficulty.into(),
            route_type: entity.route_type.into(),
            gpx_object_name: entity.gpx_object_name,
            gpx_file_name: entity.gpx_file_name,
            start_location: entity.start_location,
            end_location: entity.end_location,
            tags: entity.tags,
            event_count: entity.event_count,
            uploaded_by: entity.uploaded_by,
            upload_date: entity.upload_date,
        }
    }
}

/// Route row joined with the uploader's name sources.
#[derive(Debug, Clone, FromRow)]
pub struct RouteWithUploaderEntity {
    #[sqlx(flatten)]
    pub route: RouteEntity,
    pub uploader_first_name: Option<String>,
    pub uploader_last_name: Option<String>,
    pub uploader_email: Option<String>,
}

impl From<RouteWithUploaderEntity> for RouteResponse {
    fn from(entity: RouteWithUploaderEntity) -> Self {
        let uploader_name = display_name(
            entity.uploader_first_name.as_deref(),
            entity.uploader_last_name.as_deref(),
            entity.uploader_email.as_deref(),
        );
        Self {
            route: entity.route.into(),
            uploader_name,
        }
    }
}
