//! Route domain models.
//!
//! A route is a named cycling track. The GPX bytes live in an external
//! object store; only the opaque object name is kept here. `event_count` is
//! a cached aggregate of the events referencing the route.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Difficulty rating shared by routes and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Moderate => "moderate",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "moderate" => Ok(Difficulty::Moderate),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            _ => Err(format!("Invalid difficulty: {}", s)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Surface the route is ridden on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteType {
    Road,
    Mountain,
    Gravel,
    Mixed,
}

impl RouteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteType::Road => "road",
            RouteType::Mountain => "mountain",
            RouteType::Gravel => "gravel",
            RouteType::Mixed => "mixed",
        }
    }
}

impl FromStr for RouteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "road" => Ok(RouteType::Road),
            "mountain" => Ok(RouteType::Mountain),
            "gravel" => Ok(RouteType::Gravel),
            "mixed" => Ok(RouteType::Mixed),
            _ => Err(format!("Invalid route type: {}", s)),
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Route {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub distance: f64,
    pub elevation: f64,
    pub elevation_ascent: f64,
    pub elevation_descent: f64,
    pub difficulty: Difficulty,
    pub route_type: RouteType,
    pub gpx_object_name: Option<String>,
    pub gpx_file_name: Option<String>,
    pub start_location: String,
    pub end_location: Option<String>,
    pub tags: Vec<String>,
    pub event_count: i32,
    pub uploaded_by: Uuid,
    pub upload_date: DateTime<Utc>,
}

/// Compact route info embedded in event listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct RouteSummary {
    pub id: Uuid,
    pub name: String,
    pub distance: f64,
    pub difficulty: Difficulty,
}

/// Route as returned by the API, with the uploader's display name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RouteResponse {
    #[serde(flatten)]
    pub route: Route,
    pub uploader_name: String,
}

/// Request payload for registering a route whose GPX has already been uploaded.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateRouteRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "shared::validation::validate_non_negative"))]
    pub distance: f64,

    #[validate(custom(function = "shared::validation::validate_non_negative"))]
    pub elevation: f64,

    pub elevation_ascent: Option<f64>,

    pub elevation_descent: Option<f64>,

    pub difficulty: Difficulty,

    pub route_type: RouteType,

    #[validate(length(min = 1, max = 512, message = "GPX object name must be between 1 and 512 characters"))]
    pub gpx_object_name: Option<String>,

    #[validate(length(max = 255, message = "GPX file name must be at most 255 characters"))]
    pub gpx_file_name: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Start location must be between 1 and 200 characters"))]
    pub start_location: String,

    #[validate(length(max = 200, message = "End location must be at most 200 characters"))]
    pub end_location: Option<String>,

    #[serde(default)]
    #[validate(length(max = 20, message = "At most 20 tags are allowed"))]
    pub tags: Vec<String>,
}

impl CreateRouteRequest {
    /// Ascent defaults to the total elevation gain when not supplied.
    pub fn resolved_ascent(&self) -> f64 {
        self.elevation_ascent.unwrap_or(self.elevation)
    }

    pub fn resolved_descent(&self) -> f64 {
        self.elevation_descent.unwrap_or(0.0)
    }
}

/// Query parameters for searching routes.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct SearchRoutesQuery {
    pub search_term: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub route_type: Option<RouteType>,
}

/// Response for listing routes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListRoutesResponse {
    pub data: Vec<RouteResponse>,
    pub count: usize,
}
