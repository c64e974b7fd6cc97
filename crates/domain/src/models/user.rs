//! User domain models and the club role hierarchy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Club role. Variants are declared lowest first so the derived ordering
/// is the role hierarchy: `Public < User < Member < Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Public,
    User,
    Member,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Public => "public",
            UserRole::User => "user",
            UserRole::Member => "member",
            UserRole::Admin => "admin",
        }
    }

    /// Returns true if this role is `required` or higher.
    pub fn is_at_least(&self, required: UserRole) -> bool {
        *self >= required
    }

    /// Returns true if this role may organize events, upload routes and register for events.
    pub fn is_member(&self) -> bool {
        self.is_at_least(UserRole::Member)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(UserRole::Public),
            "user" => Ok(UserRole::User),
            "member" => Ok(UserRole::Member),
            "admin" => Ok(UserRole::Admin),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user account as provisioned by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct User {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: UserRole,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Name shown for a user next to events and routes.
///
/// Prefers the member profile's full name, then the account email.
pub fn display_name(
    first_name: Option<&str>,
    last_name: Option<&str>,
    email: Option<&str>,
) -> String {
    match (first_name, last_name) {
        (Some(first), Some(last)) => format!("{} {}", first, last),
        _ => email
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| "Unknown".to_string()),
    }
}
