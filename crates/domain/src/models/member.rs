//! Member profile domain models.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// A member counts as active when they logged in within this many days.
pub const ACTIVE_WINDOW_DAYS: i64 = 30;

/// Type of club membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipType {
    Full,
    Social,
    Junior,
}

impl MembershipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipType::Full => "full",
            MembershipType::Social => "social",
            MembershipType::Junior => "junior",
        }
    }
}

impl FromStr for MembershipType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(MembershipType::Full),
            "social" => Ok(MembershipType::Social),
            "junior" => Ok(MembershipType::Junior),
            _ => Err(format!("Invalid membership type: {}", s)),
        }
    }
}

impl fmt::Display for MembershipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Member profile attached 1:1 to a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Member {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub membership_type: MembershipType,
    pub is_paid: bool,
    pub is_active: bool,
    pub join_date: DateTime<Utc>,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Derives the `is_active` flag from the owning user's last login.
pub fn is_active_since(last_login: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match last_login {
        Some(login) => login >= now - Duration::days(ACTIVE_WINDOW_DAYS),
        None => false,
    }
}

/// Request payload for creating the caller's member profile.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateMemberRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name must be between 1 and 100 characters"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub phone: Option<String>,

    #[validate(length(max = 100, message = "Emergency contact must be at most 100 characters"))]
    pub emergency_contact: Option<String>,

    #[validate(length(max = 32, message = "Emergency phone must be at most 32 characters"))]
    pub emergency_phone: Option<String>,

    pub membership_type: MembershipType,
}
