//! Member profile entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::MembershipType;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for membership_type that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "membership_type", rename_all = "lowercase")]
pub enum MembershipTypeDb {
    Full,
    Social,
    Junior,
}

impl From<MembershipTypeDb> for MembershipType {
    fn from(db: MembershipTypeDb) -> Self {
        match db {
            MembershipTypeDb::Full => MembershipType::Full,
            MembershipTypeDb::Social => MembershipType::Social,
            MembershipTypeDb::Junior => MembershipType::Junior,
        }
    }
}

impl From<MembershipType> for MembershipTypeDb {
    fn from(membership_type: MembershipType) -> Self {
        match membership_type {
            MembershipType::Full => MembershipTypeDb::Full,
            MembershipType::Social => MembershipTypeDb::Social,
            MembershipType::Junior => MembershipTypeDb::Junior,
        }
    }
}

/// Database row mapping for the members table.
#[derive(Debug, Clone, FromRow)]
pub struct MemberEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub membership_type: MembershipTypeDb,
    pub is_paid: bool,
    pub is_active: bool,
    pub join_date: DateTime<Utc>,
}

impl From<MemberEntity> for domain::models::Member {
    fn from(entity: MemberEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            email: entity.email,
            phone: entity.phone,
            emergency_contact: entity.emergency_contact,
            emergency_phone: entity.emergency_phone,
            membership_type: entity.membership_type.into(),
            is_paid: entity.is_paid,
            is_active: entity.is_active,
            join_date: entity.join_date,
        }
    }
}
