//! Member profile repository for database operations.

use domain::models::CreateMemberRequest;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{MemberEntity, MembershipTypeDb};
use crate::metrics::QueryTimer;

/// Repository for member profile database operations.
#[derive(Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    /// Creates a new MemberRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the member profile belonging to a user.
    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<MemberEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_member_by_user_id");
        let result = sqlx::query_as::<_, MemberEntity>(
            r#"
            SELECT id, user_id, first_name, last_name, email, phone, emergency_contact,
                   emergency_phone, membership_type, is_paid, is_active, join_date
            FROM members
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a member profile. Fails with a unique violation if one already exists.
    pub async fn create(
        &self,
        user_id: Uuid,
        request: &CreateMemberRequest,
    ) -> Result<MemberEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_member");
        let result = sqlx::query_as::<_, MemberEntity>(
            r#"
            INSERT INTO members (user_id, first_name, last_name, email, phone,
                                 emergency_contact, emergency_phone, membership_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, first_name, last_name, email, phone, emergency_contact,
                      emergency_phone, membership_type, is_paid, is_active, join_date
            "#,
        )
        .bind(user_id)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.emergency_contact)
        .bind(&request.emergency_phone)
        .bind(MembershipTypeDb::from(request.membership_type))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Persist a recomputed `is_active` flag.
    pub async fn set_active(&self, member_id: Uuid, is_active: bool) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("set_member_active");
        let result = sqlx::query(
            r#"
            UPDATE members
            SET is_active = $2
            WHERE id = $1
            "#,
        )
        .bind(member_id)
        .bind(is_active)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|_| ())
    }
}
