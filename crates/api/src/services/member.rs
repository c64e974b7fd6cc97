//! Member profiles.

use chrono::Utc;
use domain::models::member::is_active_since;
use domain::models::{CreateMemberRequest, Member, UserRole};
use persistence::repositories::MemberRepository;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::services::Caller;

#[derive(Debug, Error)]
pub enum MemberServiceError {
    #[error("Unknown user")]
    UnknownCaller,

    #[error("Account is not allowed to create a member profile")]
    Forbidden,

    #[error("Member profile not found")]
    NotFound,

    #[error("Member profile already exists")]
    AlreadyExists,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<MemberServiceError> for ApiError {
    fn from(err: MemberServiceError) -> Self {
        match err {
            MemberServiceError::UnknownCaller => ApiError::Unauthorized(err.to_string()),
            MemberServiceError::Forbidden => ApiError::Forbidden(err.to_string()),
            MemberServiceError::NotFound => ApiError::NotFound(err.to_string()),
            MemberServiceError::AlreadyExists => ApiError::BadRequest(err.to_string()),
            MemberServiceError::Database(e) => ApiError::from(e),
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[derive(Clone)]
pub struct MemberService {
    pool: PgPool,
    members: MemberRepository,
}

impl MemberService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            members: MemberRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns the caller's profile with `is_active` recomputed from the last login.
    pub async fn get_current(&self, user_id: Uuid) -> Result<Member, MemberServiceError> {
        let caller = Caller::load(&self.pool, user_id)
            .await?
            .ok_or(MemberServiceError::UnknownCaller)?;
        let mut member: Member = self
            .members
            .find_by_user_id(user_id)
            .await?
            .ok_or(MemberServiceError::NotFound)?
            .into();

        let active = is_active_since(caller.user.last_login, Utc::now());
        if active != member.is_active {
            self.members.set_active(member.id, active).await?;
            debug!(member_id = %member.id, is_active = active, "Member activity refreshed");
            member.is_active = active;
        }

        Ok(member)
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        request: &CreateMemberRequest,
    ) -> Result<Member, MemberServiceError> {
        let caller = Caller::load(&self.pool, user_id)
            .await?
            .ok_or(MemberServiceError::UnknownCaller)?;
        if !caller.role().is_at_least(UserRole::User) {
            return Err(MemberServiceError::Forbidden);
        }
        if self.members.find_by_user_id(user_id).await?.is_some() {
            return Err(MemberServiceError::AlreadyExists);
        }

        let member: Member = match self.members.create(user_id, request).await {
            Ok(entity) => entity.into(),
            Err(e) if is_unique_violation(&e) => return Err(MemberServiceError::AlreadyExists),
            Err(e) => return Err(e.into()),
        };

        info!(member_id = %member.id, user_id = %user_id, "Member profile created");
        Ok(member)
    }
}
