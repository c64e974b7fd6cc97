//! Resolution of the authenticated caller against the users table.

use domain::models::{User, UserRole};
use persistence::repositories::UserRepository;
use sqlx::PgPool;
use uuid::Uuid;

/// The users row behind a session token. The stored role is authoritative.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user: User,
}

impl Caller {
    /// `None` if the token's subject has no users row.
    pub async fn load(pool: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = UserRepository::new(pool.clone()).find_by_id(user_id).await?;
        Ok(user.map(|entity| Self { user: entity.into() }))
    }

    pub fn id(&self) -> Uuid {
        self.user.id
    }

    pub fn role(&self) -> UserRole {
        self.user.role
    }
}
