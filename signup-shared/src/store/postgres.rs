use super::{StoreError, UserStore};
use crate::db::pool;
use crate::models::user::{CreateUser, User, USERNAME_UNIQUE_CONSTRAINT};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

/// [`UserStore`] backed by the PostgreSQL `users` table
///
/// Uniqueness is enforced by the `users_username_key` constraint, so the
/// insert itself is the atomic check.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, data: CreateUser) -> Result<User, StoreError> {
        let username = data.username.clone();

        User::create(&self.pool, data).await.map_err(|err| {
            if is_username_conflict(&err) {
                debug!(username = %username, "Insert rejected by unique constraint");
                StoreError::DuplicateUsername(username)
            } else {
                StoreError::Database(err)
            }
        })
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_username(&self.pool, username).await?)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(User::count(&self.pool).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(pool::health_check(&self.pool).await?)
    }
}

fn is_username_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint() == Some(USERNAME_UNIQUE_CONSTRAINT),
        _ => false,
    }
}
