/// User store port and adapters
///
/// Registration codes against [`UserStore`] instead of a concrete database so
/// the HTTP layer can run on PostgreSQL in production and in memory in tests
/// and local development.
///
/// # Adapters
///
/// - [`PgUserStore`]: PostgreSQL via the `users` table
/// - [`InMemoryUserStore`]: `HashMap` behind a `tokio::sync::RwLock`
///
/// Both adapters make [`UserStore::insert`] an atomic insert-if-absent on
/// `username`, so two concurrent registrations for the same name can never
/// both succeed.
///
/// # Example
///
/// ```
/// use signup_shared::models::user::CreateUser;
/// use signup_shared::store::{InMemoryUserStore, StoreError, UserStore};
///
/// # async fn example() -> Result<(), StoreError> {
/// let store = InMemoryUserStore::new();
///
/// let user = store
///     .insert(CreateUser {
///         username: "new_username".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     })
///     .await?;
/// assert_eq!(user.id, 1);
/// # Ok(())
/// # }
/// ```

mod memory;
mod postgres;

pub use memory::InMemoryUserStore;
pub use postgres::PgUserStore;

use crate::models::user::{CreateUser, User};
use async_trait::async_trait;

/// Errors surfaced by a [`UserStore`]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Another user already owns this username
    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence interface for user records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user, assigning its ID
    ///
    /// Fails with [`StoreError::DuplicateUsername`] without writing anything
    /// when the username is already taken.
    async fn insert(&self, data: CreateUser) -> Result<User, StoreError>;

    /// Looks up a user by exact (case-sensitive) username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Number of stored users
    async fn count(&self) -> Result<i64, StoreError>;

    /// Verifies the backing store is reachable
    async fn health_check(&self) -> Result<(), StoreError>;
}
