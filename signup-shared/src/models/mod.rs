/// Database models for signup
///
/// # Models
///
/// - `user`: Registered user accounts
///
/// # Example
///
/// ```no_run
/// use signup_shared::models::user::{User, CreateUser};
/// use signup_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     username: "new_username".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod user;
