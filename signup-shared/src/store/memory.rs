// In-memory implementation of the UserStore port, for tests and local
// development without a database.

use super::{StoreError, UserStore};
use crate::models::user::{CreateUser, User};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug)]
struct State {
    users: HashMap<String, User>,
    next_id: i64,
}

/// [`UserStore`] keeping users in a `HashMap` keyed by username
///
/// IDs start at 1 and are never reused.
#[derive(Debug)]
pub struct InMemoryUserStore {
    inner: RwLock<State>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(State {
                users: HashMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, data: CreateUser) -> Result<User, StoreError> {
        // Check and insert under the same write guard.
        let mut state = self.inner.write().await;
        if state.users.contains_key(&data.username) {
            return Err(StoreError::DuplicateUsername(data.username));
        }

        let user = User {
            id: state.next_id,
            username: data.username,
            password_hash: data.password_hash,
            created_at: Utc::now(),
        };
        state.next_id += 1;
        state.users.insert(user.username.clone(), user.clone());

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(username).cloned())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.inner.read().await.users.len() as i64)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_user(username: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = InMemoryUserStore::new();

        let first = store.insert(new_user("alice")).await.unwrap();
        let second = store.insert(new_user("bob")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected_without_writing() {
        let store = InMemoryUserStore::new();
        store.insert(new_user("unique_username")).await.unwrap();

        let result = store.insert(new_user("unique_username")).await;

        assert!(matches!(result, Err(StoreError::DuplicateUsername(name)) if name == "unique_username"));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_usernames_are_case_sensitive() {
        let store = InMemoryUserStore::new();
        store.insert(new_user("Alice")).await.unwrap();

        assert!(store.insert(new_user("alice")).await.is_ok());
        assert!(store.find_by_username("ALICE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_username() {
        let store = InMemoryUserStore::new();
        let created = store.insert(new_user("new_username")).await.unwrap();

        let found = store.find_by_username("new_username").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.password_hash, "hash");
        assert!(store.find_by_username("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_insert_does_not_consume_an_id() {
        let store = InMemoryUserStore::new();
        store.insert(new_user("taken")).await.unwrap();
        let _ = store.insert(new_user("taken")).await;

        let next = store.insert(new_user("fresh")).await.unwrap();
        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_inserts_admit_exactly_one() {
        let store = Arc::new(InMemoryUserStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.insert(new_user("racer")).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
