/// Common test utilities for integration tests
///
/// Each `TestContext` owns a fresh in-memory user store, so tests start from
/// an empty store without any cleanup step.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use signup_api::app::{build_router, AppState};
use signup_api::config::Config;
use signup_shared::auth::password::hash_password;
use signup_shared::models::user::{CreateUser, User};
use signup_shared::store::{InMemoryUserStore, UserStore};
use std::sync::Arc;
use tower::Service as _;

/// Test context containing the router and the store behind it
pub struct TestContext {
    pub store: Arc<InMemoryUserStore>,
    pub app: axum::Router,
}

/// Status and raw body of a response
pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("response body should be JSON")
    }
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryUserStore::new());
        let state = AppState::new(store.clone(), Config::in_memory());

        TestContext {
            store,
            app: build_router(state),
        }
    }

    /// Inserts a user directly into the store, bypassing the endpoint
    pub async fn seed_user(&self, username: &str, password: &str) -> User {
        self.store
            .insert(CreateUser {
                username: username.to_string(),
                password_hash: hash_password(password).expect("hashing should succeed"),
            })
            .await
            .expect("seeding should succeed")
    }

    pub async fn user_count(&self) -> i64 {
        self.store.count().await.expect("count should succeed")
    }

    /// POSTs a JSON value to `/api/users`
    pub async fn post_users(&self, body: serde_json::Value) -> TestResponse {
        self.post_users_raw(body.to_string()).await
    }

    /// POSTs a raw string body to `/api/users`
    pub async fn post_users_raw(&self, body: String) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri("/api/users")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
