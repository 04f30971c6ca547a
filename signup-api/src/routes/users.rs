/// User registration endpoint
///
/// # Endpoints
///
/// - `POST /api/users` - Register a new user
///
/// # Rules
///
/// - `username`: present, not blank, at least 3 characters, not already taken
/// - `password`: present, not blank, at least 6 characters
///
/// Lengths are counted in characters, not bytes. Any failure answers
/// `422 Unprocessable Entity` and writes nothing.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    extract::ApiJson,
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use signup_shared::{auth::password, models::user::CreateUser};
use tracing::{debug, info};
use validator::{Validate, ValidationErrors};

const BLANK: &str = "can't be blank";
const INVALID: &str = "is invalid";

/// Register request
///
/// A missing `user` object is treated like one with no fields.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub user: UserParams,
}

/// Submitted user attributes
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UserParams {
    #[validate(
        required(message = "can't be blank"),
        length(min = 3, message = "is too short (minimum is 3 characters)")
    )]
    pub username: Option<String>,

    #[validate(
        required(message = "can't be blank"),
        length(min = 6, message = "is too short (minimum is 6 characters)")
    )]
    pub password: Option<String>,
}

/// Register response: exactly the username and the assigned ID
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub username: String,
    pub id: i64,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/users
/// Content-Type: application/json
///
/// {
///   "user": { "username": "new_username", "password": "password" }
/// }
/// ```
///
/// # Response
///
/// ```json
/// { "username": "new_username", "id": 1 }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Body is not JSON
/// - `422 Unprocessable Entity`: Validation failed or username taken
/// - `500 Internal Server Error`: Server error
pub async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<Json<UserResponse>> {
    let (username, plaintext) = validate_params(req.user).map_err(|err| {
        debug!(error = %err, "Registration rejected");
        err
    })?;

    if state.store.find_by_username(&username).await?.is_some() {
        debug!(username = %username, "Registration rejected: username taken");
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail::new(
            "username",
            "has already been taken",
        )]));
    }

    // Argon2 is CPU-bound; keep it off the async workers.
    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&plaintext))
        .await
        .map_err(|e| ApiError::InternalError(format!("Hashing task failed: {}", e)))??;

    // A concurrent registration can still win the race here; the store's
    // DuplicateUsername maps to the same 422.
    let user = state
        .store
        .insert(CreateUser {
            username,
            password_hash,
        })
        .await?;

    info!(user_id = user.id, username = %user.username, "User registered");

    Ok(Json(UserResponse {
        username: user.username,
        id: user.id,
    }))
}

/// Applies the field rules, returning the username and plaintext password
fn validate_params(params: UserParams) -> ApiResult<(String, String)> {
    let mut errors = match params.validate() {
        Ok(()) => Vec::new(),
        Err(e) => field_errors(&e),
    };

    for (field, value) in [("username", &params.username), ("password", &params.password)] {
        let blank = value.as_deref().is_some_and(|v| v.trim().is_empty());
        if blank && !errors.iter().any(|d| d.field == field && d.message == BLANK) {
            errors.push(ValidationErrorDetail::new(field, BLANK));
        }
    }

    // PostgreSQL TEXT cannot hold NUL
    if params
        .username
        .as_deref()
        .is_some_and(|v| v.chars().any(char::is_control))
    {
        errors.push(ValidationErrorDetail::new("username", INVALID));
    }

    errors.sort_by(|a, b| a.field.cmp(&b.field));

    match (params.username, params.password) {
        (Some(username), Some(password)) if errors.is_empty() => Ok((username, password)),
        _ => Err(ApiError::ValidationError(errors)),
    }
}

fn field_errors(e: &ValidationErrors) -> Vec<ValidationErrorDetail> {
    e.field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| INVALID.to_string()),
            })
        })
        .collect()
}
