//! Handlers for the `/auth` resource (signup, login).
//!
//! Failures answer with `{ "message": ... }` rather than the usual
//! `{error, code}` body; see [`AuthError`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use fixmyroad_core::error::CoreError;
use fixmyroad_db::models::user::{CreateUser, User, UserResponse};
use fixmyroad_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password, MIN_PASSWORD_LENGTH};
use crate::error::AppError;
use crate::state::AppState;

/// Maximum consecutive failed login attempts before locking the account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
const LOCK_DURATION_MINS: i64 = 15;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful signup/login response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Auth failure rendered as `{ "message": ... }` with the status of the
/// wrapped [`AppError`].
#[derive(Debug)]
pub struct AuthError(AppError);

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<CoreError> for AuthError {
    fn from(err: CoreError) -> Self {
        Self(AppError::Core(err))
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        Self(AppError::Database(err))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, _code, message) = self.0.parts();
        (status, Json(json!({ "message": message }))).into_response()
    }
}

type AuthResult<T> = Result<T, AuthError>;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/signup
///
/// Create an account and return a token for it. Emails are stored
/// lowercased.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AuthResult<(StatusCode, Json<AuthResponse>)> {
    let input = SignupRequest {
        name: input.name.trim().to_string(),
        email: normalize_email(&input.email),
        phone: input
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()),
        password: input.password,
    };
    input.validate().map_err(|e| CoreError::Validation(first_message(&e)))?;

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(CoreError::Conflict("User already exists".into()).into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name,
            email: input.email,
            phone: input.phone,
            password_hash,
        },
    )
    .await
    .map_err(|e| {
        // Lost a race with a concurrent signup for the same email.
        let duplicate =
            e.as_database_error().and_then(|db| db.constraint()) == Some("uq_users_email");
        if duplicate {
            AppError::Core(CoreError::Conflict("User already exists".into()))
        } else {
            AppError::Database(e)
        }
    })?;

    tracing::info!(user_id = user.id, "User signed up");
    Ok((StatusCode::CREATED, Json(auth_response(&state, &user)?)))
}

/// POST /api/auth/login
///
/// Authenticate with email + password. Five consecutive failures lock the
/// account for fifteen minutes.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AuthResult<Json<AuthResponse>> {
    // 1. Find user by email.
    let user = UserRepo::find_by_email(&state.pool, &normalize_email(&input.email))
        .await?
        .ok_or_else(|| CoreError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    // 2. Check if the account is temporarily locked.
    if user.is_locked(Utc::now()) {
        tracing::warn!(user_id = user.id, "Login attempt on locked account");
        return Err(CoreError::Forbidden(
            "Account is temporarily locked. Try again later.".into(),
        )
        .into());
    }

    // 3. Verify password.
    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        // 4. On failure: increment counter, lock if threshold reached.
        let failures = UserRepo::increment_failed_login(&state.pool, user.id).await?;
        if failures >= MAX_FAILED_ATTEMPTS {
            let lock_until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
            UserRepo::lock_account(&state.pool, user.id, lock_until).await?;
            tracing::warn!(user_id = user.id, failures, "Account locked after failed logins");
        }

        return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.into()).into());
    }

    // 5. On success: reset failed count, stamp last_login_at.
    UserRepo::record_successful_login(&state.pool, user.id).await?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(auth_response(&state, &user)?))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn auth_response(state: &AppState, user: &User) -> Result<AuthResponse, AppError> {
    let token = generate_access_token(user.id, &user.email, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        token,
        user: UserResponse::from(user),
    })
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// First human-readable message out of a validation failure.
fn first_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid signup details".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            phone: None,
        }
    }

    #[test]
    fn valid_signup_passes_validation() {
        assert!(request("Asha", "asha@example.com", "secret1").validate().is_ok());
    }

    #[test]
    fn short_password_reports_its_message() {
        let err = request("Asha", "asha@example.com", "abc").validate().unwrap_err();
        assert_eq!(first_message(&err), "Password must be at least 6 characters");
    }

    #[test]
    fn bad_email_is_rejected() {
        let err = request("Asha", "not-an-email", "secret1").validate().unwrap_err();
        assert_eq!(first_message(&err), "A valid email is required");
    }

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  Asha@Example.COM "), "asha@example.com");
    }
}
