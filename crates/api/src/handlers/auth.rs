//! Registration and login handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use skillmarket_core::error::CoreError;
use skillmarket_db::models::user::{CreateUser, UserResponse};
use skillmarket_db::repositories::UserRepo;
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Token plus the authenticated user, returned by both register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// `POST /api/v1/auth/register`
///
/// Creates a `student` account. A duplicate email surfaces as 409 via the
/// `uq_users_email` constraint.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AuthResponse>>)> {
    payload
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;

    let password_hash = hash_password(&payload.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: payload.name,
            email: payload.email,
            password_hash,
            image_url: payload.image_url,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "user registered");

    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AuthResponse {
                access_token,
                expires_in: state.config.jwt.access_token_expiry_mins * 60,
                user: user.into(),
            },
        }),
    ))
}

/// `POST /api/v1/auth/login`
///
/// A missing account and a wrong password are indistinguishable to the
/// caller; both return 401 with the same message.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    payload
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;

    let user = UserRepo::find_by_email(&state.pool, &payload.email)
        .await?
        .ok_or_else(|| CoreError::AuthenticationFailed("Invalid email or password".into()))?;

    let valid = verify_password(&payload.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !valid {
        return Err(CoreError::AuthenticationFailed("Invalid email or password".into()).into());
    }

    tracing::info!(user_id = user.id, "user logged in");

    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    Ok(Json(DataResponse {
        data: AuthResponse {
            access_token,
            expires_in: state.config.jwt.access_token_expiry_mins * 60,
            user: user.into(),
        },
    }))
}
