//! Authentication routes

use crate::auth::{create_token, Session};
use crate::error::{ApiError, ApiResult};
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserResponse};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use cg_core::credentials::{hash_password, validate_registration, verify_password};
use std::sync::Arc;
use tracing::info;

const INVALID_CREDENTIALS: &str = "Invalid username or password.";

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    // Values are validated and stored exactly as submitted
    let username = payload.username.as_str();
    let email = payload.email.as_str();

    let errors = validate_registration(username, email, &payload.password, &payload.confirm_password);
    if !errors.is_empty() {
        return Err(ApiError::Validation(
            errors.iter().map(ToString::to_string).collect(),
        ));
    }

    let password_hash = hash_password(&payload.password);
    let user = state
        .store
        .create_user(username, email, &password_hash)
        .await?
        .ok_or_else(|| ApiError::Conflict("Username or email already exists.".to_string()))?;

    info!("Registered user {}", user.username);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: UserResponse {
                id: user.id,
                username: user.username,
                email: user.email,
            },
            message: "Account created! Please sign in.".to_string(),
        }),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let username = payload.username.as_str();
    if username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest("Please fill in all fields.".to_string()));
    }

    // Unknown user and wrong password get the same answer
    let user = state
        .store
        .user_by_username(username)
        .await?
        .filter(|user| verify_password(&payload.password, &user.password_hash))
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    let token = create_token(
        user.id,
        &user.username,
        &user.email,
        &state.config.jwt_secret,
        state.config.token_ttl_secs,
    )
    .map_err(|e| ApiError::Internal(format!("token signing failed: {}", e)))?;

    info!("User {} signed in", user.username);

    Ok(Json(LoginResponse {
        token,
        expires_in: state.config.token_ttl_secs,
        user: UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
        },
    }))
}

pub async fn me(session: Session) -> Json<UserResponse> {
    Json(UserResponse {
        id: session.user_id,
        username: session.username,
        email: session.email,
    })
}
