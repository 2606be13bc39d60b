// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints: registration, login, and the current user.

use axum::{extract::State, http::StatusCode, Json};

use super::ValidJson;
use crate::{
    auth::{Auth, AuthError},
    error::ApiError,
    models::{AuthResponse, CurrentUserResponse, LoginRequest, RegisterRequest},
    state::AppState,
};

/// Register a new account and receive a token.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Validation failure, password mismatch or duplicate user"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    // Argon2 hashing is CPU-bound; keep it off the async workers
    let session = tokio::task::spawn_blocking(move || state.auth_service().register(&request))
        .await
        .map_err(|e| AuthError::InternalError(format!("registration task failed: {e}")))?
        .map_err(|e| ApiError::from_service(e, "Server error during registration"))?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "User registered successfully".to_string(),
            token: session.token,
            user: session.user,
        }),
    ))
}

/// Log in with a username or email address.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing fields or invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let session = tokio::task::spawn_blocking(move || state.auth_service().login(&request))
        .await
        .map_err(|e| AuthError::InternalError(format!("login task failed: {e}")))?
        .map_err(|e| ApiError::from_service(e, "Server error during login"))?;

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        token: session.token,
        user: session.user,
    }))
}

/// Get the account the bearer token belongs to.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = CurrentUserResponse),
        (status = 401, description = "Unauthorized - invalid or missing token")
    )
)]
pub async fn current_user(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<CurrentUserResponse>, ApiError> {
    let user = state.auth_service().current_user(&user.user_id)?;
    Ok(Json(CurrentUserResponse {
        success: true,
        user,
    }))
}
