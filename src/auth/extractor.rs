// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Extractor for authenticated users.
///
/// Validates the bearer token from the `Authorization` header against the
/// service's signing secret. Missing or invalid tokens reject the request
/// with `401`.
///
/// # Example
///
/// ```rust,ignore
/// async fn list_students(
///     Auth(user): Auth,
///     State(state): State<AppState>,
/// ) -> Result<Json<StudentListResponse>, ApiError> {
///     // user.user_id contains the authenticated user's ID
/// }
/// ```
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Extract Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        // Extract Bearer token
        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::InvalidAuthHeader)?;

        let user = state.tokens.verify(token)?;
        tracing::debug!(user_id = %user.user_id, "Request authenticated");

        Ok(Auth(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;
    use axum::http::Request;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = value {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn auth_extractor_requires_auth_header() {
        let (state, _temp_dir) = test_state();
        let mut parts = parts_with_header(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_rejects_non_bearer_scheme() {
        let (state, _temp_dir) = test_state();
        let mut parts = parts_with_header(Some("Basic dXNlcjpwYXNz"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));

        let mut parts = parts_with_header(Some("Bearer   "));
        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_succeeds_with_issued_token() {
        let (state, _temp_dir) = test_state();
        let token = state.tokens.issue("user_123").unwrap();
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));

        let Auth(user) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.user_id, "user_123");
    }

    #[tokio::test]
    async fn auth_extractor_rejects_garbage_token() {
        let (state, _temp_dir) = test_state();
        let mut parts = parts_with_header(Some("Bearer abc.def.ghi"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MalformedToken)));
    }
}
