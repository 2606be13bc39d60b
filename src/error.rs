// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{
    auth::AuthError,
    service::{ServiceError, INVALID_CREDENTIALS},
    validation::FieldError,
};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub errors: Option<Vec<FieldError>>,
    pub error_code: Option<&'static str>,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<&'static str>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: None,
            error_code: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 400 carrying the per-field error list.
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self {
            errors: Some(errors),
            ..Self::bad_request("Validation errors")
        }
    }

    /// 500 with a caller-facing message; the cause is only logged.
    pub fn internal(message: impl Into<String>, cause: &dyn std::fmt::Display) -> Self {
        let message = message.into();
        tracing::error!(error = %cause, "{message}");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Convert a service failure, using `server_message` if it turns out to
    /// be an unexpected (storage) error.
    pub fn from_service(error: ServiceError, server_message: &str) -> Self {
        match error {
            ServiceError::Validation(errors) => Self::validation(errors),
            ServiceError::InvalidInput(message) | ServiceError::Conflict(message) => {
                Self::bad_request(message)
            }
            ServiceError::InvalidCredentials => Self::bad_request(INVALID_CREDENTIALS),
            ServiceError::NotFound(message) => Self::not_found(message),
            ServiceError::Auth(auth) => auth.into(),
            ServiceError::Storage(cause) => Self::internal(server_message, &cause),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        Self::from_service(error, "Internal server error")
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        let message = match &error {
            AuthError::InternalError(detail) => {
                tracing::error!(error = %detail, "Authentication failed internally");
                "Server error during authentication".to_string()
            }
            other => other.to_string(),
        };
        Self {
            error_code: Some(error.error_code()),
            ..Self::new(error.status_code(), message)
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            success: false,
            message: self.message,
            errors: self.errors,
            error_code: self.error_code,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "missing");

        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);
        assert_eq!(bad.message, "bad");

        let invalid = ApiError::validation(vec![FieldError::new("name", "Name is required")]);
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
        assert_eq!(invalid.message, "Validation errors");
        assert_eq!(invalid.errors.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"success":false,"message":"bad data"}"#);
    }

    #[test]
    fn service_errors_map_to_statuses() {
        let conflict = ApiError::from(ServiceError::Conflict("taken".into()));
        assert_eq!(conflict.status, StatusCode::BAD_REQUEST);

        let credentials = ApiError::from(ServiceError::InvalidCredentials);
        assert_eq!(credentials.status, StatusCode::BAD_REQUEST);
        assert_eq!(credentials.message, "Invalid credentials");

        let missing = ApiError::from(ServiceError::NotFound("Student not found".into()));
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let unknown = ApiError::from(ServiceError::Auth(AuthError::UnknownUser));
        assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.error_code, Some("unknown_user"));
    }

    #[tokio::test]
    async fn storage_errors_do_not_leak() {
        let error = ApiError::from_service(
            ServiceError::Storage(StorageError::NotFound("secret/path".into())),
            "Error fetching students",
        );
        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);

        let body_bytes = to_bytes(error.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert!(body.contains("Error fetching students"));
        assert!(!body.contains("secret/path"));
    }
}
