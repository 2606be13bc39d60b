// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::FromRequest,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method, Request,
    },
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ApiError,
    models::{
        AuthResponse, CurrentUserResponse, Grade, LoginRequest, MessageResponse, PublicUser,
        RegisterRequest, Student, StudentListResponse, StudentRequest, StudentResponse,
        StudentStats, StudentStatsResponse,
    },
    state::AppState,
    validation::FieldError,
};

pub mod auth;
pub mod health;
pub mod students;

/// JSON body extractor whose rejections use the API error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ValidJson<T>(pub T);

pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    let api_routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::current_user))
        .route(
            "/api/students",
            get(students::list_students).post(students::create_student),
        )
        .route("/api/students/stats", get(students::student_stats))
        .route(
            "/api/students/{id}",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        )
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    let request_tracing = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<axum::body::Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::x_request_id());

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer(cors_origins))
        .layer(request_tracing)
}

/// CORS for the configured browser origins. Unparsable origins are skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}

/// Declares the bearer token scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token from POST /api/auth/register or /api/auth/login"))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Student Records API",
        description = "Account registration, login and student record management."
    ),
    paths(
        auth::register,
        auth::login,
        auth::current_user,
        students::list_students,
        students::student_stats,
        students::get_student,
        students::create_student,
        students::update_student,
        students::delete_student,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            CurrentUserResponse,
            PublicUser,
            Student,
            StudentRequest,
            StudentResponse,
            StudentListResponse,
            StudentStats,
            StudentStatsResponse,
            MessageResponse,
            Grade,
            FieldError,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login and current user"),
        (name = "Students", description = "Student record management"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;
    use axum::{
        body::{to_bytes, Body},
        http::StatusCode,
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> (Router, tempfile::TempDir) {
        let (state, temp_dir) = test_state();
        let origins = vec!["http://localhost:5000".to_string()];
        (router(state, &origins), temp_dir)
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn register_token(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                None,
                json!({
                    "full_name": "Ada Lovelace",
                    "email": "ada@example.com",
                    "username": "ada",
                    "password": "engine1",
                    "confirmPassword": "engine1"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn students_require_a_token() {
        let (app, _temp_dir) = app();

        let response = app.oneshot(get_request("/api/students", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error_code"], "missing_auth_header");
    }

    #[tokio::test]
    async fn register_create_and_list_students() {
        let (app, _temp_dir) = app();
        let token = register_token(&app).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/students",
                Some(&token),
                json!({
                    "name": "Charles Babbage",
                    "email": "charles@example.com",
                    "rollNumber": "CS-042",
                    "course": "Computer Science",
                    "semester": 4,
                    "attendance": 91.5,
                    "marks": 85
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["data"]["grade"], "A");
        assert_eq!(created["data"]["rollNumber"], "CS-042");
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(get_request("/api/students", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let list = body_json(response).await;
        assert_eq!(list["data"].as_array().unwrap().len(), 1);

        let response = app
            .clone()
            .oneshot(get_request("/api/students/stats", Some(&token)))
            .await
            .unwrap();
        let stats = body_json(response).await;
        assert_eq!(stats["data"]["total"], 1);
        assert_eq!(stats["data"]["averageMarks"], 85.0);

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/students/{id}"))
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn validation_errors_use_error_envelope() {
        let (app, _temp_dir) = app();
        let token = register_token(&app).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/students",
                Some(&token),
                json!({ "name": "", "email": "x@y.com", "rollNumber": "R1", "course": "CS", "semester": 9 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Validation errors");
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["name", "semester"]);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (app, _temp_dir) = app();

        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let (app, _temp_dir) = app();

        let response = app.oneshot(get_request("/health/live", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (app, _temp_dir) = app();

        let response = app
            .oneshot(get_request("/api-doc/openapi.json", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let doc = body_json(response).await;
        assert!(doc["paths"]["/api/students/{id}"].is_object());
        assert!(doc["components"]["securitySchemes"]["bearer_auth"].is_object());
    }
}
