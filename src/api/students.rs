// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Student record endpoints.
//!
//! Every route requires a valid bearer token. Records are shared by all
//! authenticated users; there is no per-user ownership.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::ValidJson;
use crate::{
    auth::Auth,
    error::ApiError,
    models::{
        MessageResponse, StudentListResponse, StudentRequest, StudentResponse,
        StudentStatsResponse,
    },
    state::AppState,
};

/// List all students, newest first.
#[utoipa::path(
    get,
    path = "/api/students",
    tag = "Students",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All student records", body = StudentListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_students(
    Auth(_user): Auth,
    State(state): State<AppState>,
) -> Result<Json<StudentListResponse>, ApiError> {
    let students = state
        .student_service()
        .list()
        .map_err(|e| ApiError::from_service(e, "Error fetching students"))?;

    Ok(Json(StudentListResponse {
        success: true,
        data: students,
    }))
}

/// Aggregate attendance and marks over all students.
#[utoipa::path(
    get,
    path = "/api/students/stats",
    tag = "Students",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Student statistics", body = StudentStatsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn student_stats(
    Auth(_user): Auth,
    State(state): State<AppState>,
) -> Result<Json<StudentStatsResponse>, ApiError> {
    let stats = state
        .student_service()
        .stats()
        .map_err(|e| ApiError::from_service(e, "Error fetching students"))?;

    Ok(Json(StudentStatsResponse {
        success: true,
        data: stats,
    }))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student record", body = StudentResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student(
    Auth(_user): Auth,
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = state
        .student_service()
        .get(&student_id)
        .map_err(|e| ApiError::from_service(e, "Error fetching student"))?;

    Ok(Json(StudentResponse {
        success: true,
        message: None,
        data: student,
    }))
}

/// Create a student. The grade is derived from `marks`.
#[utoipa::path(
    post,
    path = "/api/students",
    tag = "Students",
    security(("bearer_auth" = [])),
    request_body = StudentRequest,
    responses(
        (status = 201, description = "Student created successfully", body = StudentResponse),
        (status = 400, description = "Validation failure or duplicate email/roll number"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_student(
    Auth(user): Auth,
    State(state): State<AppState>,
    ValidJson(request): ValidJson<StudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), ApiError> {
    let student = state
        .student_service()
        .create(&request)
        .map_err(|e| ApiError::from_service(e, "Error creating student"))?;
    tracing::debug!(user_id = %user.user_id, student_id = %student.id, "Create requested");

    Ok((
        StatusCode::CREATED,
        Json(StudentResponse {
            success: true,
            message: Some("Student created successfully".to_string()),
            data: student,
        }),
    ))
}

/// Replace a student's fields. Never creates a missing record.
#[utoipa::path(
    put,
    path = "/api/students/{id}",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Student ID")),
    request_body = StudentRequest,
    responses(
        (status = 200, description = "Student updated successfully", body = StudentResponse),
        (status = 400, description = "Validation failure or duplicate email/roll number"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn update_student(
    Auth(_user): Auth,
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    ValidJson(request): ValidJson<StudentRequest>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = state
        .student_service()
        .update(&student_id, &request)
        .map_err(|e| ApiError::from_service(e, "Error updating student"))?;

    Ok(Json(StudentResponse {
        success: true,
        message: Some("Student updated successfully".to_string()),
        data: student,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted successfully", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn delete_student(
    Auth(_user): Auth,
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .student_service()
        .delete(&student_id)
        .map_err(|e| ApiError::from_service(e, "Error deleting student"))?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Student deleted successfully".to_string(),
    }))
}
