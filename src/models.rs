// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the stored documents and the request and response
//! data structures used by the REST API. All types derive `Serialize`,
//! `Deserialize`, and `ToSchema` for automatic JSON handling and OpenAPI
//! documentation.
//!
//! ## Model Categories
//!
//! - **Users**: Registered accounts and their public view
//! - **Students**: Student records with a grade derived from marks
//! - **Envelopes**: The `{ success, ... }` wrappers every endpoint returns

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Grade
// =============================================================================

/// Letter grade derived from a student's marks.
///
/// There is no way to set a grade directly; it is recomputed from `marks`
/// whenever a record is created or updated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "F")]
    F,
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl Grade {
    /// Map marks to a grade.
    ///
    /// | Marks | Grade |
    /// |-------|-------|
    /// | ≥ 90 | A+ |
    /// | ≥ 80 | A |
    /// | ≥ 70 | B |
    /// | ≥ 60 | C |
    /// | ≥ 50 | D |
    /// | > 0 | F |
    /// | otherwise | N/A |
    pub fn from_marks(marks: f64) -> Self {
        if marks >= 90.0 {
            Grade::APlus
        } else if marks >= 80.0 {
            Grade::A
        } else if marks >= 70.0 {
            Grade::B
        } else if marks >= 60.0 {
            Grade::C
        } else if marks >= 50.0 {
            Grade::D
        } else if marks > 0.0 {
            Grade::F
        } else {
            Grade::NotAvailable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
            Grade::NotAvailable => "N/A",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// User Models
// =============================================================================

/// A registered user as persisted in the credential store.
///
/// Never serialized into an API response; use [`PublicUser`] for that.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub full_name: String,
    /// Lower-cased email address.
    pub email: String,
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// The fields of a user that are safe to return to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PublicUser {
    /// Unique user identifier.
    pub id: String,
    /// Display name.
    pub full_name: String,
    /// Email address (lower-cased).
    pub email: String,
    /// Login name.
    pub username: String,
}

impl From<&UserRecord> for PublicUser {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
        }
    }
}

/// Request to register a new account.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Display name.
    pub full_name: Option<String>,
    /// Email address; must be unique.
    pub email: Option<String>,
    /// Login name; at least 3 characters and unique.
    pub username: Option<String>,
    /// Password; at least 6 characters.
    pub password: Option<String>,
    /// Must equal `password`.
    #[serde(rename = "confirmPassword")]
    pub confirm_password: Option<String>,
}

/// Request to log in with a username or email address.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Username or email address.
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Response after a successful registration or login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    /// Bearer token to send as `Authorization: Bearer <token>`.
    pub token: String,
    pub user: PublicUser,
}

/// Response for `GET /api/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentUserResponse {
    pub success: bool,
    pub user: PublicUser,
}

// =============================================================================
// Student Models
// =============================================================================

/// A student record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Unique identifier assigned by the server (UUID).
    pub id: String,
    pub name: String,
    /// Email address (lower-cased); unique across students.
    pub email: String,
    /// Human-assigned roll number; unique across students.
    pub roll_number: String,
    pub course: String,
    /// Semester between 1 and 8.
    pub semester: u8,
    /// Attendance percentage between 0 and 100.
    pub attendance: f64,
    /// Marks between 0 and 100.
    pub marks: f64,
    /// Grade derived from `marks`.
    pub grade: Grade,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated student fields, ready to be written.
///
/// Produced by [`crate::validation::validate_student`]. `attendance` and
/// `marks` are `None` when the client omitted them.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentFields {
    pub name: String,
    pub email: String,
    pub roll_number: String,
    pub course: String,
    pub semester: u8,
    pub attendance: Option<f64>,
    pub marks: Option<f64>,
}

impl Student {
    /// Build a new record from validated fields.
    pub fn new(fields: StudentFields, now: DateTime<Utc>) -> Self {
        let marks = fields.marks.unwrap_or(0.0);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: fields.name,
            email: fields.email,
            roll_number: fields.roll_number,
            course: fields.course,
            semester: fields.semester,
            attendance: fields.attendance.unwrap_or(0.0),
            marks,
            grade: Grade::from_marks(marks),
            created_at: now,
            updated_at: now,
        }
    }

    /// Return a copy with `fields` applied and the grade recomputed.
    ///
    /// Omitted attendance/marks keep their current values.
    pub fn updated(&self, fields: StudentFields, now: DateTime<Utc>) -> Self {
        let marks = fields.marks.unwrap_or(self.marks);
        Self {
            id: self.id.clone(),
            name: fields.name,
            email: fields.email,
            roll_number: fields.roll_number,
            course: fields.course,
            semester: fields.semester,
            attendance: fields.attendance.unwrap_or(self.attendance),
            marks,
            grade: Grade::from_marks(marks),
            created_at: self.created_at,
            updated_at: now,
        }
    }
}

/// Request body for creating or updating a student.
///
/// Every field is optional at the type level so that missing fields are
/// reported as validation errors rather than JSON rejections.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub roll_number: Option<String>,
    pub course: Option<String>,
    /// Integer between 1 and 8.
    pub semester: Option<i64>,
    /// Between 0 and 100; defaults to 0 on create.
    pub attendance: Option<f64>,
    /// Between 0 and 100; defaults to 0 on create.
    pub marks: Option<f64>,
}

/// Aggregate figures over all student records.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentStats {
    pub total: usize,
    /// Mean attendance rounded to one decimal place.
    pub average_attendance: f64,
    /// Mean marks rounded to one decimal place.
    pub average_marks: f64,
}

impl StudentStats {
    pub fn from_students(students: &[Student]) -> Self {
        let total = students.len();
        if total == 0 {
            return Self {
                total,
                average_attendance: 0.0,
                average_marks: 0.0,
            };
        }

        let count = total as f64;
        let attendance: f64 = students.iter().map(|s| s.attendance).sum();
        let marks: f64 = students.iter().map(|s| s.marks).sum();

        Self {
            total,
            average_attendance: round_one_decimal(attendance / count),
            average_marks: round_one_decimal(marks / count),
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// =============================================================================
// Response Envelopes
// =============================================================================

/// Response containing a single student.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Student,
}

/// Response containing all students, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentListResponse {
    pub success: bool,
    pub data: Vec<Student>,
}

/// Response containing aggregate student figures.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentStatsResponse {
    pub success: bool,
    pub data: StudentStats,
}

/// Response carrying only a confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}
