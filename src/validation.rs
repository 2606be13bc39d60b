// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request validation for the typed DTOs in [`crate::models`].
//!
//! Each `validate_*` function either returns the cleaned-up (trimmed,
//! normalized) values or the complete list of field errors, so a client can
//! fix every problem in one round trip.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{LoginRequest, RegisterRequest, StudentFields, StudentRequest};

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_SEMESTER: i64 = 1;
pub const MAX_SEMESTER: i64 = 8;
pub const MAX_PERCENT: f64 = 100.0;

/// A single rejected field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct FieldError {
    /// JSON name of the offending field.
    pub field: String,
    /// Human-readable reason.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Outcome of a validation pass.
pub type Validated<T> = Result<T, Vec<FieldError>>;

/// Validated registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Validated login input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username or email as typed (trimmed).
    pub identifier: String,
    pub password: String,
}

/// Collects field errors while values are being checked.
#[derive(Default)]
struct Errors(Vec<FieldError>);

impl Errors {
    fn push(&mut self, field: &str, message: &str) {
        self.0.push(FieldError::new(field, message));
    }

    /// Trimmed, non-empty string or an error under `field`.
    fn required(&mut self, value: Option<&str>, field: &str, message: &str) -> String {
        let trimmed = value.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            self.push(field, message);
        }
        trimmed.to_string()
    }

    fn email(&mut self, value: Option<&str>, field: &str) -> String {
        let email = value.map(str::trim).unwrap_or_default().to_lowercase();
        if !is_valid_email(&email) {
            self.push(field, "Valid email is required");
        }
        email
    }

    fn percent(&mut self, value: Option<f64>, field: &str, message: &str) -> Option<f64> {
        match value {
            Some(v) if !v.is_finite() || !(0.0..=MAX_PERCENT).contains(&v) => {
                self.push(field, message);
                None
            }
            other => other,
        }
    }

    fn finish<T>(self, value: T) -> Validated<T> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self.0)
        }
    }
}

/// Structural email check: one `@`, a non-empty local part, and a dotted
/// domain without empty labels or whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

pub fn validate_registration(request: &RegisterRequest) -> Validated<Registration> {
    let mut errors = Errors::default();

    let full_name = errors.required(
        request.full_name.as_deref(),
        "full_name",
        "Full name is required",
    );
    let email = errors.email(request.email.as_deref(), "email");

    let username = request
        .username
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    if username.chars().count() < MIN_USERNAME_LEN {
        errors.push("username", "Username must be at least 3 characters");
    } else if username.contains('@') {
        // Login tries usernames before emails; an '@' here could shadow
        // another account's email
        errors.push("username", "Username cannot contain @");
    }

    let password = request.password.clone().unwrap_or_default();
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push("password", "Password must be at least 6 characters");
    }

    errors.finish(Registration {
        full_name,
        email,
        username,
        password,
    })
}

/// `true` when the confirmation matches the password.
///
/// Checked after [`validate_registration`] succeeds; a mismatch is reported
/// with its own message rather than as a field list.
pub fn passwords_match(request: &RegisterRequest) -> bool {
    request.password == request.confirm_password
}

pub fn validate_login(request: &LoginRequest) -> Validated<Credentials> {
    let mut errors = Errors::default();

    let identifier = errors.required(
        request.username.as_deref(),
        "username",
        "Username or email is required",
    );
    let password = request.password.clone().unwrap_or_default();
    if password.is_empty() {
        errors.push("password", "Password is required");
    }

    errors.finish(Credentials {
        identifier,
        password,
    })
}

pub fn validate_student(request: &StudentRequest) -> Validated<StudentFields> {
    let mut errors = Errors::default();

    let name = errors.required(request.name.as_deref(), "name", "Name is required");
    let email = errors.email(request.email.as_deref(), "email");
    let roll_number = errors.required(
        request.roll_number.as_deref(),
        "rollNumber",
        "Roll number is required",
    );
    let course = errors.required(request.course.as_deref(), "course", "Course is required");

    let semester = match request.semester {
        Some(s) if (MIN_SEMESTER..=MAX_SEMESTER).contains(&s) => s as u8,
        _ => {
            errors.push("semester", "Semester must be between 1 and 8");
            0
        }
    };

    let attendance = errors.percent(
        request.attendance,
        "attendance",
        "Attendance must be between 0 and 100",
    );
    let marks = errors.percent(request.marks, "marks", "Marks must be between 0 and 100");

    errors.finish(StudentFields {
        name,
        email,
        roll_number,
        course,
        semester,
        attendance,
        marks,
    })
}
