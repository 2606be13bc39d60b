// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Business rules between the HTTP handlers and the repositories.
//!
//! Services validate input, run the pre-checks that produce friendly
//! messages, and translate storage outcomes into [`ServiceError`]s the API
//! layer knows how to render.

pub mod auth;
pub mod students;

use thiserror::Error;

use crate::{
    auth::AuthError, models::PublicUser, storage::StorageError, validation::FieldError,
};

pub use auth::AuthService;
pub use students::StudentService;

/// Message returned for any failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation errors")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// A freshly issued token together with the user it belongs to.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: PublicUser,
}
