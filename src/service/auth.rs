// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration, login, and current-user lookup.

use chrono::Utc;

use super::{AuthSession, ServiceError, ServiceResult};
use crate::{
    auth::{
        password::{burn_verification, hash_password, verify_password},
        AuthError, TokenService,
    },
    models::{LoginRequest, PublicUser, RegisterRequest, UserRecord},
    storage::{RecordsDatabase, StorageError, UserRepository},
    validation::{passwords_match, validate_login, validate_registration},
};

const USER_EXISTS: &str = "User with this email or username already exists";

pub struct AuthService<'a> {
    db: &'a RecordsDatabase,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a RecordsDatabase, tokens: &'a TokenService) -> Self {
        Self { db, tokens }
    }

    /// Create an account and sign it in.
    pub fn register(&self, request: &RegisterRequest) -> ServiceResult<AuthSession> {
        let registration = validate_registration(request).map_err(ServiceError::Validation)?;
        if !passwords_match(request) {
            return Err(ServiceError::InvalidInput("Passwords do not match".into()));
        }

        let users = UserRepository::new(self.db);
        if users.is_taken(&registration.email, &registration.username)? {
            return Err(ServiceError::Conflict(USER_EXISTS.into()));
        }

        let record = UserRecord {
            id: uuid::Uuid::new_v4().to_string(),
            full_name: registration.full_name,
            email: registration.email,
            username: registration.username,
            password_hash: hash_password(&registration.password)?,
            created_at: Utc::now(),
        };

        // Two registrations can race past the pre-check; the unique index
        // settles it.
        users.create(&record).map_err(|e| match e {
            StorageError::Conflict { .. } => ServiceError::Conflict(USER_EXISTS.into()),
            other => other.into(),
        })?;

        tracing::info!(user_id = %record.id, username = %record.username, "User registered");
        self.session_for(&record)
    }

    /// Exchange a username (or email) and password for a token.
    pub fn login(&self, request: &LoginRequest) -> ServiceResult<AuthSession> {
        let credentials = validate_login(request).map_err(ServiceError::Validation)?;

        let users = UserRepository::new(self.db);
        let Some(user) = users.find_by_login(&credentials.identifier)? else {
            burn_verification(&credentials.password);
            tracing::debug!("Login attempt for unknown account");
            return Err(ServiceError::InvalidCredentials);
        };

        if !verify_password(&credentials.password, &user.password_hash) {
            tracing::debug!(user_id = %user.id, "Login attempt with wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.session_for(&user)
    }

    /// The user a verified token belongs to.
    ///
    /// A token for an account that no longer exists is treated as an
    /// authentication failure.
    pub fn current_user(&self, user_id: &str) -> ServiceResult<PublicUser> {
        match UserRepository::new(self.db).get(user_id) {
            Ok(user) => Ok(PublicUser::from(&user)),
            Err(StorageError::NotFound(_)) => Err(AuthError::UnknownUser.into()),
            Err(e) => Err(e.into()),
        }
    }

    fn session_for(&self, user: &UserRecord) -> ServiceResult<AuthSession> {
        let token = self.tokens.issue(&user.id)?;
        Ok(AuthSession {
            token,
            user: PublicUser::from(user),
        })
    }
}
