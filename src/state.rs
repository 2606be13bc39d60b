// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{
    auth::TokenService,
    service::{AuthService, StudentService},
    storage::RecordsDatabase,
};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<RecordsDatabase>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(db: RecordsDatabase, tokens: TokenService) -> Self {
        Self {
            db: Arc::new(db),
            tokens: Arc::new(tokens),
        }
    }

    pub fn auth_service(&self) -> AuthService<'_> {
        AuthService::new(&self.db, &self.tokens)
    }

    pub fn student_service(&self) -> StudentService<'_> {
        StudentService::new(&self.db)
    }
}

/// State backed by a fresh database in a temporary directory.
///
/// Keep the returned `TempDir` alive for as long as the state is used.
#[cfg(test)]
pub(crate) fn test_state() -> (AppState, tempfile::TempDir) {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let db = RecordsDatabase::open(&temp_dir.path().join("test.redb")).unwrap();
    let tokens = TokenService::new(b"test-secret-at-least-16-bytes", 7);
    (AppState::new(db, tokens), temp_dir)
}
