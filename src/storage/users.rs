// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential store: registered users and their unique indexes.

use redb::{ReadableDatabase, ReadableTable, TableDefinition};

use super::database::{
    claim_unique, RecordsDatabase, StorageError, StorageResult, USERS, USER_EMAIL_INDEX,
    USER_USERNAME_INDEX,
};
use crate::models::UserRecord;

/// Repository for user operations on the records database.
pub struct UserRepository<'a> {
    db: &'a RecordsDatabase,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository.
    pub fn new(db: &'a RecordsDatabase) -> Self {
        Self { db }
    }

    /// Persist a new user.
    ///
    /// Fails with [`StorageError::Conflict`] (field `email` or `username`)
    /// when either value is already registered; nothing is written then.
    pub fn create(&self, user: &UserRecord) -> StorageResult<()> {
        let json = serde_json::to_vec(user)?;

        let write_txn = self.db.inner().begin_write()?;
        {
            let mut emails = write_txn.open_table(USER_EMAIL_INDEX)?;
            claim_unique(&mut emails, &user.email, &user.id, "email")?;

            let mut usernames = write_txn.open_table(USER_USERNAME_INDEX)?;
            claim_unique(&mut usernames, &user.username, &user.id, "username")?;

            let mut users = write_txn.open_table(USERS)?;
            if users.get(user.id.as_str())?.is_some() {
                return Err(StorageError::Conflict { field: "id" });
            }
            users.insert(user.id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a user by ID.
    pub fn get(&self, user_id: &str) -> StorageResult<UserRecord> {
        let read_txn = self.db.inner().begin_read()?;
        let users = read_txn.open_table(USERS)?;
        match users.get(user_id)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Err(StorageError::NotFound(format!("User {user_id}"))),
        }
    }

    /// Look up a user by (lower-cased) email.
    pub fn find_by_email(&self, email: &str) -> StorageResult<Option<UserRecord>> {
        self.find_via_index(USER_EMAIL_INDEX, &email.to_lowercase())
    }

    /// Look up a user by exact username.
    pub fn find_by_username(&self, username: &str) -> StorageResult<Option<UserRecord>> {
        self.find_via_index(USER_USERNAME_INDEX, username)
    }

    /// Look up a user by username first, then by email.
    pub fn find_by_login(&self, identifier: &str) -> StorageResult<Option<UserRecord>> {
        if let Some(user) = self.find_by_username(identifier)? {
            return Ok(Some(user));
        }
        self.find_by_email(identifier)
    }

    /// `true` if either the email or the username is already registered.
    pub fn is_taken(&self, email: &str, username: &str) -> StorageResult<bool> {
        let read_txn = self.db.inner().begin_read()?;
        let emails = read_txn.open_table(USER_EMAIL_INDEX)?;
        if emails.get(email.to_lowercase().as_str())?.is_some() {
            return Ok(true);
        }
        let usernames = read_txn.open_table(USER_USERNAME_INDEX)?;
        Ok(usernames.get(username)?.is_some())
    }

    fn find_via_index(
        &self,
        index: TableDefinition<'static, &'static str, &'static str>,
        key: &str,
    ) -> StorageResult<Option<UserRecord>> {
        let read_txn = self.db.inner().begin_read()?;
        let index = read_txn.open_table(index)?;
        let Some(user_id) = index.get(key)?.map(|v| v.value().to_string()) else {
            return Ok(None);
        };

        let users = read_txn.open_table(USERS)?;
        match users.get(user_id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => {
                tracing::warn!(user_id = %user_id, "User index points at a missing document");
                Ok(None)
            }
        }
    }
}
