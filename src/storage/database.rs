// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded records database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized UserRecord
//! - `user_email_index`: lowercase email → user_id
//! - `user_username_index`: username → user_id
//! - `students`: student_id → serialized Student
//! - `student_email_index`: lowercase email → student_id
//! - `student_roll_index`: roll number → student_id
//! - `student_created_index`: composite key (!created_at|student_id) → student_id
//!
//! Unique indexes are checked and written in the same write transaction as
//! the document they point at, so a uniqueness violation aborts the whole
//! write.

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, Table, TableDefinition};

// =============================================================================
// Table Definitions
// =============================================================================

pub(super) const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");
pub(super) const USER_EMAIL_INDEX: TableDefinition<&str, &str> =
    TableDefinition::new("user_email_index");
pub(super) const USER_USERNAME_INDEX: TableDefinition<&str, &str> =
    TableDefinition::new("user_username_index");

pub(super) const STUDENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("students");
pub(super) const STUDENT_EMAIL_INDEX: TableDefinition<&str, &str> =
    TableDefinition::new("student_email_index");
pub(super) const STUDENT_ROLL_INDEX: TableDefinition<&str, &str> =
    TableDefinition::new("student_roll_index");

/// Key format: `inverted_created_at_micros_be | student_id` so that a forward
/// scan yields the newest record first.
pub(super) const STUDENT_CREATED_INDEX: TableDefinition<&[u8], &str> =
    TableDefinition::new("student_created_index");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not found: {0}")]
    NotFound(String),

    /// A unique index already maps the value to a different document.
    #[error("{field} is already in use")]
    Conflict { field: &'static str },
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Index Helpers
// =============================================================================

/// Build the composite key for `student_created_index`.
///
/// The inverted timestamp ensures newest-first ordering when scanning forward.
pub(super) fn created_index_key(created_at_micros: i64, student_id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + 1 + student_id.len());
    key.extend_from_slice(&(!(created_at_micros as u64)).to_be_bytes());
    key.push(b'|');
    key.extend_from_slice(student_id.as_bytes());
    key
}

/// Point `key` at `owner_id` in a unique index.
///
/// Fails with [`StorageError::Conflict`] when the key already belongs to a
/// different document. Re-claiming a key the owner already holds is a no-op.
pub(super) fn claim_unique(
    index: &mut Table<'_, &'static str, &'static str>,
    key: &str,
    owner_id: &str,
    field: &'static str,
) -> StorageResult<()> {
    let holder = index.get(key)?.map(|v| v.value().to_string());
    match holder {
        Some(existing) if existing != owner_id => Err(StorageError::Conflict { field }),
        Some(_) => Ok(()),
        None => {
            index.insert(key, owner_id)?;
            Ok(())
        }
    }
}

/// Check that `key` is free (or already owned by `owner_id`) without writing.
pub(super) fn ensure_available(
    index: &Table<'_, &'static str, &'static str>,
    key: &str,
    owner_id: &str,
    field: &'static str,
) -> StorageResult<()> {
    match index.get(key)? {
        Some(existing) if existing.value() != owner_id => Err(StorageError::Conflict { field }),
        _ => Ok(()),
    }
}

// =============================================================================
// RecordsDatabase
// =============================================================================

/// Embedded ACID database holding both the credential and record stores.
pub struct RecordsDatabase {
    db: Database,
}

impl RecordsDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            write_txn.open_table(USERS)?;
            write_txn.open_table(USER_EMAIL_INDEX)?;
            write_txn.open_table(USER_USERNAME_INDEX)?;
            write_txn.open_table(STUDENTS)?;
            write_txn.open_table(STUDENT_EMAIL_INDEX)?;
            write_txn.open_table(STUDENT_ROLL_INDEX)?;
            write_txn.open_table(STUDENT_CREATED_INDEX)?;
        }
        write_txn.commit()?;

        tracing::info!(path = %path.display(), "Records database opened");
        Ok(Self { db })
    }

    pub(super) fn inner(&self) -> &Database {
        &self.db
    }

    /// Verify the database can serve a read transaction over every table.
    pub fn health_check(&self) -> StorageResult<()> {
        let read_txn = self.db.begin_read()?;
        read_txn.open_table(USERS)?;
        read_txn.open_table(STUDENTS)?;
        read_txn.open_table(STUDENT_CREATED_INDEX)?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db() -> (RecordsDatabase, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = RecordsDatabase::open(&dir.path().join("nested").join("test.redb")).unwrap();
        (db, dir)
    }

    #[test]
    fn open_creates_parent_dirs_and_passes_health_check() {
        let (db, dir) = temp_db();
        assert!(dir.path().join("nested").join("test.redb").exists());
        db.health_check().unwrap();
    }

    #[test]
    fn created_index_key_ordering() {
        // Newer timestamps should produce smaller composite keys (descending)
        let key_old = created_index_key(1_000, "b");
        let key_new = created_index_key(2_000, "a");
        assert!(key_new < key_old, "Newer timestamps should sort first");
    }

    #[test]
    fn claim_unique_detects_other_owner() {
        let (db, _dir) = temp_db();
        let write_txn = db.inner().begin_write().unwrap();
        {
            let mut index = write_txn.open_table(STUDENT_EMAIL_INDEX).unwrap();
            claim_unique(&mut index, "a@x.com", "s1", "email").unwrap();
            // Same owner again is fine
            claim_unique(&mut index, "a@x.com", "s1", "email").unwrap();

            let result = claim_unique(&mut index, "a@x.com", "s2", "email");
            assert!(matches!(
                result,
                Err(StorageError::Conflict { field: "email" })
            ));

            ensure_available(&index, "a@x.com", "s1", "email").unwrap();
            assert!(ensure_available(&index, "a@x.com", "s2", "email").is_err());
            ensure_available(&index, "b@x.com", "s2", "email").unwrap();
        }
        write_txn.commit().unwrap();
    }
}
