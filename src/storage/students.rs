// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Record store: student documents plus their unique and ordering indexes.

use redb::{ReadableDatabase, ReadableTable};

use super::database::{
    claim_unique, created_index_key, ensure_available, RecordsDatabase, StorageError,
    StorageResult, STUDENTS, STUDENT_CREATED_INDEX, STUDENT_EMAIL_INDEX, STUDENT_ROLL_INDEX,
};
use crate::models::Student;

/// Repository for student operations on the records database.
pub struct StudentRepository<'a> {
    db: &'a RecordsDatabase,
}

impl<'a> StudentRepository<'a> {
    /// Create a new StudentRepository.
    pub fn new(db: &'a RecordsDatabase) -> Self {
        Self { db }
    }

    /// All students, newest-created first.
    pub fn list(&self) -> StorageResult<Vec<Student>> {
        let read_txn = self.db.inner().begin_read()?;
        let created = read_txn.open_table(STUDENT_CREATED_INDEX)?;
        let docs = read_txn.open_table(STUDENTS)?;

        let mut students = Vec::new();
        for entry in created.iter()? {
            let (_, student_id) = entry?;
            let student_id = student_id.value();
            match docs.get(student_id)? {
                Some(value) => students.push(serde_json::from_slice(value.value())?),
                None => {
                    tracing::warn!(student_id = %student_id, "Ordering index points at a missing student");
                }
            }
        }

        Ok(students)
    }

    /// Get a student by ID.
    pub fn get(&self, student_id: &str) -> StorageResult<Student> {
        let read_txn = self.db.inner().begin_read()?;
        let docs = read_txn.open_table(STUDENTS)?;
        match docs.get(student_id)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Err(StorageError::NotFound(format!("Student {student_id}"))),
        }
    }

    /// Which unique field (`email` or `rollNumber`) would collide with an
    /// existing student other than `exclude_id`, if any.
    pub fn find_conflict(
        &self,
        email: &str,
        roll_number: &str,
        exclude_id: Option<&str>,
    ) -> StorageResult<Option<&'static str>> {
        let read_txn = self.db.inner().begin_read()?;
        let owner = exclude_id.unwrap_or_default();

        let emails = read_txn.open_table(STUDENT_EMAIL_INDEX)?;
        if let Some(existing) = emails.get(email)? {
            if existing.value() != owner {
                return Ok(Some("email"));
            }
        }

        let rolls = read_txn.open_table(STUDENT_ROLL_INDEX)?;
        if let Some(existing) = rolls.get(roll_number)? {
            if existing.value() != owner {
                return Ok(Some("rollNumber"));
            }
        }

        Ok(None)
    }

    /// Persist a new student.
    ///
    /// Fails with [`StorageError::Conflict`] when the email or roll number is
    /// already used by another student; nothing is written then.
    pub fn create(&self, student: &Student) -> StorageResult<()> {
        let json = serde_json::to_vec(student)?;
        let id = student.id.as_str();

        let write_txn = self.db.inner().begin_write()?;
        {
            let mut docs = write_txn.open_table(STUDENTS)?;
            if docs.get(id)?.is_some() {
                return Err(StorageError::Conflict { field: "id" });
            }

            let mut emails = write_txn.open_table(STUDENT_EMAIL_INDEX)?;
            claim_unique(&mut emails, &student.email, id, "email")?;

            let mut rolls = write_txn.open_table(STUDENT_ROLL_INDEX)?;
            claim_unique(&mut rolls, &student.roll_number, id, "rollNumber")?;

            let mut created = write_txn.open_table(STUDENT_CREATED_INDEX)?;
            let key = created_index_key(student.created_at.timestamp_micros(), id);
            created.insert(key.as_slice(), id)?;

            docs.insert(id, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Replace an existing student document.
    ///
    /// Fails with [`StorageError::NotFound`] if the ID is unknown (never
    /// creates), or [`StorageError::Conflict`] if the new email or roll
    /// number belongs to another student.
    pub fn update(&self, student: &Student) -> StorageResult<()> {
        let json = serde_json::to_vec(student)?;
        let id = student.id.as_str();

        let write_txn = self.db.inner().begin_write()?;
        {
            let mut docs = write_txn.open_table(STUDENTS)?;

            // Read existing value and deserialize before mutating
            let existing_bytes = {
                let existing = docs
                    .get(id)?
                    .ok_or_else(|| StorageError::NotFound(format!("Student {id}")))?;
                existing.value().to_vec()
            };
            let previous: Student = serde_json::from_slice(&existing_bytes)?;

            let mut emails = write_txn.open_table(STUDENT_EMAIL_INDEX)?;
            let mut rolls = write_txn.open_table(STUDENT_ROLL_INDEX)?;

            // Check both before writing either so the error names the first
            // colliding field deterministically
            ensure_available(&emails, &student.email, id, "email")?;
            ensure_available(&rolls, &student.roll_number, id, "rollNumber")?;

            if previous.email != student.email {
                emails.remove(previous.email.as_str())?;
            }
            if previous.roll_number != student.roll_number {
                rolls.remove(previous.roll_number.as_str())?;
            }
            claim_unique(&mut emails, &student.email, id, "email")?;
            claim_unique(&mut rolls, &student.roll_number, id, "rollNumber")?;

            if previous.created_at != student.created_at {
                let mut created = write_txn.open_table(STUDENT_CREATED_INDEX)?;
                let old_key = created_index_key(previous.created_at.timestamp_micros(), id);
                created.remove(old_key.as_slice())?;
                let new_key = created_index_key(student.created_at.timestamp_micros(), id);
                created.insert(new_key.as_slice(), id)?;
            }

            docs.insert(id, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Delete a student and all of its index entries.
    ///
    /// Returns the removed document.
    pub fn delete(&self, student_id: &str) -> StorageResult<Student> {
        let write_txn = self.db.inner().begin_write()?;
        let removed: Student = {
            let mut docs = write_txn.open_table(STUDENTS)?;
            let bytes = docs
                .remove(student_id)?
                .map(|v| v.value().to_vec())
                .ok_or_else(|| StorageError::NotFound(format!("Student {student_id}")))?;
            let student: Student = serde_json::from_slice(&bytes)?;

            let mut emails = write_txn.open_table(STUDENT_EMAIL_INDEX)?;
            remove_if_owned(&mut emails, &student.email, student_id)?;

            let mut rolls = write_txn.open_table(STUDENT_ROLL_INDEX)?;
            remove_if_owned(&mut rolls, &student.roll_number, student_id)?;

            let mut created = write_txn.open_table(STUDENT_CREATED_INDEX)?;
            let key = created_index_key(student.created_at.timestamp_micros(), student_id);
            created.remove(key.as_slice())?;

            student
        };
        write_txn.commit()?;
        Ok(removed)
    }
}

fn remove_if_owned(
    index: &mut redb::Table<'_, &'static str, &'static str>,
    key: &str,
    owner_id: &str,
) -> StorageResult<()> {
    let owned = index.get(key)?.is_some_and(|v| v.value() == owner_id);
    if owned {
        index.remove(key)?;
    }
    Ok(())
}
