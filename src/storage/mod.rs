// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for users and student records in a single embedded
//! redb database file (`$DATA_DIR/records.redb`).
//!
//! ## Layout
//!
//! ```text
//! users                 user_id    -> UserRecord (JSON)
//! user_email_index      email      -> user_id
//! user_username_index   username   -> user_id
//! students              student_id -> Student (JSON)
//! student_email_index   email      -> student_id
//! student_roll_index    roll       -> student_id
//! student_created_index !ts|id     -> student_id
//! ```
//!
//! Every write is a single redb write transaction, so a document and its
//! index entries are always committed or rolled back together.

pub mod database;
pub mod students;
pub mod users;

pub use database::{RecordsDatabase, StorageError, StorageResult};
pub use students::StudentRepository;
pub use users::UserRepository;
