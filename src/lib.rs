// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Student Records - registration, login and student record management
//!
//! A JSON API over an embedded redb database. Users register or log in to
//! obtain a bearer token, then create, list, update and delete student
//! records. Each record's letter grade is derived from its marks.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer tokens and password hashing
//! - `service` - Registration, login and student rules
//! - `storage` - Embedded database (redb) and repositories
//! - `validation` - Request field checks

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod service;
pub mod state;
pub mod storage;
pub mod telemetry;
pub mod validation;
