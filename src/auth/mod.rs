// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! This module provides token authentication for the Student Records API.
//!
//! ## Auth Flow
//!
//! 1. Client registers or logs in at `/api/auth/*` and receives a token
//! 2. Client sends `Authorization: Bearer <token>` on every student request
//! 3. Server:
//!    - Verifies the HS256 signature with the configured secret
//!    - Checks expiry (7 days by default, 60 s clock skew)
//!    - Extracts `sub` → canonical `user_id`
//!
//! ## Security
//!
//! - Passwords are stored only as Argon2id hashes
//! - Tokens are stateless; there is no revocation list
//! - Login failures never reveal whether the account exists

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod token;

pub use claims::{AuthenticatedUser, Claims};
pub use error::AuthError;
pub use extractor::Auth;
pub use token::TokenService;
