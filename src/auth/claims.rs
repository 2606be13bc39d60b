// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried by a bearer token issued by this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Authenticated user information extracted from a verified token.
///
/// This is the type handlers receive through the [`super::Auth`] extractor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Canonical user ID (token `sub` claim)
    pub user_id: String,

    /// Token expiration (Unix timestamp, not serialized)
    #[serde(skip)]
    pub expires_at: i64,
}

impl AuthenticatedUser {
    /// Create from verified claims.
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            expires_at: claims.exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_claims_extracts_user_id_and_expiry() {
        let user = AuthenticatedUser::from_claims(Claims {
            sub: "user_123".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_604_800,
        });
        assert_eq!(user.user_id, "user_123");
        assert_eq!(user.expires_at, 1_700_604_800);
    }
}
