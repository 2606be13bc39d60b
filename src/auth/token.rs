// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token issuance and verification (HS256 JWT).
//!
//! Tokens are stateless: there is no server-side session or revocation
//! list, a token stays valid until its `exp` claim passes.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{claims::Claims, AuthError, AuthenticatedUser};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Signs and verifies bearer tokens with a shared secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service.
    ///
    /// # Arguments
    /// - `secret`: HMAC secret shared by issuer and verifier
    /// - `ttl_days`: lifetime of issued tokens
    pub fn new(secret: &[u8], ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl: Duration::days(ttl_days),
        }
    }

    /// Issue a token for `user_id`, valid from now.
    pub fn issue(&self, user_id: &str) -> Result<String, AuthError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InternalError(format!("token signing failed: {e}")))
    }

    /// Verify signature and expiry, returning the token's user.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            }
        })?;

        Ok(AuthenticatedUser::from_claims(token_data.claims))
    }
}
